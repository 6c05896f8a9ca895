// =====================================================
// HTTP API 테스트 (axum Router + tower oneshot)
// =====================================================
// 상태 코드, 에러 바디 `{"error": ...}`, camelCase JSON 형식 확인
// =====================================================

mod common;
use common::*;
use axum::http::Method;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

async fn register_and_login(app: &TestApp, username: &str) -> (u64, String) {
    let router = app.router();
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/register",
        Some(json!({
            "username": username,
            "email": format!("{}@example.com", username),
            "password": TEST_PASSWORD,
            "firstName": "Test"
        })),
        None,
    )
    .await;
    assert_eq!(status, 201, "{}", body);
    let user_id = body["user"]["id"].as_u64().unwrap();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/login",
        Some(json!({ "username": username, "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    (user_id, body["accessToken"].as_str().unwrap().to_string())
}

/// 테스트: 가입 → 로그인 → /me (토큰 필요)
#[tokio::test]
async fn test_user_register_login_me() {
    let app = TestApp::new();
    let router = app.router();
    let (user_id, token) = register_and_login(&app, "alice").await;

    let (status, body) = call(&router, Method::GET, "/api/users/me", None, Some(&token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["id"].as_u64(), Some(user_id));
    assert_eq!(body["username"], "alice");
    assert_eq!(body["firstName"], "Test");
    assert!(body.get("passwordHash").is_none());

    let (status, body) = call(&router, Method::GET, "/api/users/me", None, None).await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Token not provided");

    let (status, _) = call(&router, Method::GET, "/api/users/me", None, Some("not-a-jwt")).await;
    assert_eq!(status, 401);
}

/// 테스트: 잘못된 로그인 → 401 + 고정 메시지, 중복 가입 → 400
#[tokio::test]
async fn test_user_error_bodies() {
    let app = TestApp::new();
    let router = app.router();
    register_and_login(&app, "bob").await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/login",
        Some(json!({ "username": "bob", "password": "wrong-password" })),
        None,
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body, json!({ "error": "Invalid username or password" }));

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/register",
        Some(json!({ "username": "bob", "email": "bob2@example.com", "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Username already exists");

    // 검증 실패 (짧은 비밀번호)
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/register",
        Some(json!({ "username": "carl", "email": "carl@example.com", "password": "short" })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].is_string());

    let (status, body) = call(&router, Method::GET, "/api/users/999", None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "User not found");
}

/// 테스트: 관리자 로그인, 관리자 토큰으로 사용자 /me 접근 불가
#[tokio::test]
async fn test_admin_login_and_token_kind() {
    let app = TestApp::new();
    let router = app.router();

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/admin/register",
        Some(json!({
            "username": "root",
            "email": "root@example.com",
            "password": TEST_PASSWORD,
            "role": "SUPER_ADMIN"
        })),
        None,
    )
    .await;
    assert_eq!(status, 201, "{}", body);

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "username": "root", "password": "nope-nope" })),
        None,
    )
    .await;
    assert_eq!(status, 401);
    assert_eq!(body["error"], "Invalid credentials or inactive account");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/admin/login",
        Some(json!({ "username": "root", "password": TEST_PASSWORD })),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["admin"]["role"], "SUPER_ADMIN");
    assert!(body["admin"]["lastLogin"].is_string());
    let admin_token = body["accessToken"].as_str().unwrap().to_string();

    let (status, body) = call(&router, Method::GET, "/api/admin/me", None, Some(&admin_token)).await;
    assert_eq!(status, 200);
    assert_eq!(body["username"], "root");

    let (status, _) = call(&router, Method::GET, "/api/users/me", None, Some(&admin_token)).await;
    assert_eq!(status, 401);

    let (status, body) = call(&router, Method::GET, "/api/admin/stats/count", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
}

/// 테스트: 지갑 생성 (개인키 미노출) → 잔액 설정 → 송금 → 내역 조회
#[tokio::test]
async fn test_wallet_and_send_flow() {
    let app = TestApp::new();
    let router = app.router();
    let (user_id, _) = register_and_login(&app, "dana").await;

    let (status, wallet) = call(
        &router,
        Method::POST,
        &format!("/api/wallets/user/{}", user_id),
        Some(json!({ "currency": "BITCOIN" })),
        None,
    )
    .await;
    assert_eq!(status, 201, "{}", wallet);
    assert_eq!(wallet["currency"], "BITCOIN");
    assert_eq!(decimal(&wallet["balance"]), Decimal::ZERO);
    assert!(wallet.get("privateKey").is_none());
    let wallet_id = wallet["id"].as_u64().unwrap();

    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/wallets/{}/balance", wallet_id),
        Some(json!({ "balance": "1.0" })),
        None,
    )
    .await;
    assert_eq!(status, 200, "{}", body);

    let (status, tx) = call(
        &router,
        Method::POST,
        "/api/transactions/send",
        Some(json!({ "walletId": wallet_id, "toAddress": "bc1qpayee", "amount": "0.5" })),
        None,
    )
    .await;
    assert_eq!(status, 201, "{}", tx);
    assert_eq!(tx["type"], "SEND");
    assert_eq!(tx["status"], "PENDING");
    assert_eq!(decimal(&tx["fee"]), btc("0.0001"));

    let (status, body) = call(&router, Method::GET, &format!("/api/wallets/{}", wallet_id), None, None).await;
    assert_eq!(status, 200);
    assert_eq!(decimal(&body["balance"]), btc("0.4999"));

    // 잔액 부족 → 400
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/transactions/send",
        Some(json!({ "walletId": wallet_id, "toAddress": "bc1qpayee", "amount": "5" })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().starts_with("Insufficient balance"));

    // 금액 검증 (0 이하)
    let (status, _) = call(
        &router,
        Method::POST,
        "/api/transactions/send",
        Some(json!({ "walletId": wallet_id, "toAddress": "bc1qpayee", "amount": "0" })),
        None,
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &router,
        Method::GET,
        &format!("/api/transactions/wallet/{}", wallet_id),
        None,
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = call(&router, Method::GET, "/api/wallets/999", None, None).await;
    assert_eq!(status, 404);
    assert_eq!(body, json!({ "error": "Wallet not found" }));

    let (status, _) = call(&router, Method::DELETE, &format!("/api/wallets/{}", wallet_id), None, None).await;
    assert_eq!(status, 204);
}

/// 테스트: 입금 노티파이어 엔드포인트 outcome
#[tokio::test]
async fn test_incoming_outcomes() {
    let app = TestApp::new();
    let router = app.router();
    let wallet = app.funded_wallet(wallet_admin_server::domains::wallet::models::Currency::Bitcoin, btc("0")).await;

    let request = json!({
        "txHash": "notified_1",
        "toAddress": wallet.address,
        "amount": "0.2",
        "fromAddress": "bc1qsender"
    });
    let (status, body) = call(&router, Method::POST, "/api/transactions/incoming", Some(request.clone()), None).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["outcome"], "RECORDED");
    assert_eq!(body["transaction"]["type"], "RECEIVE");

    let (_, body) = call(&router, Method::POST, "/api/transactions/incoming", Some(request), None).await;
    assert_eq!(body["outcome"], "DUPLICATE");
    assert!(body["transaction"].is_null());

    let (_, body) = call(
        &router,
        Method::POST,
        "/api/transactions/incoming",
        Some(json!({ "txHash": "notified_2", "toAddress": "nobody", "amount": "1", "fromAddress": "x" })),
        None,
    )
    .await;
    assert_eq!(body["outcome"], "UNKNOWN_ADDRESS");

    let (status, body) = call(
        &router,
        Method::PUT,
        "/api/transactions/hash/notified_1/status",
        Some(json!({ "status": "FAILED" })),
        None,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(body["status"], "FAILED");

    let (status, _) = call(
        &router,
        Method::PUT,
        "/api/transactions/hash/unknown/status",
        Some(json!({ "status": "CONFIRMED" })),
        None,
    )
    .await;
    assert_eq!(status, 404);
}

/// 테스트: 대시보드 (통계, 페이지 목록, 정렬 필드 검증, 샘플 데이터)
#[tokio::test]
async fn test_dashboard_endpoints() {
    let app = TestApp::new();
    let router = app.router();

    let (_, body) = call(&router, Method::POST, "/api/admin/dashboard/create-sample-data", None, None).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "At least two wallets are required to create sample data");

    use wallet_admin_server::domains::wallet::models::Currency;
    app.funded_wallet(Currency::Bitcoin, btc("0")).await;
    app.funded_wallet(Currency::UsdtTrc20, btc("0")).await;

    let (status, body) = call(&router, Method::POST, "/api/admin/dashboard/create-sample-data", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let (status, stats) = call(&router, Method::GET, "/api/admin/dashboard/stats", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(stats["totalUsers"], 2);
    assert_eq!(stats["totalWallets"], 2);
    assert_eq!(stats["totalTransactions"], 3);
    assert_eq!(stats["pendingTransactions"], 1);

    let (status, page) = call(
        &router,
        Method::GET,
        "/api/admin/dashboard/users?page=0&size=1&sortBy=username&sortDir=asc",
        None,
        None,
    )
    .await;
    assert_eq!(status, 200, "{}", page);
    assert_eq!(page["totalElements"], 2);
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["content"][0]["username"], "holder1");

    let (status, body) = call(&router, Method::GET, "/api/admin/dashboard/users?sortBy=password", None, None).await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Unsupported sort field: password");

    let (status, page) = call(&router, Method::GET, "/api/admin/dashboard/transactions/pending", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(page["totalElements"], 1);

    let (status, page) = call(&router, Method::GET, "/api/admin/dashboard/wallets?currency=USDT_TRC20", None, None).await;
    assert_eq!(status, 200);
    assert_eq!(page["totalElements"], 1);
}

/// 테스트: NUMERIC(20,8) 범위 밖 금액 / 잔액 → 400, 잔액 변경 없음
#[tokio::test]
async fn test_amount_and_balance_range() {
    let app = TestApp::new();
    let router = app.router();
    let wallet = app.funded_wallet(wallet_admin_server::domains::wallet::models::Currency::Bitcoin, btc("0")).await;

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/transactions/incoming",
        Some(json!({ "txHash": "too_large", "toAddress": wallet.address, "amount": "1000000000000", "fromAddress": "x" })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Amount must be less than 1000000000000" }));

    // Decimal 덧셈 overflow에 닿는 금액을 두 번 보내도 400
    for tx_hash in ["huge_1", "huge_2"] {
        let (status, body) = call(
            &router,
            Method::POST,
            "/api/transactions/incoming",
            Some(json!({
                "txHash": tx_hash,
                "toAddress": wallet.address,
                "amount": "50000000000000000000000000000",
                "fromAddress": "x"
            })),
            None,
        )
        .await;
        assert_eq!(status, 400, "{}", body);
    }

    let (status, _) = call(
        &router,
        Method::POST,
        "/api/transactions/send",
        Some(json!({ "walletId": wallet.id, "toAddress": "bc1qpayee", "amount": "1000000000000" })),
        None,
    )
    .await;
    assert_eq!(status, 400);

    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/wallets/{}/balance", wallet.id),
        Some(json!({ "balance": "1000000000000" })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body, json!({ "error": "Balance must be less than 1000000000000" }));

    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/wallets/{}/balance", wallet.id),
        Some(json!({ "balance": "10000000000000000000000" })),
        None,
    )
    .await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(app.wallet(wallet.id).await.balance, Decimal::ZERO);

    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/wallets/{}/balance", wallet.id),
        Some(json!({ "balance": "999999999999.99999999" })),
        None,
    )
    .await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(decimal(&body["balance"]), btc("999999999999.99999999"));
}

/// 테스트: 계정 문자열 길이 (username 원본 50자, email 255자, 이름 100자)
#[tokio::test]
async fn test_account_field_lengths() {
    let app = TestApp::new();
    let router = app.router();
    let (user_id, _) = register_and_login(&app, "erin").await;

    // 공백 포함 51자
    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/register",
        Some(json!({
            "username": format!(" {}", "u".repeat(50)),
            "email": "padded@example.com",
            "password": TEST_PASSWORD
        })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Username must be between 3 and 50 characters");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/users/register",
        Some(json!({
            "username": "longname",
            "email": "longname@example.com",
            "password": TEST_PASSWORD,
            "firstName": "f".repeat(101)
        })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "firstName must be at most 100 characters");

    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/users/{}", user_id),
        Some(json!({ "lastName": "l".repeat(101) })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "lastName must be at most 100 characters");

    let long_email = format!("{}@example.com", "e".repeat(250));
    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/users/{}", user_id),
        Some(json!({ "email": long_email })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Email must be at most 255 characters");

    let (status, body) = call(
        &router,
        Method::POST,
        "/api/admin/register",
        Some(json!({
            "username": "ops",
            "email": "ops@example.com",
            "password": TEST_PASSWORD,
            "lastName": "l".repeat(101)
        })),
        None,
    )
    .await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "lastName must be at most 100 characters");

    // 경계값은 허용
    let (status, body) = call(
        &router,
        Method::PUT,
        &format!("/api/users/{}", user_id),
        Some(json!({ "firstName": "f".repeat(100) })),
        None,
    )
    .await;
    assert_eq!(status, 200, "{}", body);
}

/// 테스트: OpenAPI 문서 제공
#[tokio::test]
async fn test_openapi_document() {
    let app = TestApp::new();
    let router = app.router();

    let (status, doc) = call(&router, Method::GET, "/api-docs/openapi.json", None, None).await;
    assert_eq!(status, 200);
    assert!(doc["paths"]["/api/transactions/send"].is_object());
    assert!(doc["components"]["securitySchemes"]["BearerAuth"].is_object());
}

// =====================================================
// 지갑 레지스트리 통합 테스트
// =====================================================
// 생성, 잔액 갱신, 비활성화, 대시보드 목록 / 검색
// =====================================================

mod common;
use common::*;
use wallet_admin_server::domains::wallet::models::{Currency, WalletResponse};
use wallet_admin_server::shared::clients::ChainClients;
use wallet_admin_server::shared::database::Database;
use wallet_admin_server::shared::errors::WalletError;
use wallet_admin_server::shared::services::AppState;
use wallet_admin_server::shared::utils::PageRequest;

/// 테스트: 새 지갑은 잔액 0, 활성, 체인 클라이언트가 만든 주소 / 키
#[tokio::test]
async fn test_create_wallet_uses_chain_key_pair() {
    let app = TestApp::new();
    let user = app.register_user("alice").await;

    let wallet = app.create_wallet(user.id, Currency::Bitcoin).await;
    assert_eq!(wallet.user_id, user.id);
    assert_eq!(wallet.currency, Currency::Bitcoin);
    assert_eq!(wallet.balance, btc("0"));
    assert!(wallet.active);
    assert_eq!(wallet.address, "btc_addr_1");
    assert_eq!(wallet.private_key, "btc_key_1");

    let tron = app.create_wallet(user.id, Currency::UsdtTrc20).await;
    assert_eq!(tron.address, "tron_addr_1");

    // 응답 DTO에는 개인키가 없음
    let json = serde_json::to_value(WalletResponse::from(&wallet)).unwrap();
    assert!(json.get("privateKey").is_none());
    assert!(!json.to_string().contains("btc_key_1"));
}

/// 테스트: 존재하지 않는 사용자 → NotFound("User")
#[tokio::test]
async fn test_create_wallet_for_unknown_user() {
    let app = TestApp::new();

    let err = app
        .state
        .wallet_state
        .wallet_service
        .create_wallet(42, Currency::Bitcoin)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::NotFound { entity: "User" }));
    assert_eq!(err.to_string(), "User not found");
}

/// 테스트: 체인 클라이언트가 없는 통화 → UnsupportedCurrency
#[tokio::test]
async fn test_create_wallet_without_chain_client() {
    let clients = ChainClients::new().with_client(FakeChainClient::bitcoin());
    let state = AppState::new(Database::in_memory(), clients, &memory_config(false));
    let user = state
        .auth_state
        .user_service
        .register(wallet_admin_server::domains::auth::models::RegisterUserRequest {
            username: "bob".to_string(),
            email: "bob@example.com".to_string(),
            password: TEST_PASSWORD.to_string(),
            first_name: None,
            last_name: None,
        })
        .await
        .unwrap();

    let err = state
        .wallet_state
        .wallet_service
        .create_wallet(user.id, Currency::UsdtTrc20)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::UnsupportedCurrency { .. }));
    assert_eq!(err.to_string(), "Unsupported currency: USDT_TRC20");
    assert!(state.wallet_state.wallet_service.get_user_wallets(user.id).await.unwrap().is_empty());
}

/// 테스트: refresh는 체인 잔액으로 그대로 교체 (조정 아님)
#[tokio::test]
async fn test_refresh_balance_replaces_stored_value() {
    let app = TestApp::new();
    let wallet = app.funded_wallet(Currency::Bitcoin, btc("3.25")).await;
    app.bitcoin.set_balance(btc("0.12345678"));

    let refreshed = app
        .state
        .wallet_state
        .wallet_service
        .refresh_wallet_balance(wallet.id)
        .await
        .unwrap();
    assert_eq!(refreshed.balance, btc("0.12345678"));
    assert_eq!(app.wallet(wallet.id).await.balance, btc("0.12345678"));

    let err = app
        .state
        .wallet_state
        .wallet_service
        .refresh_wallet_balance(999)
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::NotFound { entity: "Wallet" }));
}

/// 테스트: 사용자 지갑 목록은 최신순, 주소로 조회 가능
#[tokio::test]
async fn test_user_wallets_newest_first() {
    let app = TestApp::new();
    let user = app.register_user("carol").await;
    let first = app.create_wallet(user.id, Currency::Bitcoin).await;
    let second = app.create_wallet(user.id, Currency::UsdtTrc20).await;
    let third = app.create_wallet(user.id, Currency::Bitcoin).await;

    let wallets = app.state.wallet_state.wallet_service.get_user_wallets(user.id).await.unwrap();
    let ids: Vec<u64> = wallets.iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![third.id, second.id, first.id]);

    let by_address = app
        .state
        .wallet_state
        .wallet_service
        .get_wallet_by_address(&second.address)
        .await
        .unwrap();
    assert_eq!(by_address.id, second.id);

    let missing = app
        .state
        .wallet_state
        .wallet_service
        .get_wallet_by_address("bc1qnowhere")
        .await
        .unwrap_err();
    assert_eq!(missing.to_string(), "Wallet not found");
}

/// 테스트: 비활성화 후 토글해도 다시 활성화되지 않음
#[tokio::test]
async fn test_toggle_never_reactivates() {
    let app = TestApp::new();
    let wallet = app.funded_wallet(Currency::UsdtTrc20, btc("10")).await;
    let wallets = &app.state.wallet_state.wallet_service;

    let toggled = wallets.toggle_status(wallet.id).await.unwrap();
    assert!(!toggled.active);

    let again = wallets.toggle_status(wallet.id).await.unwrap();
    assert!(!again.active);

    let deactivated = wallets.deactivate_wallet(wallet.id).await.unwrap();
    assert!(!deactivated.active);
    assert_eq!(deactivated.balance, btc("10"));
}

/// 테스트: 대시보드 목록 필터 (통화 / 활성)와 소유자 username 검색
#[tokio::test]
async fn test_list_and_search_wallets() {
    let app = TestApp::new();
    let alice = app.register_user("alice").await;
    let bob = app.register_user("bob").await;
    app.create_wallet(alice.id, Currency::Bitcoin).await;
    app.create_wallet(alice.id, Currency::UsdtTrc20).await;
    let bob_btc = app.create_wallet(bob.id, Currency::Bitcoin).await;
    app.state.wallet_state.wallet_service.deactivate_wallet(bob_btc.id).await.unwrap();

    let wallets = &app.state.wallet_state.wallet_service;
    let page = PageRequest::first(10);

    let btc_wallets = wallets.list_paged(Some(Currency::Bitcoin), None, &page).await.unwrap();
    assert_eq!(btc_wallets.total_elements, 2);
    assert!(btc_wallets.content.iter().all(|w| w.currency == Currency::Bitcoin));

    let active_btc = wallets.list_paged(Some(Currency::Bitcoin), Some(true), &page).await.unwrap();
    assert_eq!(active_btc.total_elements, 1);

    let all = wallets.list_paged(None, None, &page).await.unwrap();
    assert_eq!(all.total_elements, 3);

    let owned_by_alice = wallets.search("ALICE", &page).await.unwrap();
    assert_eq!(owned_by_alice.total_elements, 2);
    assert!(owned_by_alice.content.iter().all(|w| w.user_id == alice.id));

    let by_address = wallets.search("tron_addr", &page).await.unwrap();
    assert_eq!(by_address.total_elements, 1);
}

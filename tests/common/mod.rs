// =====================================================
// 통합 테스트 공통 헬퍼
// =====================================================
// 목적: 인메모리 저장소 + 결정적인 가짜 체인 클라이언트로 AppState 구성
//
// 사용법:
// ```rust
// mod common;
// use common::*;
//
// #[tokio::test]
// async fn test_something() {
//     let app = TestApp::new();
//     let wallet = app.funded_wallet(Currency::Bitcoin, btc("1")).await;
//     // 테스트 코드...
// }
// ```
// =====================================================
#![allow(dead_code)]

use std::str::FromStr;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::Router;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::Barrier;
use tower::ServiceExt;

use wallet_admin_server::domains::auth::models::{RegisterUserRequest, User};
use wallet_admin_server::domains::wallet::models::{Currency, Wallet};
use wallet_admin_server::routes::create_router;
use wallet_admin_server::shared::clients::{ChainClient, ChainClients, KeyPair, SendResult};
use wallet_admin_server::shared::config::{AppConfig, StorageBackend};
use wallet_admin_server::shared::database::Database;
use wallet_admin_server::shared::services::AppState;

pub const TEST_PASSWORD: &str = "password123";

/// "0.5" → Decimal
pub fn btc(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

/// 결정적인 가짜 체인 클라이언트
/// - 주소 / 키 / 해시: "<prefix>_addr_N", "<prefix>_key_N", "<prefix>_tx_N"
/// - 잔액: set_balance로 지정한 값
/// - 수수료: 생성 시 고정
pub struct FakeChainClient {
    currency: Currency,
    prefix: &'static str,
    fee: Decimal,
    balance: Mutex<Decimal>,
    counter: AtomicU64,
    fail_sends: AtomicBool,
    send_barrier: Mutex<Option<Arc<Barrier>>>,
    sends: AtomicU64,
}

impl FakeChainClient {
    pub fn bitcoin() -> Arc<Self> {
        Arc::new(Self::new(Currency::Bitcoin, "btc", btc("0.0001")))
    }

    pub fn tron() -> Arc<Self> {
        Arc::new(Self::new(Currency::UsdtTrc20, "tron", Decimal::ONE))
    }

    fn new(currency: Currency, prefix: &'static str, fee: Decimal) -> Self {
        Self {
            currency,
            prefix,
            fee,
            balance: Mutex::new(Decimal::ZERO),
            counter: AtomicU64::new(0),
            fail_sends: AtomicBool::new(false),
            send_barrier: Mutex::new(None),
            sends: AtomicU64::new(0),
        }
    }

    pub fn fee(&self) -> Decimal {
        self.fee
    }

    pub fn set_balance(&self, balance: Decimal) {
        *self.balance.lock() = balance;
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// 전송이 n개 모일 때까지 대기 (동시 송금 경합 재현용)
    pub fn hold_sends_until(&self, parties: usize) {
        *self.send_barrier.lock() = Some(Arc::new(Barrier::new(parties)));
    }

    pub fn send_count(&self) -> u64 {
        self.sends.load(Ordering::SeqCst)
    }

    fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst) + 1
    }
}

#[async_trait]
impl ChainClient for FakeChainClient {
    fn currency(&self) -> Currency {
        self.currency
    }

    async fn generate_key_pair(&self) -> anyhow::Result<KeyPair> {
        let n = self.next();
        Ok(KeyPair {
            address: format!("{}_addr_{}", self.prefix, n),
            private_key: format!("{}_key_{}", self.prefix, n),
        })
    }

    async fn get_balance(&self, _address: &str) -> anyhow::Result<Decimal> {
        Ok(*self.balance.lock())
    }

    async fn send_transaction(
        &self,
        _private_key: &str,
        _to_address: &str,
        _amount: Decimal,
    ) -> anyhow::Result<SendResult> {
        let barrier = self.send_barrier.lock().clone();
        if let Some(barrier) = barrier {
            barrier.wait().await;
        }
        if self.fail_sends.load(Ordering::SeqCst) {
            anyhow::bail!("node rejected transaction");
        }

        self.sends.fetch_add(1, Ordering::SeqCst);
        Ok(SendResult {
            tx_hash: format!("{}_tx_{}", self.prefix, self.next()),
            fee: self.fee,
        })
    }
}

/// 테스트용 애플리케이션
pub struct TestApp {
    pub state: AppState,
    pub bitcoin: Arc<FakeChainClient>,
    pub tron: Arc<FakeChainClient>,
}

impl TestApp {
    /// 기본 설정 (지갑 직렬화 꺼짐)
    pub fn new() -> Self {
        Self::with_config(memory_config(false))
    }

    /// LEDGER_SERIALIZE_WALLET_MUTATIONS=true 와 동일
    pub fn serialized() -> Self {
        Self::with_config(memory_config(true))
    }

    pub fn with_config(config: AppConfig) -> Self {
        let bitcoin = FakeChainClient::bitcoin();
        let tron = FakeChainClient::tron();
        let clients = ChainClients::new()
            .with_client(bitcoin.clone())
            .with_client(tron.clone());

        Self {
            state: AppState::new(Database::in_memory(), clients, &config),
            bitcoin,
            tron,
        }
    }

    pub fn router(&self) -> Router {
        create_router().with_state(self.state.clone())
    }

    pub async fn register_user(&self, username: &str) -> User {
        self.state
            .auth_state
            .user_service
            .register(RegisterUserRequest {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: TEST_PASSWORD.to_string(),
                first_name: None,
                last_name: None,
            })
            .await
            .unwrap()
    }

    pub async fn create_wallet(&self, user_id: u64, currency: Currency) -> Wallet {
        self.state
            .wallet_state
            .wallet_service
            .create_wallet(user_id, currency)
            .await
            .unwrap()
    }

    /// 새 사용자 + 지갑 + 잔액 설정
    pub async fn funded_wallet(&self, currency: Currency, balance: Decimal) -> Wallet {
        let n = self.state.auth_state.user_service.find_all().await.unwrap().len();
        let user = self.register_user(&format!("holder{}", n + 1)).await;
        let wallet = self.create_wallet(user.id, currency).await;

        self.state
            .wallet_state
            .wallet_service
            .update_wallet_balance(wallet.id, balance)
            .await
            .unwrap()
    }

    pub async fn wallet(&self, wallet_id: u64) -> Wallet {
        self.state.wallet_state.wallet_service.get_wallet(wallet_id).await.unwrap()
    }
}

pub fn memory_config(serialize_wallet_mutations: bool) -> AppConfig {
    AppConfig {
        storage_backend: StorageBackend::Memory,
        serialize_wallet_mutations,
        jwt_secret: "test-secret".to_string(),
        ..Default::default()
    }
}

/// HTTP 요청 한 건 실행 → (status, JSON body)
pub async fn call(
    router: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    bearer: Option<&str>,
) -> (u16, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status().as_u16();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    (status, json)
}

use crate::shared::clients::ChainClients;
use crate::shared::config::AppConfig;
use crate::shared::database::Database;
use crate::shared::services::WalletLocks;
use crate::domains::auth::services::{AuthState, JwtService};
use crate::domains::admin::services::AdminState;
use crate::domains::wallet::services::WalletState;
use crate::domains::ledger::services::LedgerState;
use crate::domains::dashboard::services::DashboardState;

/// Application state (combines all domain states)
/// 애플리케이션 상태 (모든 도메인 상태를 조합)
///
/// 지갑 / 원장 도메인은 같은 ChainClients 레지스트리와 WalletLocks 테이블을 공유
#[derive(Clone)]
pub struct AppState {
    /// 데이터베이스 연결 (공유)
    /// Database connection (shared)
    pub db: Database,
    pub auth_state: AuthState,
    pub admin_state: AdminState,
    pub wallet_state: WalletState,
    pub ledger_state: LedgerState,
    pub dashboard_state: DashboardState,
}

impl AppState {
    /// Create AppState with database, chain clients and configuration
    /// 모든 도메인 State를 초기화하고 조합
    pub fn new(db: Database, chain_clients: ChainClients, config: &AppConfig) -> Self {
        // 1. 공유 서비스 생성 (JWT, 지갑 잠금)
        let jwt_service = JwtService::new(&config.jwt_secret);
        let locks = WalletLocks::new(config.serialize_wallet_mutations);

        // 2. 각 도메인 State 생성
        let auth_state = AuthState::new(db.clone(), jwt_service);
        let admin_state = AdminState::new(db.clone());
        let wallet_state = WalletState::new(db.clone(), chain_clients.clone(), locks.clone());
        let ledger_state = LedgerState::new(db.clone(), chain_clients, locks);
        let dashboard_state = DashboardState::new(db.clone());

        // 3. AppState 조합
        Self {
            db,
            auth_state,
            admin_state,
            wallet_state,
            ledger_state,
            dashboard_state,
        }
    }
}

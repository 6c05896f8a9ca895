// Wallet domain state
// 지갑 도메인 상태
use crate::shared::clients::ChainClients;
use crate::shared::database::Database;
use crate::shared::services::WalletLocks;
use crate::domains::wallet::services::WalletService;

/// Wallet domain state
/// 지갑 도메인에서 필요한 서비스들을 포함하는 상태
#[derive(Clone)]
pub struct WalletState {
    pub wallet_service: WalletService,
}

impl WalletState {
    /// Create WalletState (체인 클라이언트 + 지갑 잠금 테이블 공유)
    pub fn new(db: Database, chain_clients: ChainClients, locks: WalletLocks) -> Self {
        Self {
            wallet_service: WalletService::new(db, chain_clients, locks),
        }
    }
}

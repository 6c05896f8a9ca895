// Ledger domain state
// 원장 도메인 상태
use crate::shared::clients::ChainClients;
use crate::shared::database::Database;
use crate::shared::services::WalletLocks;
use crate::domains::ledger::services::TransactionService;

/// Ledger domain state
/// 지갑 도메인과 같은 WalletLocks를 공유해야 송금 / 입금 / 잔액 갱신이 서로 직렬화됨
#[derive(Clone)]
pub struct LedgerState {
    pub transaction_service: TransactionService,
}

impl LedgerState {
    pub fn new(db: Database, chain_clients: ChainClients, locks: WalletLocks) -> Self {
        Self {
            transaction_service: TransactionService::new(db, chain_clients, locks),
        }
    }
}

use std::sync::Arc;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::shared::clients::{ChainClient, ChainClients};
use crate::shared::database::{unique_violation, Database, TransactionRepository, UnitOfWork, WalletRepository};
use crate::shared::errors::LedgerError;
use crate::shared::services::WalletLocks;
use crate::shared::utils::{fits_numeric, Page, PageRequest, SortDirection};
use crate::domains::ledger::models::{
    IncomingOutcome, IncomingTransactionRequest, NewTransaction, SendTransactionRequest, Transaction,
    TransactionQuery, TransactionStatus, TransactionType,
};
use crate::domains::wallet::models::{Wallet, WalletQuery};

/// 트랜잭션 기록 서비스 (원장)
///
/// 송금: 지갑 조회 → 잔액 검사 (amount만 비교) → 체인 전송 → PENDING SEND 기록 →
/// balance = balance - amount - fee. 체인 전송 이후 단계는 하나의 저장소 트랜잭션 안에서
/// 실행되며 실패 시 롤백 후 SendFailed로 보고된다. 체인 측 보상 처리는 없다.
///
/// 잔액 쓰기는 절대값이므로 WalletLocks가 비활성화된 상태에서는 같은 지갑에 대한
/// 동시 송금이 서로의 차감을 덮어쓸 수 있다.
#[derive(Clone)]
pub struct TransactionService {
    db: Database,
    chain_clients: ChainClients,
    locks: WalletLocks,
}

impl TransactionService {
    pub fn new(db: Database, chain_clients: ChainClients, locks: WalletLocks) -> Self {
        Self {
            db,
            chain_clients,
            locks,
        }
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, LedgerError> {
        self.db
            .begin()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    async fn load_wallet(uow: &mut Box<dyn UnitOfWork>, wallet_id: u64) -> Result<Wallet, LedgerError> {
        uow.find_wallet_by_id(wallet_id)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(LedgerError::NotFound { entity: "Wallet" })
    }

    /// 송금
    pub async fn send_transaction(&self, request: SendTransactionRequest) -> Result<Transaction, LedgerError> {
        let _guard = self.locks.lock(request.wallet_id).await;
        let mut uow = self.begin().await?;

        // 1. 지갑 조회
        let wallet = Self::load_wallet(&mut uow, request.wallet_id).await?;

        // 2. 잔액 검사 (수수료 미포함)
        if wallet.balance < request.amount {
            return Err(LedgerError::InsufficientBalance {
                required: request.amount,
                available: wallet.balance,
            });
        }

        let client = self
            .chain_clients
            .get(wallet.currency)
            .ok_or_else(|| LedgerError::UnsupportedCurrency {
                currency: wallet.currency.to_string(),
            })?;

        // 3 ~ 5. 체인 전송 + 기록 + 잔액 차감 + 커밋
        match Self::broadcast_and_record(uow, client, &wallet, &request).await {
            Ok(tx) => {
                tracing::info!(
                    tx_hash = %tx.tx_hash,
                    from = %wallet.address,
                    to = %request.to_address,
                    amount = %request.amount,
                    "Transaction sent"
                );
                Ok(tx)
            }
            Err(e) => {
                tracing::error!(wallet_id = wallet.id, error = %format!("{:#}", e), "Failed to send transaction");
                Err(LedgerError::SendFailed(format!("{:#}", e)))
            }
        }
    }

    async fn broadcast_and_record(
        mut uow: Box<dyn UnitOfWork>,
        client: Arc<dyn ChainClient>,
        wallet: &Wallet,
        request: &SendTransactionRequest,
    ) -> anyhow::Result<Transaction> {
        let sent = client
            .send_transaction(&wallet.private_key, &request.to_address, request.amount)
            .await?;

        let tx = uow
            .insert_transaction(&NewTransaction {
                wallet_id: wallet.id,
                tx_hash: sent.tx_hash,
                from_address: wallet.address.clone(),
                to_address: request.to_address.clone(),
                amount: request.amount,
                fee: Some(sent.fee),
                tx_type: TransactionType::Send,
                status: TransactionStatus::Pending,
                block_number: None,
                confirmations: None,
                memo: request.memo.clone(),
            })
            .await?;

        let new_balance = wallet
            .balance
            .checked_sub(request.amount)
            .and_then(|balance| balance.checked_sub(sent.fee))
            .filter(|balance| fits_numeric(*balance))
            .ok_or(LedgerError::BalanceOutOfRange { wallet_id: wallet.id })?;
        uow.update_wallet_balance(wallet.id, new_balance).await?;
        uow.commit().await?;

        Ok(tx)
    }

    /// 외부 노티파이어가 관측한 입금 처리 (tx_hash 기준 멱등)
    pub async fn process_incoming_transaction(
        &self,
        request: IncomingTransactionRequest,
    ) -> Result<IncomingOutcome, LedgerError> {
        // 잠금 키(지갑 ID)를 얻기 위한 선조회
        let wallet_id = {
            let mut uow = self.begin().await?;
            uow.find_wallet_by_address(&request.to_address)
                .await
                .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
                .map(|wallet| wallet.id)
        };
        let _guard = match wallet_id {
            Some(id) => self.locks.lock(id).await,
            None => None,
        };

        let mut uow = self.begin().await?;

        let existing = uow
            .find_transaction_by_hash(&request.tx_hash)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transaction: {}", e)))?;
        if existing.is_some() {
            tracing::info!(tx_hash = %request.tx_hash, "Incoming transaction already recorded");
            return Ok(IncomingOutcome::Duplicate);
        }

        let wallet = uow
            .find_wallet_by_address(&request.to_address)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?;
        let Some(wallet) = wallet else {
            tracing::info!(to = %request.to_address, "Incoming transaction for unknown address ignored");
            return Ok(IncomingOutcome::UnknownAddress);
        };

        let new_balance = wallet
            .balance
            .checked_add(request.amount)
            .filter(|balance| fits_numeric(*balance))
            .ok_or(LedgerError::BalanceOutOfRange { wallet_id: wallet.id })?;

        let inserted = uow
            .insert_transaction(&NewTransaction {
                wallet_id: wallet.id,
                tx_hash: request.tx_hash.clone(),
                from_address: request.from_address.clone(),
                to_address: request.to_address.clone(),
                amount: request.amount,
                fee: None,
                tx_type: TransactionType::Receive,
                status: TransactionStatus::Confirmed,
                block_number: request.block_number,
                confirmations: None,
                memo: None,
            })
            .await;
        let tx = match inserted {
            Ok(tx) => tx,
            Err(e) if unique_violation(&e).is_some() => return Ok(IncomingOutcome::Duplicate),
            Err(e) => {
                return Err(LedgerError::DatabaseError(format!("Failed to record incoming transaction: {}", e)))
            }
        };

        uow.update_wallet_balance(wallet.id, new_balance)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to update wallet balance: {}", e)))?;

        match uow.commit().await {
            Ok(()) => {}
            // 동시에 같은 tx_hash가 먼저 커밋된 경우
            Err(e) if unique_violation(&e).is_some() => return Ok(IncomingOutcome::Duplicate),
            Err(e) => {
                return Err(LedgerError::DatabaseError(format!("Failed to commit incoming transaction: {}", e)))
            }
        }

        tracing::info!(tx_hash = %tx.tx_hash, to = %tx.to_address, amount = %tx.amount, "Incoming transaction processed");
        Ok(IncomingOutcome::Recorded(tx))
    }

    /// 상태 갱신 (상태 머신 검증 없음)
    pub async fn update_transaction_status(
        &self,
        tx_hash: &str,
        status: TransactionStatus,
        block_number: Option<u64>,
        confirmations: Option<u32>,
    ) -> Result<Transaction, LedgerError> {
        let mut uow = self.begin().await?;
        let tx = uow
            .update_transaction_status(tx_hash, status, block_number, confirmations)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to update transaction status: {}", e)))?
            .ok_or(LedgerError::NotFound { entity: "Transaction" })?;
        uow.commit()
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to commit status update: {}", e)))?;

        tracing::info!(tx_hash, %status, "Transaction status updated");
        Ok(tx)
    }

    async fn find(&self, query: &TransactionQuery) -> Result<Vec<Transaction>, LedgerError> {
        let mut uow = self.begin().await?;
        uow.find_transactions(query)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transactions: {}", e)))
    }

    /// 지갑의 트랜잭션 (최신순)
    pub async fn get_wallet_transactions(&self, wallet_id: u64) -> Result<Vec<Transaction>, LedgerError> {
        self.find(&TransactionQuery {
            wallet_id: Some(wallet_id),
            ..Default::default()
        })
        .await
    }

    /// 사용자의 모든 지갑 트랜잭션 (최신순)
    pub async fn get_user_transactions(&self, user_id: u64) -> Result<Vec<Transaction>, LedgerError> {
        self.find(&TransactionQuery {
            user_id: Some(user_id),
            ..Default::default()
        })
        .await
    }

    pub async fn get_transaction_by_hash(&self, tx_hash: &str) -> Result<Transaction, LedgerError> {
        let mut uow = self.begin().await?;
        uow.find_transaction_by_hash(tx_hash)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transaction: {}", e)))?
            .ok_or(LedgerError::NotFound { entity: "Transaction" })
    }

    pub async fn list_paged(
        &self,
        status: Option<TransactionStatus>,
        tx_type: Option<TransactionType>,
        page: &PageRequest,
    ) -> Result<Page<Transaction>, LedgerError> {
        let query = TransactionQuery {
            status,
            tx_type,
            ..Default::default()
        };
        self.page(&query, page).await
    }

    /// tx_hash, from / to address 검색
    pub async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Transaction>, LedgerError> {
        let query = TransactionQuery {
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.page(&query, page).await
    }

    pub async fn pending(&self, page: &PageRequest) -> Result<Page<Transaction>, LedgerError> {
        self.list_paged(Some(TransactionStatus::Pending), None, page).await
    }

    async fn page(&self, query: &TransactionQuery, page: &PageRequest) -> Result<Page<Transaction>, LedgerError> {
        let mut uow = self.begin().await?;
        let transactions = uow
            .find_transaction_page(query, page)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch transactions: {}", e)))?;
        let total = uow
            .count_transactions(query)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to count transactions: {}", e)))?;

        Ok(Page::new(transactions, total, page))
    }

    /// 개발용 샘플 데이터: 지갑이 2개 이상일 때 처음 두 지갑의 잔액을 1.5 / 0.001로 설정하고
    /// 샘플 트랜잭션 3건 (확인된 입금, 확인된 송금, 대기 중 입금) 생성
    ///
    /// Returns false when fewer than two wallets exist.
    pub async fn create_sample_transactions(&self) -> Result<bool, LedgerError> {
        let mut uow = self.begin().await?;
        let first_two = PageRequest {
            page: 0,
            size: 2,
            sort_column: "id",
            direction: SortDirection::Asc,
        };
        let wallets = uow
            .find_wallet_page(&WalletQuery::default(), &first_two)
            .await
            .map_err(|e| LedgerError::DatabaseError(format!("Failed to fetch wallets: {}", e)))?;
        let [first, second] = wallets.as_slice() else {
            return Ok(false);
        };

        let db_err = |e: anyhow::Error| LedgerError::DatabaseError(format!("Failed to create sample data: {}", e));

        uow.update_wallet_balance(first.id, Decimal::new(150_000_000, 8)).await.map_err(db_err)?;
        uow.update_wallet_balance(second.id, Decimal::new(100_000, 8)).await.map_err(db_err)?;

        let stamp = Utc::now().timestamp_millis();
        let samples = [
            NewTransaction {
                wallet_id: first.id,
                tx_hash: format!("test_tx_1_{}", stamp),
                from_address: "test_sender_address_1".to_string(),
                to_address: first.address.clone(),
                amount: Decimal::new(150_000_000, 8),
                fee: Some(Decimal::new(1_000, 8)),
                tx_type: TransactionType::Receive,
                status: TransactionStatus::Confirmed,
                block_number: Some(800_000),
                confirmations: Some(6),
                memo: Some("Test incoming transaction".to_string()),
            },
            NewTransaction {
                wallet_id: second.id,
                tx_hash: format!("test_tx_2_{}", stamp),
                from_address: second.address.clone(),
                to_address: "test_recipient_address".to_string(),
                amount: Decimal::new(50_000, 8),
                fee: Some(Decimal::new(500, 8)),
                tx_type: TransactionType::Send,
                status: TransactionStatus::Confirmed,
                block_number: Some(800_001),
                confirmations: Some(3),
                memo: Some("Test outgoing transaction".to_string()),
            },
            NewTransaction {
                wallet_id: second.id,
                tx_hash: format!("test_tx_3_{}", stamp),
                from_address: "test_sender_address_2".to_string(),
                to_address: second.address.clone(),
                amount: Decimal::new(100_000, 8),
                fee: Some(Decimal::new(200, 8)),
                tx_type: TransactionType::Receive,
                status: TransactionStatus::Pending,
                block_number: None,
                confirmations: Some(0),
                memo: Some("Pending transaction".to_string()),
            },
        ];
        for sample in &samples {
            uow.insert_transaction(sample).await.map_err(db_err)?;
        }
        uow.commit().await.map_err(db_err)?;

        tracing::info!("Created sample transactions for testing");
        Ok(true)
    }
}

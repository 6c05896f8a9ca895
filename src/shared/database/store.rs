use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::fmt;
use crate::domains::auth::models::{NewUser, User, UserQuery};
use crate::domains::admin::models::{Admin, AdminQuery, NewAdmin};
use crate::domains::wallet::models::{NewWallet, Wallet, WalletQuery};
use crate::domains::ledger::models::{NewTransaction, Transaction, TransactionQuery, TransactionStatus};
use crate::shared::utils::PageRequest;

/// 유니크 제약 위반 (anyhow 체인 안에 담겨 전달됨)
/// Unique-constraint violation carried inside an anyhow error chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UniqueViolation {
    /// e.g. "users_username_key"
    pub constraint: String,
}

impl fmt::Display for UniqueViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "duplicate key value violates unique constraint \"{}\"", self.constraint)
    }
}

impl std::error::Error for UniqueViolation {}

/// 에러 체인에서 UniqueViolation 찾기
pub fn unique_violation(err: &anyhow::Error) -> Option<&UniqueViolation> {
    err.chain().find_map(|cause| cause.downcast_ref::<UniqueViolation>())
}

pub const USERS_USERNAME_KEY: &str = "users_username_key";
pub const USERS_EMAIL_KEY: &str = "users_email_key";
pub const ADMINS_USERNAME_KEY: &str = "admins_username_key";
pub const ADMINS_EMAIL_KEY: &str = "admins_email_key";
pub const WALLETS_ADDRESS_KEY: &str = "wallets_address_key";
pub const TRANSACTIONS_TX_HASH_KEY: &str = "transactions_tx_hash_key";

// 사용자 저장소
#[async_trait]
pub trait UserRepository: Send {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User>;
    async fn find_user_by_id(&mut self, id: u64) -> Result<Option<User>>;
    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>>;
    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>>;
    /// newest first
    async fn find_users(&mut self, query: &UserQuery) -> Result<Vec<User>>;
    async fn find_user_page(&mut self, query: &UserQuery, page: &PageRequest) -> Result<Vec<User>>;
    async fn count_users(&mut self, query: &UserQuery) -> Result<u64>;
    /// email, names, password hash, active 갱신 (updated_at = now)
    async fn update_user(&mut self, user: &User) -> Result<User>;
    /// wallets / transactions cascade
    async fn delete_user(&mut self, id: u64) -> Result<bool>;
}

// 관리자 저장소
#[async_trait]
pub trait AdminRepository: Send {
    async fn insert_admin(&mut self, admin: &NewAdmin) -> Result<Admin>;
    async fn find_admin_by_id(&mut self, id: u64) -> Result<Option<Admin>>;
    async fn find_admin_by_username(&mut self, username: &str) -> Result<Option<Admin>>;
    async fn find_admin_by_email(&mut self, email: &str) -> Result<Option<Admin>>;
    /// newest first
    async fn find_admins(&mut self, query: &AdminQuery) -> Result<Vec<Admin>>;
    async fn find_admin_page(&mut self, query: &AdminQuery, page: &PageRequest) -> Result<Vec<Admin>>;
    async fn count_admins(&mut self, query: &AdminQuery) -> Result<u64>;
    /// email, names, role, password hash, active, last_login 갱신
    async fn update_admin(&mut self, admin: &Admin) -> Result<Admin>;
    async fn delete_admin(&mut self, id: u64) -> Result<bool>;
}

// 지갑 저장소
#[async_trait]
pub trait WalletRepository: Send {
    async fn insert_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet>;
    async fn find_wallet_by_id(&mut self, id: u64) -> Result<Option<Wallet>>;
    async fn find_wallet_by_address(&mut self, address: &str) -> Result<Option<Wallet>>;
    /// newest first
    async fn find_wallets(&mut self, query: &WalletQuery) -> Result<Vec<Wallet>>;
    async fn find_wallet_page(&mut self, query: &WalletQuery, page: &PageRequest) -> Result<Vec<Wallet>>;
    async fn count_wallets(&mut self, query: &WalletQuery) -> Result<u64>;
    /// 절대값 쓰기 (balance = $1)
    async fn update_wallet_balance(&mut self, id: u64, balance: Decimal) -> Result<()>;
    async fn set_wallet_active(&mut self, id: u64, active: bool) -> Result<()>;
}

// 트랜잭션 저장소
#[async_trait]
pub trait TransactionRepository: Send {
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction>;
    async fn find_transaction_by_hash(&mut self, tx_hash: &str) -> Result<Option<Transaction>>;
    /// newest first
    async fn find_transactions(&mut self, query: &TransactionQuery) -> Result<Vec<Transaction>>;
    async fn find_transaction_page(
        &mut self,
        query: &TransactionQuery,
        page: &PageRequest,
    ) -> Result<Vec<Transaction>>;
    async fn count_transactions(&mut self, query: &TransactionQuery) -> Result<u64>;
    /// SUM(amount), 없으면 0
    async fn sum_transaction_amount(&mut self, query: &TransactionQuery) -> Result<Decimal>;
    /// None이면 해당 해시 없음
    async fn update_transaction_status(
        &mut self,
        tx_hash: &str,
        status: TransactionStatus,
        block_number: Option<u64>,
        confirmations: Option<u32>,
    ) -> Result<Option<Transaction>>;
}

/// 하나의 유스케이스 범위 저장소 트랜잭션
/// Scoped store transaction: commit() publishes, drop rolls back
#[async_trait]
pub trait UnitOfWork:
    UserRepository + AdminRepository + WalletRepository + TransactionRepository + Send
{
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// 저장소 백엔드 (PostgreSQL / in-memory)
#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>>;

    async fn migrate(&self) -> Result<()>;

    fn backend(&self) -> &'static str;
}

/// 오늘 00:00 UTC
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .map(|midnight| midnight.and_utc())
        .unwrap_or(now)
}

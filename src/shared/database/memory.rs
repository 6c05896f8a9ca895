use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use crate::domains::auth::models::{NewUser, User, UserQuery};
use crate::domains::admin::models::{Admin, AdminQuery, NewAdmin};
use crate::domains::wallet::models::{NewWallet, Wallet, WalletQuery};
use crate::domains::ledger::models::{NewTransaction, Transaction, TransactionQuery, TransactionStatus};
use crate::shared::database::store::*;
use crate::shared::utils::{fits_numeric, PageRequest, SortDirection, AMOUNT_SCALE};

/// 인메모리 저장소 (테스트 / STORAGE_BACKEND=memory)
///
/// 각 UnitOfWork는 begin 시점의 커밋된 테이블 스냅샷 위에서 동작하고,
/// 쓰기는 로그로 쌓였다가 commit 시 잠금 하에 커밋된 상태에 다시 적용된다.
/// 잔액 쓰기는 절대값이므로 동시 전송 시 lost update가 그대로 재현된다.
///
/// In-process store; each unit of work reads a snapshot taken at `begin`
/// and replays its write log onto the committed tables at `commit`.
#[derive(Clone, Default)]
pub struct MemoryStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    committed: Mutex<Tables>,
    sequences: Sequences,
}

// BIGSERIAL 대응 (롤백되어도 되돌리지 않음)
#[derive(Default)]
struct Sequences {
    users: AtomicU64,
    admins: AtomicU64,
    wallets: AtomicU64,
    transactions: AtomicU64,
}

fn next_id(counter: &AtomicU64) -> u64 {
    counter.fetch_add(1, AtomicOrdering::Relaxed) + 1
}

/// NUMERIC(20,8): 정수부 12자리 초과 / 소수점 8자리 초과는 numeric field overflow
fn numeric(value: Decimal) -> Result<Decimal> {
    if !fits_numeric(value) {
        return Err(anyhow!("numeric field overflow: {} does not fit NUMERIC(20,8)", value));
    }
    let mut value = value;
    value.rescale(AMOUNT_SCALE);
    Ok(value)
}

fn unique(constraint: &str) -> anyhow::Error {
    anyhow::Error::new(UniqueViolation {
        constraint: constraint.to_string(),
    })
}

#[derive(Debug, Clone, Default)]
struct Tables {
    users: BTreeMap<u64, User>,
    admins: BTreeMap<u64, Admin>,
    wallets: BTreeMap<u64, Wallet>,
    transactions: BTreeMap<u64, Transaction>,
}

#[derive(Debug, Clone)]
enum Write {
    InsertUser(User),
    UpdateUser(User),
    DeleteUser(u64),
    InsertAdmin(Admin),
    UpdateAdmin(Admin),
    DeleteAdmin(u64),
    InsertWallet(Wallet),
    WalletBalance { id: u64, balance: Decimal },
    WalletActive { id: u64, active: bool },
    InsertTransaction(Transaction),
    UpdateTransaction(Transaction),
}

impl Tables {
    fn apply(&mut self, write: &Write) -> Result<()> {
        let now = Utc::now();
        match write {
            Write::InsertUser(user) | Write::UpdateUser(user) => {
                let is_insert = matches!(write, Write::InsertUser(_));
                if !is_insert && !self.users.contains_key(&user.id) {
                    return Ok(());
                }
                for other in self.users.values().filter(|u| u.id != user.id) {
                    if other.username == user.username {
                        return Err(unique(USERS_USERNAME_KEY));
                    }
                    if other.email == user.email {
                        return Err(unique(USERS_EMAIL_KEY));
                    }
                }
                self.users.insert(user.id, user.clone());
            }
            Write::DeleteUser(id) => {
                self.users.remove(id);
                let wallet_ids: HashSet<u64> = self
                    .wallets
                    .values()
                    .filter(|w| w.user_id == *id)
                    .map(|w| w.id)
                    .collect();
                self.wallets.retain(|wallet_id, _| !wallet_ids.contains(wallet_id));
                self.transactions.retain(|_, tx| !wallet_ids.contains(&tx.wallet_id));
            }
            Write::InsertAdmin(admin) | Write::UpdateAdmin(admin) => {
                let is_insert = matches!(write, Write::InsertAdmin(_));
                if !is_insert && !self.admins.contains_key(&admin.id) {
                    return Ok(());
                }
                for other in self.admins.values().filter(|a| a.id != admin.id) {
                    if other.username == admin.username {
                        return Err(unique(ADMINS_USERNAME_KEY));
                    }
                    if other.email == admin.email {
                        return Err(unique(ADMINS_EMAIL_KEY));
                    }
                }
                self.admins.insert(admin.id, admin.clone());
            }
            Write::DeleteAdmin(id) => {
                self.admins.remove(id);
            }
            Write::InsertWallet(wallet) => {
                if !self.users.contains_key(&wallet.user_id) {
                    return Err(anyhow!(
                        "insert on table \"wallets\" violates foreign key constraint: user {} does not exist",
                        wallet.user_id
                    ));
                }
                if self.wallets.values().any(|w| w.address == wallet.address) {
                    return Err(unique(WALLETS_ADDRESS_KEY));
                }
                self.wallets.insert(wallet.id, wallet.clone());
            }
            Write::WalletBalance { id, balance } => {
                if let Some(wallet) = self.wallets.get_mut(id) {
                    wallet.balance = *balance;
                    wallet.updated_at = now;
                }
            }
            Write::WalletActive { id, active } => {
                if let Some(wallet) = self.wallets.get_mut(id) {
                    wallet.active = *active;
                    wallet.updated_at = now;
                }
            }
            Write::InsertTransaction(tx) => {
                if !self.wallets.contains_key(&tx.wallet_id) {
                    return Err(anyhow!(
                        "insert on table \"transactions\" violates foreign key constraint: wallet {} does not exist",
                        tx.wallet_id
                    ));
                }
                if self.transactions.values().any(|t| t.tx_hash == tx.tx_hash) {
                    return Err(unique(TRANSACTIONS_TX_HASH_KEY));
                }
                self.transactions.insert(tx.id, tx.clone());
            }
            Write::UpdateTransaction(tx) => {
                if let Some(existing) = self.transactions.get_mut(&tx.id) {
                    *existing = tx.clone();
                }
            }
        }
        Ok(())
    }

    fn user_matches(user: &User, query: &UserQuery) -> bool {
        query.active.is_none_or(|active| user.active == active)
            && query.created_from.is_none_or(|from| user.created_at >= from)
            && query.created_to.is_none_or(|to| user.created_at <= to)
            && query.search.as_deref().is_none_or(|term| {
                contains_any(
                    term,
                    [
                        Some(user.username.as_str()),
                        Some(user.email.as_str()),
                        user.first_name.as_deref(),
                        user.last_name.as_deref(),
                    ],
                )
            })
    }

    fn admin_matches(admin: &Admin, query: &AdminQuery) -> bool {
        query.active.is_none_or(|active| admin.active == active)
            && query.role.is_none_or(|role| admin.role == role)
            && query
                .last_login_since
                .is_none_or(|since| admin.last_login.is_some_and(|at| at >= since))
            && query.search.as_deref().is_none_or(|term| {
                contains_any(
                    term,
                    [
                        Some(admin.username.as_str()),
                        Some(admin.email.as_str()),
                        admin.first_name.as_deref(),
                        admin.last_name.as_deref(),
                    ],
                )
            })
    }

    fn wallet_matches(&self, wallet: &Wallet, query: &WalletQuery) -> bool {
        query.user_id.is_none_or(|user_id| wallet.user_id == user_id)
            && query.currency.is_none_or(|currency| wallet.currency == currency)
            && query.active.is_none_or(|active| wallet.active == active)
            && query.search.as_deref().is_none_or(|term| {
                let owner = self.users.get(&wallet.user_id);
                contains_any(
                    term,
                    [
                        Some(wallet.address.as_str()),
                        owner.map(|u| u.username.as_str()),
                        owner.map(|u| u.email.as_str()),
                    ],
                )
            })
    }

    fn transaction_matches(&self, tx: &Transaction, query: &TransactionQuery) -> bool {
        let wallet = self.wallets.get(&tx.wallet_id);
        query.wallet_id.is_none_or(|wallet_id| tx.wallet_id == wallet_id)
            && query
                .user_id
                .is_none_or(|user_id| wallet.is_some_and(|w| w.user_id == user_id))
            && query
                .currency
                .is_none_or(|currency| wallet.is_some_and(|w| w.currency == currency))
            && query.status.is_none_or(|status| tx.status == status)
            && query.tx_type.is_none_or(|tx_type| tx.tx_type == tx_type)
            && query.created_from.is_none_or(|from| tx.created_at >= from)
            && query.created_to.is_none_or(|to| tx.created_at <= to)
            && query.search.as_deref().is_none_or(|term| {
                contains_any(
                    term,
                    [
                        Some(tx.tx_hash.as_str()),
                        Some(tx.from_address.as_str()),
                        Some(tx.to_address.as_str()),
                    ],
                )
            })
    }

    fn users_where(&self, query: &UserQuery) -> Vec<User> {
        self.users
            .values()
            .filter(|u| Self::user_matches(u, query))
            .cloned()
            .collect()
    }

    fn admins_where(&self, query: &AdminQuery) -> Vec<Admin> {
        self.admins
            .values()
            .filter(|a| Self::admin_matches(a, query))
            .cloned()
            .collect()
    }

    fn wallets_where(&self, query: &WalletQuery) -> Vec<Wallet> {
        self.wallets
            .values()
            .filter(|w| self.wallet_matches(w, query))
            .cloned()
            .collect()
    }

    fn transactions_where(&self, query: &TransactionQuery) -> Vec<Transaction> {
        self.transactions
            .values()
            .filter(|t| self.transaction_matches(t, query))
            .cloned()
            .collect()
    }
}

// ILIKE '%term%'
fn contains_any<'a>(term: &str, fields: impl IntoIterator<Item = Option<&'a str>>) -> bool {
    let term = term.to_lowercase();
    fields
        .into_iter()
        .flatten()
        .any(|field| field.to_lowercase().contains(&term))
}

// PostgreSQL처럼 NULL은 가장 큰 값으로 취급
fn cmp_nullable<T: Ord>(a: &Option<T>, b: &Option<T>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
    }
}

/// ORDER BY <column> <dir>, id <dir> LIMIT size OFFSET page*size
fn paginate<T>(
    mut rows: Vec<T>,
    page: &PageRequest,
    by_column: impl Fn(&T, &T) -> Ordering,
    id: impl Fn(&T) -> u64,
) -> Vec<T> {
    rows.sort_by(|a, b| {
        let ordering = by_column(a, b).then_with(|| id(a).cmp(&id(b)));
        match page.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
    rows.into_iter()
        .skip(page.offset() as usize)
        .take(page.size as usize)
        .collect()
}

fn newest_first<T>(rows: &mut [T], key: impl Fn(&T) -> (chrono::DateTime<Utc>, u64)) {
    rows.sort_by_key(|row| std::cmp::Reverse(key(row)));
}

fn user_order(column: &str) -> impl Fn(&User, &User) -> Ordering + '_ {
    move |a, b| match column {
        "updated_at" => a.updated_at.cmp(&b.updated_at),
        "username" => a.username.cmp(&b.username),
        "email" => a.email.cmp(&b.email),
        "id" => a.id.cmp(&b.id),
        _ => a.created_at.cmp(&b.created_at),
    }
}

fn admin_order(column: &str) -> impl Fn(&Admin, &Admin) -> Ordering + '_ {
    move |a, b| match column {
        "username" => a.username.cmp(&b.username),
        "email" => a.email.cmp(&b.email),
        "last_login" => cmp_nullable(&a.last_login, &b.last_login),
        "role" => a.role.as_str().cmp(b.role.as_str()),
        "id" => a.id.cmp(&b.id),
        _ => a.created_at.cmp(&b.created_at),
    }
}

fn wallet_order(column: &str) -> impl Fn(&Wallet, &Wallet) -> Ordering + '_ {
    move |a, b| match column {
        "balance" => a.balance.cmp(&b.balance),
        "currency" => a.currency.as_str().cmp(b.currency.as_str()),
        "address" => a.address.cmp(&b.address),
        "id" => a.id.cmp(&b.id),
        _ => a.created_at.cmp(&b.created_at),
    }
}

fn transaction_order(column: &str) -> impl Fn(&Transaction, &Transaction) -> Ordering + '_ {
    move |a, b| match column {
        "amount" => a.amount.cmp(&b.amount),
        "status" => a.status.as_str().cmp(b.status.as_str()),
        "tx_type" => a.tx_type.as_str().cmp(b.tx_type.as_str()),
        "id" => a.id.cmp(&b.id),
        _ => a.created_at.cmp(&b.created_at),
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    // 쓰기 로그를 커밋된 상태 복사본에 적용 후 교체 (원자적)
    fn publish(&self, log: &[Write]) -> Result<()> {
        let mut committed = self.inner.committed.lock();
        let mut next = committed.clone();
        for write in log {
            next.apply(write)?;
        }
        *committed = next;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn UnitOfWork>> {
        let snapshot = self.inner.committed.lock().clone();
        Ok(Box::new(MemoryUnitOfWork {
            store: self.clone(),
            snapshot,
            log: Vec::new(),
        }))
    }

    async fn migrate(&self) -> Result<()> {
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}

/// 인메모리 UnitOfWork (drop = rollback)
pub struct MemoryUnitOfWork {
    store: MemoryStore,
    snapshot: Tables,
    log: Vec<Write>,
}

impl MemoryUnitOfWork {
    fn record(&mut self, write: Write) -> Result<()> {
        self.snapshot.apply(&write)?;
        self.log.push(write);
        Ok(())
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self: Box<Self>) -> Result<()> {
        self.store.publish(&self.log)
    }
}

#[async_trait]
impl UserRepository for MemoryUnitOfWork {
    async fn insert_user(&mut self, user: &NewUser) -> Result<User> {
        let now = Utc::now();
        let user = User {
            id: next_id(&self.store.inner.sequences.users),
            username: user.username.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.record(Write::InsertUser(user.clone()))?;
        Ok(user)
    }

    async fn find_user_by_id(&mut self, id: u64) -> Result<Option<User>> {
        Ok(self.snapshot.users.get(&id).cloned())
    }

    async fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        Ok(self.snapshot.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_user_by_email(&mut self, email: &str) -> Result<Option<User>> {
        Ok(self.snapshot.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_users(&mut self, query: &UserQuery) -> Result<Vec<User>> {
        let mut users = self.snapshot.users_where(query);
        newest_first(&mut users, |u| (u.created_at, u.id));
        Ok(users)
    }

    async fn find_user_page(&mut self, query: &UserQuery, page: &PageRequest) -> Result<Vec<User>> {
        let users = self.snapshot.users_where(query);
        Ok(paginate(users, page, user_order(page.sort_column), |u| u.id))
    }

    async fn count_users(&mut self, query: &UserQuery) -> Result<u64> {
        Ok(self.snapshot.users_where(query).len() as u64)
    }

    async fn update_user(&mut self, user: &User) -> Result<User> {
        if !self.snapshot.users.contains_key(&user.id) {
            return Err(anyhow!("User {} does not exist", user.id));
        }
        let mut updated = user.clone();
        updated.updated_at = Utc::now();
        self.record(Write::UpdateUser(updated.clone()))?;
        Ok(updated)
    }

    async fn delete_user(&mut self, id: u64) -> Result<bool> {
        if !self.snapshot.users.contains_key(&id) {
            return Ok(false);
        }
        self.record(Write::DeleteUser(id))?;
        Ok(true)
    }
}

#[async_trait]
impl AdminRepository for MemoryUnitOfWork {
    async fn insert_admin(&mut self, admin: &NewAdmin) -> Result<Admin> {
        let now = Utc::now();
        let admin = Admin {
            id: next_id(&self.store.inner.sequences.admins),
            username: admin.username.clone(),
            email: admin.email.clone(),
            password_hash: admin.password_hash.clone(),
            first_name: admin.first_name.clone(),
            last_name: admin.last_name.clone(),
            role: admin.role,
            active: true,
            last_login: None,
            created_at: now,
            updated_at: now,
        };
        self.record(Write::InsertAdmin(admin.clone()))?;
        Ok(admin)
    }

    async fn find_admin_by_id(&mut self, id: u64) -> Result<Option<Admin>> {
        Ok(self.snapshot.admins.get(&id).cloned())
    }

    async fn find_admin_by_username(&mut self, username: &str) -> Result<Option<Admin>> {
        Ok(self.snapshot.admins.values().find(|a| a.username == username).cloned())
    }

    async fn find_admin_by_email(&mut self, email: &str) -> Result<Option<Admin>> {
        Ok(self.snapshot.admins.values().find(|a| a.email == email).cloned())
    }

    async fn find_admins(&mut self, query: &AdminQuery) -> Result<Vec<Admin>> {
        let mut admins = self.snapshot.admins_where(query);
        newest_first(&mut admins, |a| (a.created_at, a.id));
        Ok(admins)
    }

    async fn find_admin_page(&mut self, query: &AdminQuery, page: &PageRequest) -> Result<Vec<Admin>> {
        let admins = self.snapshot.admins_where(query);
        Ok(paginate(admins, page, admin_order(page.sort_column), |a| a.id))
    }

    async fn count_admins(&mut self, query: &AdminQuery) -> Result<u64> {
        Ok(self.snapshot.admins_where(query).len() as u64)
    }

    async fn update_admin(&mut self, admin: &Admin) -> Result<Admin> {
        if !self.snapshot.admins.contains_key(&admin.id) {
            return Err(anyhow!("Admin {} does not exist", admin.id));
        }
        let mut updated = admin.clone();
        updated.updated_at = Utc::now();
        self.record(Write::UpdateAdmin(updated.clone()))?;
        Ok(updated)
    }

    async fn delete_admin(&mut self, id: u64) -> Result<bool> {
        if !self.snapshot.admins.contains_key(&id) {
            return Ok(false);
        }
        self.record(Write::DeleteAdmin(id))?;
        Ok(true)
    }
}

#[async_trait]
impl WalletRepository for MemoryUnitOfWork {
    async fn insert_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet> {
        let now = Utc::now();
        let wallet = Wallet {
            id: next_id(&self.store.inner.sequences.wallets),
            user_id: wallet.user_id,
            address: wallet.address.clone(),
            private_key: wallet.private_key.clone(),
            currency: wallet.currency,
            balance: numeric(Decimal::ZERO)?,
            active: true,
            created_at: now,
            updated_at: now,
        };
        self.record(Write::InsertWallet(wallet.clone()))?;
        Ok(wallet)
    }

    async fn find_wallet_by_id(&mut self, id: u64) -> Result<Option<Wallet>> {
        Ok(self.snapshot.wallets.get(&id).cloned())
    }

    async fn find_wallet_by_address(&mut self, address: &str) -> Result<Option<Wallet>> {
        Ok(self.snapshot.wallets.values().find(|w| w.address == address).cloned())
    }

    async fn find_wallets(&mut self, query: &WalletQuery) -> Result<Vec<Wallet>> {
        let mut wallets = self.snapshot.wallets_where(query);
        newest_first(&mut wallets, |w| (w.created_at, w.id));
        Ok(wallets)
    }

    async fn find_wallet_page(&mut self, query: &WalletQuery, page: &PageRequest) -> Result<Vec<Wallet>> {
        let wallets = self.snapshot.wallets_where(query);
        Ok(paginate(wallets, page, wallet_order(page.sort_column), |w| w.id))
    }

    async fn count_wallets(&mut self, query: &WalletQuery) -> Result<u64> {
        Ok(self.snapshot.wallets_where(query).len() as u64)
    }

    async fn update_wallet_balance(&mut self, id: u64, balance: Decimal) -> Result<()> {
        self.record(Write::WalletBalance {
            id,
            balance: numeric(balance)?,
        })
    }

    async fn set_wallet_active(&mut self, id: u64, active: bool) -> Result<()> {
        self.record(Write::WalletActive { id, active })
    }
}

#[async_trait]
impl TransactionRepository for MemoryUnitOfWork {
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction> {
        let tx = Transaction {
            id: next_id(&self.store.inner.sequences.transactions),
            wallet_id: tx.wallet_id,
            tx_hash: tx.tx_hash.clone(),
            from_address: tx.from_address.clone(),
            to_address: tx.to_address.clone(),
            amount: numeric(tx.amount)?,
            fee: tx.fee.map(numeric).transpose()?,
            tx_type: tx.tx_type,
            status: tx.status,
            block_number: tx.block_number,
            confirmations: tx.confirmations,
            memo: tx.memo.clone(),
            created_at: Utc::now(),
        };
        self.record(Write::InsertTransaction(tx.clone()))?;
        Ok(tx)
    }

    async fn find_transaction_by_hash(&mut self, tx_hash: &str) -> Result<Option<Transaction>> {
        Ok(self
            .snapshot
            .transactions
            .values()
            .find(|t| t.tx_hash == tx_hash)
            .cloned())
    }

    async fn find_transactions(&mut self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let mut transactions = self.snapshot.transactions_where(query);
        newest_first(&mut transactions, |t| (t.created_at, t.id));
        Ok(transactions)
    }

    async fn find_transaction_page(
        &mut self,
        query: &TransactionQuery,
        page: &PageRequest,
    ) -> Result<Vec<Transaction>> {
        let transactions = self.snapshot.transactions_where(query);
        Ok(paginate(transactions, page, transaction_order(page.sort_column), |t| t.id))
    }

    async fn count_transactions(&mut self, query: &TransactionQuery) -> Result<u64> {
        Ok(self.snapshot.transactions_where(query).len() as u64)
    }

    async fn sum_transaction_amount(&mut self, query: &TransactionQuery) -> Result<Decimal> {
        // SUM(NUMERIC)은 컬럼 범위에 묶이지 않음
        let mut total = self
            .snapshot
            .transactions_where(query)
            .iter()
            .try_fold(Decimal::ZERO, |acc, t| acc.checked_add(t.amount))
            .ok_or_else(|| anyhow!("numeric overflow while summing transaction amounts"))?;
        total.rescale(AMOUNT_SCALE);
        Ok(total)
    }

    async fn update_transaction_status(
        &mut self,
        tx_hash: &str,
        status: TransactionStatus,
        block_number: Option<u64>,
        confirmations: Option<u32>,
    ) -> Result<Option<Transaction>> {
        let Some(mut tx) = self.find_transaction_by_hash(tx_hash).await? else {
            return Ok(None);
        };
        tx.status = status;
        tx.block_number = block_number;
        tx.confirmations = confirmations;
        self.record(Write::UpdateTransaction(tx.clone()))?;
        Ok(Some(tx))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::wallet::models::Currency;
    use crate::domains::ledger::models::TransactionType;
    use std::str::FromStr;

    fn new_user(name: &str) -> NewUser {
        NewUser {
            username: name.to_string(),
            email: format!("{}@example.com", name),
            password_hash: "hash".to_string(),
            first_name: None,
            last_name: None,
        }
    }

    fn new_wallet(user_id: u64, address: &str) -> NewWallet {
        NewWallet {
            user_id,
            address: address.to_string(),
            private_key: "pk".to_string(),
            currency: Currency::Bitcoin,
        }
    }

    #[tokio::test]
    async fn dropped_unit_of_work_rolls_back() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        uow.insert_user(&new_user("alice")).await.unwrap();
        drop(uow);

        let mut uow = store.begin().await.unwrap();
        assert!(uow.find_user_by_username("alice").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn commit_publishes_writes() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let user = uow.insert_user(&new_user("alice")).await.unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        let found = uow.find_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(found.username, "alice");
        assert!(found.active);
    }

    #[tokio::test]
    async fn unique_violation_detected_at_commit_across_units() {
        let store = MemoryStore::new();

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.insert_user(&new_user("bob")).await.unwrap();
        second.insert_user(&new_user("bob")).await.unwrap();

        first.commit().await.unwrap();
        let err = second.commit().await.unwrap_err();
        assert_eq!(unique_violation(&err).unwrap().constraint, USERS_USERNAME_KEY);
    }

    #[tokio::test]
    async fn delete_user_cascades_to_wallets_and_transactions() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.insert_user(&new_user("carol")).await.unwrap();
        let wallet = uow.insert_wallet(&new_wallet(user.id, "bc1qcarol")).await.unwrap();
        uow.insert_transaction(&NewTransaction {
            wallet_id: wallet.id,
            tx_hash: "h1".to_string(),
            from_address: "x".to_string(),
            to_address: wallet.address.clone(),
            amount: Decimal::ONE,
            fee: None,
            tx_type: TransactionType::Receive,
            status: TransactionStatus::Confirmed,
            block_number: None,
            confirmations: None,
            memo: None,
        })
        .await
        .unwrap();
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.delete_user(user.id).await.unwrap());
        uow.commit().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.count_wallets(&WalletQuery::default()).await.unwrap(), 0);
        assert_eq!(uow.count_transactions(&TransactionQuery::default()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn balances_are_stored_with_eight_fraction_digits() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.insert_user(&new_user("dave")).await.unwrap();
        let wallet = uow.insert_wallet(&new_wallet(user.id, "bc1qdave")).await.unwrap();
        uow.update_wallet_balance(wallet.id, Decimal::from_str("0.4999").unwrap())
            .await
            .unwrap();

        let stored = uow.find_wallet_by_id(wallet.id).await.unwrap().unwrap();
        assert_eq!(stored.balance.to_string(), "0.49990000");
    }

    #[tokio::test]
    async fn values_outside_numeric_20_8_are_rejected() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        let user = uow.insert_user(&new_user("erin")).await.unwrap();
        let wallet = uow.insert_wallet(&new_wallet(user.id, "bc1qerin")).await.unwrap();

        let too_large = Decimal::from_str("1000000000000").unwrap();
        let err = uow.update_wallet_balance(wallet.id, too_large).await.unwrap_err();
        assert!(err.to_string().starts_with("numeric field overflow"));

        // 소수점 자릿수를 잘라 저장하지 않음
        let too_precise = Decimal::from_str("10000000000000000000000").unwrap();
        assert!(uow.update_wallet_balance(wallet.id, too_precise).await.is_err());
        assert!(uow
            .update_wallet_balance(wallet.id, Decimal::from_str("0.123456789").unwrap())
            .await
            .is_err());

        let err = uow
            .insert_transaction(&NewTransaction {
                wallet_id: wallet.id,
                tx_hash: "too_large".to_string(),
                from_address: "x".to_string(),
                to_address: wallet.address.clone(),
                amount: too_large,
                fee: None,
                tx_type: TransactionType::Receive,
                status: TransactionStatus::Confirmed,
                block_number: None,
                confirmations: None,
                memo: None,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("numeric field overflow"));

        let max = Decimal::from_str("999999999999.99999999").unwrap();
        uow.update_wallet_balance(wallet.id, max).await.unwrap();
        let stored = uow.find_wallet_by_id(wallet.id).await.unwrap().unwrap();
        assert_eq!(stored.balance, max);
    }

    #[tokio::test]
    async fn pages_follow_requested_sort() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();
        for name in ["mike", "anna", "zoe"] {
            uow.insert_user(&new_user(name)).await.unwrap();
        }

        let page = PageRequest {
            page: 0,
            size: 2,
            sort_column: "username",
            direction: SortDirection::Asc,
        };
        let names: Vec<String> = uow
            .find_user_page(&UserQuery::default(), &page)
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();
        assert_eq!(names, vec!["anna", "mike"]);

        let search = UserQuery {
            search: Some("ZO".to_string()),
            ..Default::default()
        };
        assert_eq!(uow.count_users(&search).await.unwrap(), 1);

        // 와일드카드 문자도 문자 그대로 매칭
        let wildcard = UserQuery {
            search: Some("_".to_string()),
            ..Default::default()
        };
        assert_eq!(uow.count_users(&wildcard).await.unwrap(), 0);
    }
}

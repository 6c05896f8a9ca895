use rust_decimal::Decimal;
use crate::shared::clients::ChainClients;
use crate::shared::database::{unique_violation, Database, UnitOfWork, UserRepository, WalletRepository};
use crate::shared::errors::WalletError;
use crate::shared::services::WalletLocks;
use crate::shared::utils::{Page, PageRequest};
use crate::domains::wallet::models::{Currency, NewWallet, Wallet, WalletQuery};

/// 지갑 서비스
/// WalletService: wallet registry (creation via chain key generation, balance overwrite / refresh)
#[derive(Clone)]
pub struct WalletService {
    db: Database,
    chain_clients: ChainClients,
    locks: WalletLocks,
}

impl WalletService {
    /// 생성자
    /// Constructor
    pub fn new(db: Database, chain_clients: ChainClients, locks: WalletLocks) -> Self {
        Self {
            db,
            chain_clients,
            locks,
        }
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, WalletError> {
        self.db
            .begin()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to begin transaction: {}", e)))
    }

    async fn load(uow: &mut Box<dyn UnitOfWork>, wallet_id: u64) -> Result<Wallet, WalletError> {
        uow.find_wallet_by_id(wallet_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(WalletError::NotFound { entity: "Wallet" })
    }

    async fn commit(uow: Box<dyn UnitOfWork>) -> Result<(), WalletError> {
        uow.commit()
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to commit wallet changes: {}", e)))
    }

    /// 새 지갑 생성
    /// 1. 사용자 확인 → 2. 통화별 키 생성 → 3. 저장 (balance 0, active)
    pub async fn create_wallet(&self, user_id: u64, currency: Currency) -> Result<Wallet, WalletError> {
        let mut uow = self.begin().await?;

        let user = uow
            .find_user_by_id(user_id)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch user: {}", e)))?
            .ok_or(WalletError::NotFound { entity: "User" })?;

        let client = self
            .chain_clients
            .get(currency)
            .ok_or_else(|| WalletError::UnsupportedCurrency {
                currency: currency.to_string(),
            })?;

        let key_pair = client
            .generate_key_pair()
            .await
            .map_err(|e| WalletError::ChainClient(format!("Failed to generate {} key pair: {}", currency, e)))?;

        let wallet = uow
            .insert_wallet(&NewWallet {
                user_id,
                address: key_pair.address,
                private_key: key_pair.private_key,
                currency,
            })
            .await
            .map_err(|e| match unique_violation(&e) {
                Some(_) => WalletError::Internal("Generated wallet address collided with an existing wallet".to_string()),
                None => WalletError::DatabaseError(format!("Failed to save wallet to database: {}", e)),
            })?;
        Self::commit(uow).await?;

        tracing::info!(wallet_id = wallet.id, address = %wallet.address, username = %user.username, "Wallet created");
        Ok(wallet)
    }

    /// 지갑 조회 (ID로)
    /// Get wallet by ID
    pub async fn get_wallet(&self, wallet_id: u64) -> Result<Wallet, WalletError> {
        let mut uow = self.begin().await?;
        Self::load(&mut uow, wallet_id).await
    }

    pub async fn get_wallet_by_address(&self, address: &str) -> Result<Wallet, WalletError> {
        let mut uow = self.begin().await?;
        uow.find_wallet_by_address(address)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallet: {}", e)))?
            .ok_or(WalletError::NotFound { entity: "Wallet" })
    }

    /// 사용자의 모든 지갑 조회 (최신순)
    /// Get all wallets for user
    pub async fn get_user_wallets(&self, user_id: u64) -> Result<Vec<Wallet>, WalletError> {
        let mut uow = self.begin().await?;
        uow.find_wallets(&WalletQuery {
            user_id: Some(user_id),
            ..Default::default()
        })
        .await
        .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch user wallets: {}", e)))
    }

    /// 관리자용 잔액 덮어쓰기
    pub async fn update_wallet_balance(&self, wallet_id: u64, balance: Decimal) -> Result<Wallet, WalletError> {
        let _guard = self.locks.lock(wallet_id).await;
        let mut uow = self.begin().await?;
        Self::load(&mut uow, wallet_id).await?;

        uow.update_wallet_balance(wallet_id, balance)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to update wallet balance: {}", e)))?;
        let wallet = Self::load(&mut uow, wallet_id).await?;
        Self::commit(uow).await?;

        tracing::info!(wallet_id, %balance, "Wallet balance updated");
        Ok(wallet)
    }

    /// 체인 클라이언트가 보고한 잔액으로 교체 (조정 아님)
    pub async fn refresh_wallet_balance(&self, wallet_id: u64) -> Result<Wallet, WalletError> {
        let _guard = self.locks.lock(wallet_id).await;
        let mut uow = self.begin().await?;
        let wallet = Self::load(&mut uow, wallet_id).await?;

        let client = self
            .chain_clients
            .get(wallet.currency)
            .ok_or_else(|| WalletError::UnsupportedCurrency {
                currency: wallet.currency.to_string(),
            })?;

        let balance = client
            .get_balance(&wallet.address)
            .await
            .map_err(|e| WalletError::ChainClient(format!("Failed to get balance: {}", e)))?;

        uow.update_wallet_balance(wallet_id, balance)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to update wallet balance: {}", e)))?;
        let wallet = Self::load(&mut uow, wallet_id).await?;
        Self::commit(uow).await?;

        tracing::info!(wallet_id, address = %wallet.address, %balance, "Wallet balance refreshed");
        Ok(wallet)
    }

    pub async fn deactivate_wallet(&self, wallet_id: u64) -> Result<Wallet, WalletError> {
        let mut uow = self.begin().await?;
        Self::load(&mut uow, wallet_id).await?;

        uow.set_wallet_active(wallet_id, false)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to deactivate wallet: {}", e)))?;
        let wallet = Self::load(&mut uow, wallet_id).await?;
        Self::commit(uow).await?;

        tracing::info!(wallet_id, address = %wallet.address, "Wallet deactivated");
        Ok(wallet)
    }

    /// 대시보드 토글: 활성 → 비활성화, 비활성 → 변경 없음 (재활성화 경로 없음)
    pub async fn toggle_status(&self, wallet_id: u64) -> Result<Wallet, WalletError> {
        let wallet = self.get_wallet(wallet_id).await?;
        if wallet.active {
            return self.deactivate_wallet(wallet_id).await;
        }

        tracing::info!(wallet_id, "Wallet already inactive, toggle ignored");
        Ok(wallet)
    }

    pub async fn list_paged(
        &self,
        currency: Option<Currency>,
        active: Option<bool>,
        page: &PageRequest,
    ) -> Result<Page<Wallet>, WalletError> {
        let query = WalletQuery {
            currency,
            active,
            ..Default::default()
        };
        self.page(&query, page).await
    }

    /// address, 소유자 username / email 검색
    pub async fn search(&self, term: &str, page: &PageRequest) -> Result<Page<Wallet>, WalletError> {
        let query = WalletQuery {
            search: Some(term.to_string()),
            ..Default::default()
        };
        self.page(&query, page).await
    }

    async fn page(&self, query: &WalletQuery, page: &PageRequest) -> Result<Page<Wallet>, WalletError> {
        let mut uow = self.begin().await?;
        let wallets = uow
            .find_wallet_page(query, page)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to fetch wallets: {}", e)))?;
        let total = uow
            .count_wallets(query)
            .await
            .map_err(|e| WalletError::DatabaseError(format!("Failed to count wallets: {}", e)))?;

        Ok(Page::new(wallets, total, page))
    }
}

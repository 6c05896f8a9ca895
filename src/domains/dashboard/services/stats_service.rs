use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use crate::shared::database::{start_of_day, Database, TransactionRepository, UnitOfWork, UserRepository, WalletRepository};
use crate::shared::errors::StatsError;
use crate::domains::auth::models::UserQuery;
use crate::domains::dashboard::models::SystemStats;
use crate::domains::ledger::models::{TransactionQuery, TransactionStatus};
use crate::domains::wallet::models::{Currency, WalletQuery};

fn db_err(e: anyhow::Error) -> StatsError {
    StatsError::DatabaseError(format!("Failed to compute statistics: {}", e))
}

fn check_period(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), StatsError> {
    if start > end {
        return Err(StatsError::Validation("start must not be after end".to_string()));
    }
    Ok(())
}

/// 대시보드 통계 (읽기 전용, 캐시 없음)
#[derive(Clone)]
pub struct StatsService {
    db: Database,
}

impl StatsService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    async fn begin(&self) -> Result<Box<dyn UnitOfWork>, StatsError> {
        self.db.begin().await.map_err(db_err)
    }

    /// 시스템 전체 통계
    /// 하나의 저장소 트랜잭션 안에서 모든 카운트를 계산
    pub async fn system_statistics(&self) -> Result<SystemStats, StatsError> {
        let now = Utc::now();
        let today = start_of_day(now);
        let mut uow = self.begin().await?;

        let total_users = uow.count_users(&UserQuery::default()).await.map_err(db_err)?;
        let active_users = uow
            .count_users(&UserQuery {
                active: Some(true),
                ..Default::default()
            })
            .await
            .map_err(db_err)?;
        let users_registered_today = uow
            .count_users(&UserQuery {
                created_from: Some(today),
                ..Default::default()
            })
            .await
            .map_err(db_err)?;

        let total_wallets = uow.count_wallets(&WalletQuery::default()).await.map_err(db_err)?;
        let bitcoin_wallets = uow
            .count_wallets(&WalletQuery {
                currency: Some(Currency::Bitcoin),
                ..Default::default()
            })
            .await
            .map_err(db_err)?;
        let usdt_wallets = uow
            .count_wallets(&WalletQuery {
                currency: Some(Currency::UsdtTrc20),
                ..Default::default()
            })
            .await
            .map_err(db_err)?;

        let total_transactions = uow
            .count_transactions(&TransactionQuery::default())
            .await
            .map_err(db_err)?;
        let by_status = |status| TransactionQuery {
            status: Some(status),
            ..Default::default()
        };
        let pending_transactions = uow
            .count_transactions(&by_status(TransactionStatus::Pending))
            .await
            .map_err(db_err)?;
        let confirmed_transactions = uow
            .count_transactions(&by_status(TransactionStatus::Confirmed))
            .await
            .map_err(db_err)?;
        let failed_transactions = uow
            .count_transactions(&by_status(TransactionStatus::Failed))
            .await
            .map_err(db_err)?;
        let transactions_today = uow
            .count_transactions(&TransactionQuery {
                created_from: Some(today),
                ..Default::default()
            })
            .await
            .map_err(db_err)?;

        let confirmed_volume = |currency| TransactionQuery {
            currency: Some(currency),
            status: Some(TransactionStatus::Confirmed),
            ..Default::default()
        };
        let total_bitcoin_volume = uow
            .sum_transaction_amount(&confirmed_volume(Currency::Bitcoin))
            .await
            .map_err(db_err)?;
        let total_usdt_volume = uow
            .sum_transaction_amount(&confirmed_volume(Currency::UsdtTrc20))
            .await
            .map_err(db_err)?;

        Ok(SystemStats {
            total_users,
            active_users,
            total_wallets,
            bitcoin_wallets,
            usdt_wallets,
            total_transactions,
            pending_transactions,
            confirmed_transactions,
            failed_transactions,
            total_bitcoin_volume,
            total_usdt_volume,
            users_registered_today,
            transactions_today,
            last_updated: now,
        })
    }

    /// 기간 내 가입자 수 (양 끝 포함)
    pub async fn users_registered_in_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StatsError> {
        check_period(start, end)?;
        let mut uow = self.begin().await?;
        uow.count_users(&UserQuery {
            created_from: Some(start),
            created_to: Some(end),
            ..Default::default()
        })
        .await
        .map_err(db_err)
    }

    /// 기간 내 트랜잭션 수 (상태 무관)
    pub async fn transactions_in_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<u64, StatsError> {
        check_period(start, end)?;
        let mut uow = self.begin().await?;
        uow.count_transactions(&TransactionQuery {
            created_from: Some(start),
            created_to: Some(end),
            ..Default::default()
        })
        .await
        .map_err(db_err)
    }

    /// 기간 내 CONFIRMED 거래량 (통화별)
    pub async fn volume_in_period(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        currency: Currency,
    ) -> Result<Decimal, StatsError> {
        check_period(start, end)?;
        let mut uow = self.begin().await?;
        uow.sum_transaction_amount(&TransactionQuery {
            currency: Some(currency),
            status: Some(TransactionStatus::Confirmed),
            created_from: Some(start),
            created_to: Some(end),
            ..Default::default()
        })
        .await
        .map_err(db_err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[tokio::test]
    async fn empty_store_yields_zeroes() {
        let service = StatsService::new(Database::in_memory());
        let stats = service.system_statistics().await.unwrap();

        assert_eq!(stats.total_users, 0);
        assert_eq!(stats.total_wallets, 0);
        assert_eq!(stats.total_transactions, 0);
        assert_eq!(stats.total_bitcoin_volume, Decimal::ZERO);
        assert_eq!(stats.total_usdt_volume, Decimal::ZERO);
    }

    #[tokio::test]
    async fn inverted_period_is_rejected() {
        let service = StatsService::new(Database::in_memory());
        let now = Utc::now();

        let err = service
            .volume_in_period(now, now - Duration::hours(1), Currency::Bitcoin)
            .await
            .unwrap_err();
        assert!(matches!(err, StatsError::Validation(_)));
        assert!(service.transactions_in_period(now, now).await.is_ok());
    }
}

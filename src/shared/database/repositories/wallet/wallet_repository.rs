use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::domains::wallet::models::{Currency, NewWallet, Wallet, WalletQuery};
use crate::shared::database::postgres::{db_error, PgUnitOfWork};
use crate::shared::database::repositories::contains_pattern;
use crate::shared::database::store::WalletRepository;
use crate::shared::utils::PageRequest;

const WALLET_COLUMNS: &str = "w.id, w.user_id, w.address, w.private_key, w.currency, w.balance, \
                              w.active, w.created_at, w.updated_at";

fn wallet_from_row(row: &PgRow) -> Result<Wallet> {
    let currency: String = row.try_get("currency")?;
    Ok(Wallet {
        id: row.try_get::<i64, _>("id")? as u64,
        user_id: row.try_get::<i64, _>("user_id")? as u64,
        address: row.try_get("address")?,
        private_key: row.try_get("private_key")?,
        currency: currency.parse::<Currency>().context("Invalid currency in database")?,
        balance: row.try_get::<Decimal, _>("balance")?,
        active: row.try_get("active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

// 검색은 소유자 username / email까지 포함하므로 users 조인
fn push_wallet_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &WalletQuery) {
    builder.push(" FROM wallets w JOIN users u ON u.id = w.user_id WHERE 1 = 1");
    if let Some(user_id) = query.user_id {
        builder.push(" AND w.user_id = ").push_bind(user_id as i64);
    }
    if let Some(currency) = query.currency {
        builder.push(" AND w.currency = ").push_bind(currency.as_str());
    }
    if let Some(active) = query.active {
        builder.push(" AND w.active = ").push_bind(active);
    }
    if let Some(search) = &query.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (w.address ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR u.username ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR u.email ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl WalletRepository for PgUnitOfWork {
    async fn insert_wallet(&mut self, wallet: &NewWallet) -> Result<Wallet> {
        let now = Utc::now();
        let row = sqlx::query(
            r#"
            INSERT INTO wallets AS w (user_id, address, private_key, currency, balance, active, created_at, updated_at)
            VALUES ($1, $2, $3, $4, 0, TRUE, $5, $6)
            RETURNING w.id, w.user_id, w.address, w.private_key, w.currency, w.balance, w.active, w.created_at, w.updated_at
            "#,
        )
        .bind(wallet.user_id as i64)
        .bind(&wallet.address)
        .bind(&wallet.private_key)
        .bind(wallet.currency.as_str())
        .bind(now)
        .bind(now)
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to create wallet"))?;

        wallet_from_row(&row)
    }

    async fn find_wallet_by_id(&mut self, id: u64) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!("SELECT {} FROM wallets w WHERE w.id = $1", WALLET_COLUMNS))
            .bind(id as i64)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch wallet by id"))?;

        row.as_ref().map(wallet_from_row).transpose()
    }

    async fn find_wallet_by_address(&mut self, address: &str) -> Result<Option<Wallet>> {
        let row = sqlx::query(&format!("SELECT {} FROM wallets w WHERE w.address = $1", WALLET_COLUMNS))
            .bind(address)
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch wallet by address"))?;

        row.as_ref().map(wallet_from_row).transpose()
    }

    async fn find_wallets(&mut self, query: &WalletQuery) -> Result<Vec<Wallet>> {
        let mut builder = QueryBuilder::new(format!("SELECT {}", WALLET_COLUMNS));
        push_wallet_filters(&mut builder, query);
        builder.push(" ORDER BY w.created_at DESC, w.id DESC");

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch wallets"))?;

        rows.iter().map(wallet_from_row).collect()
    }

    async fn find_wallet_page(&mut self, query: &WalletQuery, page: &PageRequest) -> Result<Vec<Wallet>> {
        let mut builder = QueryBuilder::new(format!("SELECT {}", WALLET_COLUMNS));
        push_wallet_filters(&mut builder, query);
        let direction = page.direction.as_sql();
        builder.push(format!(
            " ORDER BY w.{} {}, w.id {}",
            page.sort_column, direction, direction
        ));
        builder.push(" LIMIT ").push_bind(page.size as i64);
        builder.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch wallet page"))?;

        rows.iter().map(wallet_from_row).collect()
    }

    async fn count_wallets(&mut self, query: &WalletQuery) -> Result<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS count");
        push_wallet_filters(&mut builder, query);

        let row = builder
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to count wallets"))?;

        Ok(row.try_get::<i64, _>("count")? as u64)
    }

    // 절대값 쓰기 (balance = $2), 동시성 제어 없음
    async fn update_wallet_balance(&mut self, id: u64, balance: Decimal) -> Result<()> {
        sqlx::query("UPDATE wallets SET balance = $2, updated_at = $3 WHERE id = $1")
            .bind(id as i64)
            .bind(balance)
            .bind(Utc::now())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to update wallet balance"))?;

        Ok(())
    }

    async fn set_wallet_active(&mut self, id: u64, active: bool) -> Result<()> {
        sqlx::query("UPDATE wallets SET active = $2, updated_at = $3 WHERE id = $1")
            .bind(id as i64)
            .bind(active)
            .bind(Utc::now())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to update wallet status"))?;

        Ok(())
    }
}

use sqlx::postgres::PgRow;
use sqlx::{Postgres, QueryBuilder, Row};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use crate::domains::ledger::models::{
    NewTransaction, Transaction, TransactionQuery, TransactionStatus, TransactionType,
};
use crate::shared::database::postgres::{db_error, PgUnitOfWork};
use crate::shared::database::repositories::contains_pattern;
use crate::shared::database::store::TransactionRepository;
use crate::shared::utils::PageRequest;

const TRANSACTION_COLUMNS: &str = "t.id, t.wallet_id, t.tx_hash, t.from_address, t.to_address, \
                                   t.amount, t.fee, t.tx_type, t.status, t.block_number, \
                                   t.confirmations, t.memo, t.created_at";

fn transaction_from_row(row: &PgRow) -> Result<Transaction> {
    let tx_type: String = row.try_get("tx_type")?;
    let status: String = row.try_get("status")?;
    Ok(Transaction {
        id: row.try_get::<i64, _>("id")? as u64,
        wallet_id: row.try_get::<i64, _>("wallet_id")? as u64,
        tx_hash: row.try_get("tx_hash")?,
        from_address: row.try_get("from_address")?,
        to_address: row.try_get("to_address")?,
        amount: row.try_get::<Decimal, _>("amount")?,
        fee: row.try_get::<Option<Decimal>, _>("fee")?,
        tx_type: tx_type.parse::<TransactionType>().context("Invalid transaction type in database")?,
        status: status.parse::<TransactionStatus>().context("Invalid transaction status in database")?,
        block_number: row.try_get::<Option<i64>, _>("block_number")?.map(|n| n as u64),
        confirmations: row.try_get::<Option<i32>, _>("confirmations")?.map(|n| n as u32),
        memo: row.try_get("memo")?,
        created_at: row.try_get("created_at")?,
    })
}

// 사용자 / 통화 필터는 지갑 조인으로 처리
fn push_transaction_filters(builder: &mut QueryBuilder<'_, Postgres>, query: &TransactionQuery) {
    builder.push(" FROM transactions t JOIN wallets w ON w.id = t.wallet_id WHERE 1 = 1");
    if let Some(wallet_id) = query.wallet_id {
        builder.push(" AND t.wallet_id = ").push_bind(wallet_id as i64);
    }
    if let Some(user_id) = query.user_id {
        builder.push(" AND w.user_id = ").push_bind(user_id as i64);
    }
    if let Some(currency) = query.currency {
        builder.push(" AND w.currency = ").push_bind(currency.as_str());
    }
    if let Some(status) = query.status {
        builder.push(" AND t.status = ").push_bind(status.as_str());
    }
    if let Some(tx_type) = query.tx_type {
        builder.push(" AND t.tx_type = ").push_bind(tx_type.as_str());
    }
    if let Some(from) = query.created_from {
        builder.push(" AND t.created_at >= ").push_bind(from);
    }
    if let Some(to) = query.created_to {
        builder.push(" AND t.created_at <= ").push_bind(to);
    }
    if let Some(search) = &query.search {
        let pattern = contains_pattern(search);
        builder
            .push(" AND (t.tx_hash ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR t.from_address ILIKE ")
            .push_bind(pattern.clone())
            .push(" ESCAPE '\\' OR t.to_address ILIKE ")
            .push_bind(pattern)
            .push(" ESCAPE '\\')");
    }
}

#[async_trait]
impl TransactionRepository for PgUnitOfWork {
    async fn insert_transaction(&mut self, tx: &NewTransaction) -> Result<Transaction> {
        let row = sqlx::query(
            r#"
            INSERT INTO transactions AS t
                (wallet_id, tx_hash, from_address, to_address, amount, fee, tx_type, status,
                 block_number, confirmations, memo, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING t.id, t.wallet_id, t.tx_hash, t.from_address, t.to_address, t.amount, t.fee,
                      t.tx_type, t.status, t.block_number, t.confirmations, t.memo, t.created_at
            "#,
        )
        .bind(tx.wallet_id as i64)
        .bind(&tx.tx_hash)
        .bind(&tx.from_address)
        .bind(&tx.to_address)
        .bind(tx.amount)
        .bind(tx.fee)
        .bind(tx.tx_type.as_str())
        .bind(tx.status.as_str())
        .bind(tx.block_number.map(|n| n as i64))
        .bind(tx.confirmations.map(|n| n as i32))
        .bind(&tx.memo)
        .bind(Utc::now())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to create transaction"))?;

        transaction_from_row(&row)
    }

    async fn find_transaction_by_hash(&mut self, tx_hash: &str) -> Result<Option<Transaction>> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM transactions t WHERE t.tx_hash = $1",
            TRANSACTION_COLUMNS
        ))
        .bind(tx_hash)
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to fetch transaction by hash"))?;

        row.as_ref().map(transaction_from_row).transpose()
    }

    async fn find_transactions(&mut self, query: &TransactionQuery) -> Result<Vec<Transaction>> {
        let mut builder = QueryBuilder::new(format!("SELECT {}", TRANSACTION_COLUMNS));
        push_transaction_filters(&mut builder, query);
        builder.push(" ORDER BY t.created_at DESC, t.id DESC");

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch transactions"))?;

        rows.iter().map(transaction_from_row).collect()
    }

    async fn find_transaction_page(
        &mut self,
        query: &TransactionQuery,
        page: &PageRequest,
    ) -> Result<Vec<Transaction>> {
        let mut builder = QueryBuilder::new(format!("SELECT {}", TRANSACTION_COLUMNS));
        push_transaction_filters(&mut builder, query);
        let direction = page.direction.as_sql();
        builder.push(format!(
            " ORDER BY t.{} {}, t.id {}",
            page.sort_column, direction, direction
        ));
        builder.push(" LIMIT ").push_bind(page.size as i64);
        builder.push(" OFFSET ").push_bind(page.offset() as i64);

        let rows = builder
            .build()
            .fetch_all(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to fetch transaction page"))?;

        rows.iter().map(transaction_from_row).collect()
    }

    async fn count_transactions(&mut self, query: &TransactionQuery) -> Result<u64> {
        let mut builder = QueryBuilder::new("SELECT COUNT(*) AS count");
        push_transaction_filters(&mut builder, query);

        let row = builder
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to count transactions"))?;

        Ok(row.try_get::<i64, _>("count")? as u64)
    }

    async fn sum_transaction_amount(&mut self, query: &TransactionQuery) -> Result<Decimal> {
        let mut builder = QueryBuilder::new("SELECT COALESCE(SUM(t.amount), 0) AS total");
        push_transaction_filters(&mut builder, query);

        let row = builder
            .build()
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| db_error(e, "Failed to sum transaction amounts"))?;

        Ok(row.try_get::<Decimal, _>("total")?)
    }

    // 상태 머신 검증 없음, block_number / confirmations 그대로 덮어씀
    async fn update_transaction_status(
        &mut self,
        tx_hash: &str,
        status: TransactionStatus,
        block_number: Option<u64>,
        confirmations: Option<u32>,
    ) -> Result<Option<Transaction>> {
        let row = sqlx::query(
            r#"
            UPDATE transactions AS t
            SET status = $2, block_number = $3, confirmations = $4
            WHERE t.tx_hash = $1
            RETURNING t.id, t.wallet_id, t.tx_hash, t.from_address, t.to_address, t.amount, t.fee,
                      t.tx_type, t.status, t.block_number, t.confirmations, t.memo, t.created_at
            "#,
        )
        .bind(tx_hash)
        .bind(status.as_str())
        .bind(block_number.map(|n| n as i64))
        .bind(confirmations.map(|n| n as i32))
        .fetch_optional(&mut *self.tx)
        .await
        .map_err(|e| db_error(e, "Failed to update transaction status"))?;

        row.as_ref().map(transaction_from_row).transpose()
    }
}

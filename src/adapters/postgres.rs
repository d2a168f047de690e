//! Postgres implementations of LedgerStore and AuditStore.

use async_trait::async_trait;
use sqlx::PgPool;
use std::str::FromStr;

use crate::domain::{AuditEntry, Transaction, TransactionStatus};
use crate::ports::{AuditStore, LedgerStore, StoreError, StoreResult};

/// Postgres-backed transaction ledger.
#[derive(Clone)]
pub struct PostgresLedgerStore {
    pool: PgPool,
}

impl PostgresLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PostgresLedgerStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, amount, status, linked_transaction_id, reason, created_at, updated_at
             FROM transactions WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;

        row.map(TransactionRow::into_domain).transpose()
    }

    async fn put(&self, transaction: &Transaction) -> StoreResult<()> {
        // DO NOTHING on the primary key makes retried puts of the
        // same derived record a no-op instead of a duplicate.
        sqlx::query(
            r#"
            INSERT INTO transactions (
                id, amount, status, linked_transaction_id, reason, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(&transaction.id)
        .bind(&transaction.amount)
        .bind(transaction.status.as_str())
        .bind(&transaction.linked_transaction_id)
        .bind(&transaction.reason)
        .bind(transaction.created_at)
        .bind(transaction.updated_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }

    async fn conditional_update(
        &self,
        id: &str,
        expected: TransactionStatus,
        new_status: TransactionStatus,
        linked_id: &str,
    ) -> StoreResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = $1, linked_transaction_id = $2, updated_at = NOW()
            WHERE id = $3 AND status = $4
            "#,
        )
        .bind(new_status.as_str())
        .bind(linked_id)
        .bind(id)
        .bind(expected.as_str())
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict {
                id: id.to_string(),
                expected,
            });
        }

        Ok(())
    }

    async fn entries(&self, transaction_id: &str) -> StoreResult<Vec<Transaction>> {
        let rows = sqlx::query_as::<_, TransactionRow>(
            "SELECT id, amount, status, linked_transaction_id, reason, created_at, updated_at
             FROM transactions
             WHERE id = $1 OR linked_transaction_id = $1
             ORDER BY created_at ASC",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;

        rows.into_iter().map(TransactionRow::into_domain).collect()
    }
}

/// Postgres-backed audit trail.
#[derive(Clone)]
pub struct PostgresAuditStore {
    pool: PgPool,
}

impl PostgresAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PostgresAuditStore {
    async fn put(&self, entry: &AuditEntry) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO audit_trail (
                audit_id, original_transaction_id, derived_transaction_id,
                amount, reason, actor, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (audit_id) DO NOTHING
            "#,
        )
        .bind(&entry.audit_id)
        .bind(&entry.original_transaction_id)
        .bind(&entry.derived_transaction_id)
        .bind(&entry.amount)
        .bind(&entry.reason)
        .bind(&entry.actor)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await
        .map_err(backend)?;

        Ok(())
    }
}

fn backend(err: sqlx::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}

/// Internal row type for SQLx. Not exposed outside the adapter.
#[derive(Debug, sqlx::FromRow)]
struct TransactionRow {
    id: String,
    amount: bigdecimal::BigDecimal,
    status: String,
    linked_transaction_id: Option<String>,
    reason: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

impl TransactionRow {
    fn into_domain(self) -> StoreResult<Transaction> {
        let status = TransactionStatus::from_str(&self.status).map_err(StoreError::Backend)?;

        Ok(Transaction {
            id: self.id,
            amount: self.amount,
            status,
            linked_transaction_id: self.linked_transaction_id,
            reason: self.reason,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

//! Contracts the core requires of its external collaborators.
//!
//! All durable state lives behind these traits; the services receive
//! instances at construction so production adapters and in-memory
//! fakes are interchangeable.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{AuditEntry, NotificationMessage, Transaction, TransactionStatus};

#[derive(Debug, Error)]
pub enum StoreError {
    /// A conditional update found the record no longer in the
    /// expected status. The losing caller must not write an audit
    /// entry or publish a notification.
    #[error("transaction {id} is no longer in status {expected}")]
    Conflict {
        id: String,
        expected: TransactionStatus,
    },

    #[error("store backend error: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("notification channel error: {0}")]
    Backend(String),
}

/// Persistent key-value store of transactions keyed by id.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    async fn get(&self, id: &str) -> StoreResult<Option<Transaction>>;

    /// Create a transaction record. Idempotent: a retried put with an
    /// id that already exists is a no-op, not a duplicate.
    async fn put(&self, transaction: &Transaction) -> StoreResult<()>;

    /// Compare-and-set status update. Succeeds only if the record is
    /// still in `expected`; otherwise returns [`StoreError::Conflict`].
    async fn conditional_update(
        &self,
        id: &str,
        expected: TransactionStatus,
        new_status: TransactionStatus,
        linked_id: &str,
    ) -> StoreResult<()>;

    /// All ledger entries for a transaction id: the record itself
    /// plus any records linked to it.
    async fn entries(&self, transaction_id: &str) -> StoreResult<Vec<Transaction>>;
}

/// Append-only store of audit entries keyed by deterministic audit id.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Persist an audit entry. A retried put with the same audit id
    /// is a no-op.
    async fn put(&self, entry: &AuditEntry) -> StoreResult<()>;
}

/// Ordered, deduplicating delivery channel. Ordering is scoped to the
/// message's group key; delivery is suppressed for repeated dedup
/// keys.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), ChannelError>;
}

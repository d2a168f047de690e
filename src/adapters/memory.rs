//! In-memory implementations of the collaborator contracts.
//!
//! Used by the test suites and for local runs without backing
//! services. They honor the same semantics the production adapters
//! do: idempotent puts, compare-and-set conflicts, and per-group
//! ordered, dedup-keyed delivery. Locks are never held across await
//! points.

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use crate::domain::{AuditEntry, NotificationMessage, Transaction, TransactionStatus};
use crate::ports::{
    AuditStore, ChannelError, LedgerStore, NotificationChannel, StoreError, StoreResult,
};

#[derive(Default)]
pub struct MemoryLedgerStore {
    records: Mutex<HashMap<String, Transaction>>,
}

impl MemoryLedgerStore {
    /// Insert a record directly, bypassing the idempotency rule.
    /// Test setup only.
    pub fn seed(&self, transaction: Transaction) {
        self.records
            .lock()
            .unwrap()
            .insert(transaction.id.clone(), transaction);
    }

    pub fn snapshot(&self, id: &str) -> Option<Transaction> {
        self.records.lock().unwrap().get(id).cloned()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn get(&self, id: &str) -> StoreResult<Option<Transaction>> {
        Ok(self.records.lock().unwrap().get(id).cloned())
    }

    async fn put(&self, transaction: &Transaction) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        records
            .entry(transaction.id.clone())
            .or_insert_with(|| transaction.clone());
        Ok(())
    }

    async fn conditional_update(
        &self,
        id: &str,
        expected: TransactionStatus,
        new_status: TransactionStatus,
        linked_id: &str,
    ) -> StoreResult<()> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .get_mut(id)
            .filter(|record| record.status == expected)
            .ok_or_else(|| StoreError::Conflict {
                id: id.to_string(),
                expected,
            })?;

        record.status = new_status;
        record.linked_transaction_id = Some(linked_id.to_string());
        record.updated_at = Utc::now();
        Ok(())
    }

    async fn entries(&self, transaction_id: &str) -> StoreResult<Vec<Transaction>> {
        let records = self.records.lock().unwrap();
        let mut entries: Vec<Transaction> = records
            .values()
            .filter(|record| {
                record.id == transaction_id
                    || record.linked_transaction_id.as_deref() == Some(transaction_id)
            })
            .cloned()
            .collect();
        entries.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(entries)
    }
}

#[derive(Default)]
pub struct MemoryAuditStore {
    entries: Mutex<HashMap<String, AuditEntry>>,
}

impl MemoryAuditStore {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().unwrap().values().cloned().collect()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn put(&self, entry: &AuditEntry) -> StoreResult<()> {
        let mut entries = self.entries.lock().unwrap();
        entries
            .entry(entry.audit_id.clone())
            .or_insert_with(|| entry.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryChannel {
    published: Mutex<Vec<NotificationMessage>>,
    seen: Mutex<HashSet<String>>,
}

impl MemoryChannel {
    /// Messages actually delivered, in submission order, duplicates
    /// suppressed.
    pub fn published(&self) -> Vec<NotificationMessage> {
        self.published.lock().unwrap().clone()
    }

    /// The delivered messages of one group, in submission order.
    /// Mirrors the per-group streams of the production channel.
    pub fn published_for(&self, group_key: &str) -> Vec<NotificationMessage> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|message| message.group_key == group_key)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    async fn publish(&self, message: &NotificationMessage) -> Result<(), ChannelError> {
        if !self.seen.lock().unwrap().insert(message.dedup_key.clone()) {
            return Ok(());
        }
        self.published.lock().unwrap().push(message.clone());
        Ok(())
    }
}

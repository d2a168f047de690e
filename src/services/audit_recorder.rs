//! Builds and persists the audit entry for a completed reversal.

use std::sync::Arc;
use tracing::info;

use crate::domain::{AuditEntry, Transaction};
use crate::error::AppError;
use crate::ports::AuditStore;

/// The audit entry is the durability checkpoint of a reversal: the
/// conditional ledger update is not considered complete for business
/// purposes until the entry exists, so persistence failure here is
/// fatal to the whole operation.
pub struct AuditRecorder {
    store: Arc<dyn AuditStore>,
}

impl AuditRecorder {
    pub fn new(store: Arc<dyn AuditStore>) -> Self {
        Self { store }
    }

    pub async fn record(
        &self,
        original: &Transaction,
        derived: &Transaction,
        actor: &str,
        reason: &str,
    ) -> Result<AuditEntry, AppError> {
        let entry = AuditEntry::for_reversal(original, derived, actor, reason);
        self.store.put(&entry).await?;

        info!(
            audit_id = %entry.audit_id,
            original_transaction_id = %entry.original_transaction_id,
            derived_transaction_id = %entry.derived_transaction_id,
            "audit trail recorded"
        );

        Ok(entry)
    }
}

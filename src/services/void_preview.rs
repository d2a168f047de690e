//! Void-entry preparation read path.
//!
//! Pure projection over the ledger: retrieves every entry recorded
//! for a transaction id and shapes the void counterparts callers use
//! to preview or drive a subsequent write-path reversal. Shares the
//! terminal-status predicate with the write path.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::VoidEntry;
use crate::error::AppError;
use crate::ports::LedgerStore;

pub struct VoidPreview {
    ledger: Arc<dyn LedgerStore>,
}

impl VoidPreview {
    pub fn new(ledger: Arc<dyn LedgerStore>) -> Self {
        Self { ledger }
    }

    /// Eligibility is all-or-nothing: one terminal entry anywhere in
    /// the set makes the whole transaction ineligible.
    pub async fn prepare(&self, transaction_id: &str) -> Result<Vec<VoidEntry>, AppError> {
        let entries = self.ledger.entries(transaction_id).await?;

        if entries.is_empty() {
            return Err(AppError::NotFound(format!(
                "No ledger entries found for transaction {transaction_id}"
            )));
        }

        if let Some(terminal) = entries.iter().find(|entry| entry.status.is_terminal()) {
            warn!(
                transaction_id,
                status = %terminal.status,
                "transaction not eligible for voiding"
            );
            return Err(AppError::Ineligible {
                id: transaction_id.to_string(),
                status: terminal.status,
            });
        }

        let void_entries: Vec<VoidEntry> = entries
            .iter()
            .map(|entry| VoidEntry::from_entry(entry, transaction_id))
            .collect();

        info!(
            transaction_id,
            count = void_entries.len(),
            "void entries prepared"
        );

        Ok(void_entries)
    }
}

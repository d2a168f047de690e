//! Audit trail entry.
//! Immutable record of one completed reversal. The id is derived
//! deterministically from the derived transaction id so retried
//! writes collapse onto the same entry.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Transaction;

#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub audit_id: String,
    pub original_transaction_id: String,
    pub derived_transaction_id: String,
    pub amount: BigDecimal,
    pub reason: String,
    pub actor: String,
    pub created_at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn audit_id_for(derived_transaction_id: &str) -> String {
        format!("{derived_transaction_id}-AUDIT")
    }

    pub fn for_reversal(
        original: &Transaction,
        derived: &Transaction,
        actor: &str,
        reason: &str,
    ) -> Self {
        Self {
            audit_id: Self::audit_id_for(&derived.id),
            original_transaction_id: original.id.clone(),
            derived_transaction_id: derived.id.clone(),
            amount: derived.amount.clone(),
            reason: reason.to_string(),
            actor: actor.to_string(),
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TransactionStatus;

    #[test]
    fn audit_id_is_deterministic() {
        assert_eq!(AuditEntry::audit_id_for("T1-VOID"), "T1-VOID-AUDIT");
        assert_eq!(AuditEntry::audit_id_for("T1-VOID"), "T1-VOID-AUDIT");
    }

    #[test]
    fn entry_references_both_sides_of_the_reversal() {
        let original =
            Transaction::new("T1", BigDecimal::from(250), TransactionStatus::Completed);
        let mut derived =
            Transaction::new("T1-VOID", BigDecimal::from(-250), TransactionStatus::Voided);
        derived.linked_transaction_id = Some(original.id.clone());

        let entry = AuditEntry::for_reversal(&original, &derived, "U1", "duplicate charge");

        assert_eq!(entry.audit_id, "T1-VOID-AUDIT");
        assert_eq!(entry.original_transaction_id, "T1");
        assert_eq!(entry.derived_transaction_id, "T1-VOID");
        assert_eq!(entry.amount, BigDecimal::from(-250));
        assert_eq!(entry.actor, "U1");
        assert_eq!(entry.reason, "duplicate charge");
    }
}

pub mod audit;
pub mod notification;
pub mod transaction;
pub mod transition;

pub use audit::AuditEntry;
pub use notification::{NotificationMessage, ReversalEvent};
pub use transaction::{Transaction, TransactionStatus, VoidEntry};
pub use transition::{Ineligible, ReversalKind, ReversalPlan};

//! Audit trail entries.

use avstock_shared::types::{LogEntryId, MaterialId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Quantity;

/// One immutable record of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Entry ID.
    pub id: LogEntryId,
    /// Material checked out.
    pub material_id: MaterialId,
    /// Borrower.
    pub user_id: UserId,
    /// Quantity taken out.
    pub quantity: Quantity,
    /// When the checkout committed.
    pub created_at: DateTime<Utc>,
}

//! Results returned to callers of checkout, return and debt listing.

use avstock_shared::types::{DebtId, LogEntryId, MaterialId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::ledger::Quantity;

/// Outcome of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    /// Audit entry written for this checkout.
    pub log_entry_id: LogEntryId,
    /// Material checked out.
    pub material_id: MaterialId,
    /// Borrower.
    pub user_id: UserId,
    /// Quantity taken out.
    pub quantity: Quantity,
    /// On-hand quantity right after this checkout.
    pub remaining_on_hand: Quantity,
    /// The open debt the checkout was added to.
    pub debt_id: DebtId,
    /// Debt amount right after this checkout.
    pub debt_amount: Quantity,
    /// Due date of the debt; the first checkout on an open debt sets it.
    pub due_date: NaiveDate,
    /// When the checkout was recorded.
    pub created_at: DateTime<Utc>,
    /// True if this receipt was served from an earlier checkout with the
    /// same idempotency key.
    pub replayed: bool,
}

/// Debt state after a return.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebtStatus {
    /// Debt the return was applied to.
    pub debt_id: DebtId,
    /// Material given back.
    pub material_id: MaterialId,
    /// Quantity accepted by this return.
    pub returned: Quantity,
    /// Quantity still owed. Zero once settled.
    pub amount: Quantity,
    /// True once the amount reached zero.
    pub settled: bool,
    /// Set when this return settled the debt.
    pub settled_at: Option<DateTime<Utc>>,
    /// Due date of the debt.
    pub due_date: NaiveDate,
    /// On-hand quantity of the material right after the return.
    pub on_hand: Quantity,
}

/// An open debt as listed for its borrower.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDebtView {
    /// Debt ID, used for returns.
    pub debt_id: DebtId,
    /// Borrowed material.
    pub material_id: MaterialId,
    /// Material name at listing time.
    pub material_name: String,
    /// Quantity still owed.
    pub amount: Quantity,
    /// Date the material should be back.
    pub due_date: NaiveDate,
    /// When the debt was opened.
    pub created_at: DateTime<Utc>,
    /// True if `due_date` has passed.
    pub overdue: bool,
}

impl OpenDebtView {
    /// Returns true if a debt due on `due_date` is late on `today`.
    #[must_use]
    pub fn is_overdue(due_date: NaiveDate, today: NaiveDate) -> bool {
        today > due_date
    }
}

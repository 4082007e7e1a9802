//! Reconciliation service for checkout and return planning.
//!
//! Pure business logic: given the locked stock level and debt state, compute
//! the state to persist or the reason the operation is refused. A refused
//! operation writes nothing.

use chrono::NaiveDate;

use super::error::InventoryError;
use crate::debt::DebtState;
use crate::ledger::{Quantity, StockLevel};

/// New stock level and debt state after a checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutPlan {
    /// Stock after the units leave.
    pub stock: StockLevel,
    /// Always `Open` after a checkout.
    pub debt: DebtState,
}

/// New stock level and debt state after a return.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReturnPlan {
    /// Stock after the units come back.
    pub stock: StockLevel,
    /// `Open` with the remainder, or `Settled`.
    pub debt: DebtState,
}

impl ReturnPlan {
    /// Returns true if the return brought the debt to zero.
    #[must_use]
    pub const fn settles(&self) -> bool {
        matches!(self.debt, DebtState::Settled)
    }
}

/// Reconciliation service.
///
/// Holds no state; callers own locking and persistence.
pub struct ReconciliationService;

impl ReconciliationService {
    /// Plan a checkout of `quantity` units.
    ///
    /// Steps:
    /// 1. Validates the quantity is positive
    /// 2. Takes the units off the shelf (fails if not enough on hand)
    /// 3. Opens the debt or adds to the open one
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `InsufficientStock` if `quantity` exceeds what is on hand
    pub fn plan_checkout(
        stock: StockLevel,
        debt: DebtState,
        quantity: Quantity,
        today: NaiveDate,
        due_days: u32,
    ) -> Result<CheckoutPlan, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        let stock = stock.checkout(quantity)?;
        let debt = debt.on_checkout(quantity, today, due_days)?;

        Ok(CheckoutPlan { stock, debt })
    }

    /// Plan a return of `quantity` units against an open debt.
    ///
    /// The debt is checked before the stock so that a return larger than
    /// what this user owes is reported against the debt, even when other
    /// borrowers hold more of the same material.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the debt is not open
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `OverReturn` if `quantity` exceeds the debt or the checked-out stock
    pub fn plan_return(
        stock: StockLevel,
        debt: DebtState,
        quantity: Quantity,
    ) -> Result<ReturnPlan, InventoryError> {
        let debt = debt.on_return(quantity)?;
        let stock = stock.return_stock(quantity)?;

        Ok(ReturnPlan { stock, debt })
    }
}

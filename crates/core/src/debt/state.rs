//! Debt transitions on checkout and return.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::ledger::Quantity;
use crate::reconciliation::InventoryError;

/// An unsettled debt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenDebt {
    /// Quantity still owed. Always positive.
    pub amount: Quantity,
    /// Date the material is due back.
    pub due_date: NaiveDate,
}

/// State of the debt between one user and one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DebtState {
    /// The user has never borrowed this material.
    NoDebt,
    /// The user owes some quantity.
    Open(OpenDebt),
    /// Every unit has been returned. Behaves like `NoDebt` on the next checkout.
    Settled,
}

impl DebtState {
    /// Due date for a debt opened on `today`.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the date overflows the calendar.
    pub fn due_date_from(today: NaiveDate, due_days: u32) -> Result<NaiveDate, InventoryError> {
        today
            .checked_add_days(Days::new(u64::from(due_days)))
            .ok_or_else(|| InventoryError::Internal("due date out of range".to_string()))
    }

    /// Applies a checkout of `quantity`.
    ///
    /// Opens a new debt due `due_days` after `today`, or adds to the open one.
    /// An open debt keeps its original due date.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0` or the amount would overflow
    /// - `Internal` if the due date overflows
    pub fn on_checkout(
        self,
        quantity: Quantity,
        today: NaiveDate,
        due_days: u32,
    ) -> Result<Self, InventoryError> {
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }

        match self {
            Self::NoDebt | Self::Settled => Ok(Self::Open(OpenDebt {
                amount: quantity,
                due_date: Self::due_date_from(today, due_days)?,
            })),
            Self::Open(debt) => {
                let amount = debt
                    .amount
                    .checked_add(quantity)
                    .ok_or(InventoryError::InvalidQuantity(quantity))?;
                Ok(Self::Open(OpenDebt {
                    amount,
                    due_date: debt.due_date,
                }))
            }
        }
    }

    /// Applies a return of `quantity`.
    ///
    /// The amount is decremented; reaching zero settles the debt.
    ///
    /// # Errors
    ///
    /// - `InvalidTransition` if the debt is not open
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `OverReturn` if `quantity` exceeds the amount owed
    pub fn on_return(self, quantity: Quantity) -> Result<Self, InventoryError> {
        let Self::Open(debt) = self else {
            return Err(InventoryError::InvalidTransition {
                from: self.name(),
                action: "return",
            });
        };
        if quantity <= 0 {
            return Err(InventoryError::InvalidQuantity(quantity));
        }
        if quantity > debt.amount {
            return Err(InventoryError::OverReturn {
                requested: quantity,
                outstanding: debt.amount,
            });
        }

        let remaining = debt.amount - quantity;
        if remaining == 0 {
            Ok(Self::Settled)
        } else {
            Ok(Self::Open(OpenDebt {
                amount: remaining,
                due_date: debt.due_date,
            }))
        }
    }

    /// Quantity still owed.
    #[must_use]
    pub const fn amount(&self) -> Quantity {
        match self {
            Self::Open(debt) => debt.amount,
            Self::NoDebt | Self::Settled => 0,
        }
    }

    /// Returns true if the debt is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open(_))
    }

    /// State name, as used in error messages.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NoDebt => "no_debt",
            Self::Open(_) => "open",
            Self::Settled => "settled",
        }
    }
}

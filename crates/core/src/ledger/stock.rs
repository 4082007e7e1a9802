//! Stock level arithmetic for a single material.

use serde::{Deserialize, Serialize};

use crate::reconciliation::InventoryError;

/// Whole units of a material.
pub type Quantity = i32;

/// Quantities tracked for one material.
///
/// `on_hand` is what sits on the shelf; `checked_out` is what borrowers
/// currently hold. Both are always non-negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockLevel {
    on_hand: Quantity,
    checked_out: Quantity,
}

impl StockLevel {
    /// Builds a stock level from stored values.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` if either value is negative.
    pub fn new(on_hand: Quantity, checked_out: Quantity) -> Result<Self, InventoryError> {
        if on_hand < 0 {
            return Err(InventoryError::InvalidQuantity(on_hand));
        }
        if checked_out < 0 {
            return Err(InventoryError::InvalidQuantity(checked_out));
        }
        Ok(Self {
            on_hand,
            checked_out,
        })
    }

    /// Stock level of a newly registered material.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` if `on_hand` is negative.
    pub fn initial(on_hand: Quantity) -> Result<Self, InventoryError> {
        Self::new(on_hand, 0)
    }

    /// Quantity on the shelf.
    #[must_use]
    pub const fn on_hand(&self) -> Quantity {
        self.on_hand
    }

    /// Quantity currently held by borrowers.
    #[must_use]
    pub const fn checked_out(&self) -> Quantity {
        self.checked_out
    }

    /// Takes `quantity` units off the shelf.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `InsufficientStock` if `quantity` exceeds what is on hand
    pub fn checkout(self, quantity: Quantity) -> Result<Self, InventoryError> {
        ensure_positive(quantity)?;
        if quantity > self.on_hand {
            return Err(InventoryError::InsufficientStock {
                requested: quantity,
                available: self.on_hand,
            });
        }
        let checked_out = self
            .checked_out
            .checked_add(quantity)
            .ok_or(InventoryError::InvalidQuantity(quantity))?;

        Ok(Self {
            on_hand: self.on_hand - quantity,
            checked_out,
        })
    }

    /// Puts `quantity` units back on the shelf.
    ///
    /// The ceiling is the quantity currently checked out, not the quantity
    /// on hand.
    ///
    /// # Errors
    ///
    /// - `InvalidQuantity` if `quantity <= 0`
    /// - `OverReturn` if `quantity` exceeds what is checked out
    pub fn return_stock(self, quantity: Quantity) -> Result<Self, InventoryError> {
        ensure_positive(quantity)?;
        if quantity > self.checked_out {
            return Err(InventoryError::OverReturn {
                requested: quantity,
                outstanding: self.checked_out,
            });
        }
        let on_hand = self
            .on_hand
            .checked_add(quantity)
            .ok_or(InventoryError::InvalidQuantity(quantity))?;

        Ok(Self {
            on_hand,
            checked_out: self.checked_out - quantity,
        })
    }

    /// Administrative correction of the on-hand count (stocktake, purchase, loss).
    ///
    /// Material currently out is unaffected.
    ///
    /// # Errors
    ///
    /// Returns `InvalidQuantity` if `on_hand` is negative.
    pub fn adjust(self, on_hand: Quantity) -> Result<Self, InventoryError> {
        Self::new(on_hand, self.checked_out)
    }
}

fn ensure_positive(quantity: Quantity) -> Result<(), InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(quantity));
    }
    Ok(())
}

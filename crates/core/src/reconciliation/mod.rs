//! Debt reconciliation: how checkouts and returns move stock and debts together.
//!
//! This module decides the outcome of an operation from the current stock
//! level and debt state. Persistence and locking live in the repository layer,
//! which loads both rows under lock, asks [`ReconciliationService`] for a
//! plan, and writes the plan back in the same transaction.

pub mod error;
pub mod retry;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::InventoryError;
pub use retry::RetryPolicy;
pub use service::{CheckoutPlan, ReconciliationService, ReturnPlan};
pub use types::{DebtStatus, OpenDebtView, Receipt};

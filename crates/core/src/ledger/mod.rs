//! Inventory ledger: authoritative on-hand and checked-out quantities.
//!
//! The ledger knows nothing about who holds the material; it only enforces
//! that stock never goes negative and that returns never exceed what is
//! currently out.

pub mod stock;

#[cfg(test)]
mod stock_props;

pub use stock::{Quantity, StockLevel};

//! Core business logic for the audiovisual stock service.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and state transitions live here.
//!
//! # Modules
//!
//! - `ledger` - On-hand and checked-out stock arithmetic
//! - `debt` - Debt state machine per (user, material)
//! - `reconciliation` - Checkout/return planning, error taxonomy, retry policy
//! - `audit` - Checkout log entries and idempotency keys
//! - `auth` - Roles, authenticated actors, password hashing

pub mod audit;
pub mod auth;
pub mod debt;
pub mod ledger;
pub mod reconciliation;

//! Debt state machine for a (user, material) pair.
//!
//! A debt is opened by the first checkout, grows on later checkouts while it
//! is open, and shrinks on every return until it reaches zero and is settled.

pub mod state;

#[cfg(test)]
mod state_props;

pub use state::{DebtState, OpenDebt};

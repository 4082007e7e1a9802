//! Shared types, errors, and configuration for Audiovisual Stock.
//!
//! This crate provides common types used across all other crates:
//! - Typed IDs for type-safe entity references
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management
//! - Bearer token claims and validation

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

#[cfg(test)]
mod jwt_tests;

pub use auth::Claims;
pub use config::{AppConfig, InventoryConfig};
pub use error::AppError;
pub use jwt::{JwtConfig, JwtError, JwtService};

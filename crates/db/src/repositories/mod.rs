//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod catalog;
mod conflict;
pub mod material;
pub mod reconciliation;
pub mod user;

pub use catalog::{CatalogError, CatalogRepository, CreateSupplierInput};
pub use material::{
    CreateMaterialInput, MaterialError, MaterialPage, MaterialRepository, UpdateMaterialInput,
};
pub use reconciliation::ReconciliationRepository;
pub use user::{CreateUserInput, UserError, UserRepository, UserWithProfile};

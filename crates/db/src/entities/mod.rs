//! `SeaORM` entity definitions.

pub mod material_debts;
pub mod material_logs;
pub mod material_returns;
pub mod material_types;
pub mod materials;
pub mod suppliers;
pub mod user_profiles;
pub mod users;

//! Schema migration runner for the inventory database.
//!
//! Reads `DATABASE_URL` and accepts the standard subcommands:
//!   migrator up      - Apply pending migrations
//!   migrator down    - Roll back the inventory schema
//!   migrator status  - List applied and pending migrations
//!   migrator fresh   - Drop everything and migrate from scratch

use avstock_db::migration::Migrator;
use sea_orm_migration::prelude::*;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    cli::run_cli(Migrator).await;
}

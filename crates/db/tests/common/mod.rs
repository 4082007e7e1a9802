//! Shared setup for database integration tests.
//!
//! Tests run against the PostgreSQL instance named by `DATABASE_URL` and are
//! skipped when it is not set. Every test creates its own users and
//! materials with random names, so tests can share one database.

#![allow(dead_code)]

use std::env;

use avstock_core::auth::{Actor, UserRole};
use avstock_db::entities::{materials, users};
use avstock_db::migration::{Migrator, MigratorTrait};
use avstock_db::repositories::{CreateMaterialInput, CreateUserInput};
use avstock_db::{MaterialRepository, ReconciliationRepository, UserRepository};
use avstock_shared::InventoryConfig;
use avstock_shared::types::UserId;
use sea_orm::{Database, DatabaseConnection};
use tokio::sync::OnceCell;
use uuid::Uuid;

static MIGRATED: OnceCell<()> = OnceCell::const_new();

/// Connects to the test database and applies migrations once per test binary.
///
/// Returns `None` (and the test should return early) without `DATABASE_URL`.
pub async fn connect() -> Option<DatabaseConnection> {
    let Ok(url) = env::var("DATABASE_URL") else {
        eprintln!("DATABASE_URL not set, skipping database test");
        return None;
    };

    MIGRATED
        .get_or_init(|| async {
            let db = Database::connect(&url).await.expect("connect for migrations");
            Migrator::up(&db, None).await.expect("run migrations");
        })
        .await;

    Some(Database::connect(&url).await.expect("connect to test database"))
}

/// Reconciliation repository with the default inventory settings.
pub fn reconciliation(db: &DatabaseConnection) -> ReconciliationRepository {
    ReconciliationRepository::new(db.clone(), InventoryConfig::default())
}

/// Creates an active user through the user factory.
pub async fn create_user(db: &DatabaseConnection, role: UserRole) -> users::Model {
    UserRepository::new(db.clone())
        .create_with_profile(CreateUserInput {
            email: format!("it-{}@avstock.test", Uuid::new_v4()),
            password: "correct horse battery staple".to_string(),
            full_name: "Integration Tester".to_string(),
            role,
            is_staff: role != UserRole::Borrower,
            bio: None,
        })
        .await
        .expect("create user")
        .user
}

/// Creates a user and wraps it in an actor.
pub async fn create_actor(db: &DatabaseConnection) -> Actor {
    let user = create_user(db, UserRole::Staff).await;
    actor_for(&user)
}

/// Builds an actor for an existing user row.
pub fn actor_for(user: &users::Model) -> Actor {
    let role = user.role.parse().unwrap_or(UserRole::Borrower);
    Actor::from_identity(Some((UserId::from_uuid(user.id), role))).expect("actor")
}

/// Registers a material with `quantity` units on hand.
pub async fn create_material(
    db: &DatabaseConnection,
    creator: &Actor,
    name: &str,
    quantity: i32,
) -> materials::Model {
    MaterialRepository::new(db.clone())
        .create(CreateMaterialInput {
            reference_code: format!("IT-{}", Uuid::new_v4()),
            name: name.to_string(),
            quantity,
            material_type_id: None,
            supplier_id: None,
            purchase_date: None,
            serial_number: None,
            created_by: creator.user_id().into_inner(),
        })
        .await
        .expect("create material")
}

/// Reloads a material row.
pub async fn reload(db: &DatabaseConnection, id: Uuid) -> materials::Model {
    MaterialRepository::new(db.clone())
        .find_by_id(id)
        .await
        .expect("query material")
        .expect("material exists")
}

//! Integration tests for the user factory.

mod common;

use avstock_core::auth::{UserRole, verify_password};
use avstock_db::UserRepository;
use avstock_db::entities::user_profiles;
use avstock_db::repositories::{CreateUserInput, UserError};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use uuid::Uuid;

use common::connect;

fn input(email: &str) -> CreateUserInput {
    CreateUserInput {
        email: email.to_string(),
        password: "s3cret-pass".to_string(),
        full_name: "Ada Borrower".to_string(),
        role: UserRole::Borrower,
        is_staff: false,
        bio: Some("Film student".to_string()),
    }
}

#[tokio::test]
async fn test_factory_creates_user_and_profile() {
    let Some(db) = connect().await else { return };
    let repo = UserRepository::new(db.clone());
    let email = format!("Factory-{}@AVSTOCK.test", Uuid::new_v4());

    let created = repo.create_with_profile(input(&email)).await.unwrap();

    assert_eq!(created.user.email, email.to_lowercase());
    assert_eq!(created.user.role, "borrower");
    assert!(created.user.is_active);
    assert_eq!(created.profile.user_id, created.user.id);
    assert_eq!(created.profile.display_name, "Ada Borrower");
    assert!(verify_password("s3cret-pass", &created.user.password_hash).unwrap());

    let found = repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(found.id, created.user.id);
    let profile = repo.find_profile(created.user.id).await.unwrap();
    assert_eq!(profile.map(|p| p.id), Some(created.profile.id));
}

#[tokio::test]
async fn test_duplicate_email_leaves_no_orphan_profile() {
    let Some(db) = connect().await else { return };
    let repo = UserRepository::new(db.clone());
    let email = format!("dup-{}@avstock.test", Uuid::new_v4());

    let first = repo.create_with_profile(input(&email)).await.unwrap();
    let second = repo.create_with_profile(input(&email)).await;
    assert!(matches!(second, Err(UserError::EmailTaken(_))));

    let profiles = user_profiles::Entity::find()
        .filter(user_profiles::Column::UserId.eq(first.user.id))
        .count(&db)
        .await
        .unwrap();
    assert_eq!(profiles, 1);
}

#[tokio::test]
async fn test_deactivate_unknown_user() {
    let Some(db) = connect().await else { return };
    let repo = UserRepository::new(db.clone());
    let missing = Uuid::now_v7();

    assert!(matches!(
        repo.deactivate(missing).await,
        Err(UserError::NotFound(id)) if id == missing
    ));
}

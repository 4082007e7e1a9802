//! User repository: the user factory and identity lookups.

use avstock_core::auth::{PasswordError, UserRole, hash_password};
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, TransactionTrait,
};
use uuid::Uuid;

use super::conflict::is_unique_violation;
use crate::entities::{user_profiles, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email is already registered.
    #[error("Email already registered: {0}")]
    EmailTaken(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// Password could not be hashed.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for the user factory.
#[derive(Debug, Clone)]
pub struct CreateUserInput {
    /// Login email, stored lowercase.
    pub email: String,
    /// Plain-text password; only its hash is stored.
    pub password: String,
    /// Full name, also used as the profile display name.
    pub full_name: String,
    /// Role within the organization.
    pub role: UserRole,
    /// Whether the user belongs to the equipment staff.
    pub is_staff: bool,
    /// Optional profile biography.
    pub bio: Option<String>,
}

/// A user together with their profile.
#[derive(Debug, Clone)]
pub struct UserWithProfile {
    /// The user record.
    pub user: users::Model,
    /// The profile created alongside it.
    pub profile: user_profiles::Model,
}

/// User repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a user and their profile in one transaction.
    ///
    /// Either both rows exist afterwards or neither does.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The email is already registered
    /// - The password cannot be hashed
    /// - Database operation fails
    pub async fn create_with_profile(
        &self,
        input: CreateUserInput,
    ) -> Result<UserWithProfile, UserError> {
        let email = input.email.trim().to_lowercase();
        let password_hash = hash_password(&input.password)?;

        let txn = self.db.begin().await?;

        let exists = users::Entity::find()
            .filter(users::Column::Email.eq(&email))
            .count(&txn)
            .await?
            > 0;
        if exists {
            return Err(UserError::EmailTaken(email));
        }

        let now = Utc::now().into();
        let user_id = Uuid::now_v7();

        let user = users::ActiveModel {
            id: Set(user_id),
            email: Set(email.clone()),
            password_hash: Set(password_hash),
            full_name: Set(input.full_name.clone()),
            role: Set(input.role.as_str().to_string()),
            is_active: Set(true),
            is_staff: Set(input.is_staff),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                UserError::EmailTaken(email.clone())
            } else {
                UserError::Database(e)
            }
        })?;

        let profile = user_profiles::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            display_name: Set(input.full_name),
            bio: Set(input.bio),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;

        tracing::info!(user_id = %user.id, role = %user.role, "user created");

        Ok(UserWithProfile { user, profile })
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email.trim().to_lowercase()))
            .one(&self.db)
            .await
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user's profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_profile(
        &self,
        user_id: Uuid,
    ) -> Result<Option<user_profiles::Model>, DbErr> {
        user_profiles::Entity::find()
            .filter(user_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Deactivates a user. Inactive users can no longer check out or return material.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn deactivate(&self, id: Uuid) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(id))?;

        let mut active: users::ActiveModel = user.into();
        active.is_active = Set(false);
        active.updated_at = Set(Utc::now().into());
        Ok(active.update(&self.db).await?)
    }
}

//! Material type and supplier repository.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Set,
};
use uuid::Uuid;

use super::conflict::is_unique_violation;
use crate::entities::{material_types, suppliers};

/// Error types for catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Name is blank.
    #[error("Name must not be empty")]
    EmptyName,

    /// Another entry already uses this name.
    #[error("Name already in use: {0}")]
    DuplicateName(String),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a supplier.
#[derive(Debug, Clone)]
pub struct CreateSupplierInput {
    /// Supplier name (unique).
    pub name: String,
    /// Contact email.
    pub contact_email: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
}

/// Repository for material types and suppliers.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    db: DatabaseConnection,
}

impl CatalogRepository {
    /// Creates a new catalog repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a material type.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` or `DuplicateName` for invalid names.
    pub async fn create_material_type(
        &self,
        name: &str,
    ) -> Result<material_types::Model, CatalogError> {
        let name = normalize_name(name)?;

        material_types::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.clone()),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| duplicate_or_db(e, name))
    }

    /// Lists material types alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_material_types(&self) -> Result<Vec<material_types::Model>, DbErr> {
        material_types::Entity::find()
            .order_by_asc(material_types::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a material type by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_material_type_by_name(
        &self,
        name: &str,
    ) -> Result<Option<material_types::Model>, DbErr> {
        material_types::Entity::find()
            .filter(material_types::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
    }

    /// Creates a supplier.
    ///
    /// # Errors
    ///
    /// Returns `EmptyName` or `DuplicateName` for invalid names.
    pub async fn create_supplier(
        &self,
        input: CreateSupplierInput,
    ) -> Result<suppliers::Model, CatalogError> {
        let name = normalize_name(&input.name)?;

        suppliers::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(name.clone()),
            contact_email: Set(input.contact_email),
            phone: Set(input.phone),
            created_at: Set(Utc::now().into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| duplicate_or_db(e, name))
    }

    /// Lists suppliers alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_suppliers(&self) -> Result<Vec<suppliers::Model>, DbErr> {
        suppliers::Entity::find()
            .order_by_asc(suppliers::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a supplier by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_supplier_by_name(
        &self,
        name: &str,
    ) -> Result<Option<suppliers::Model>, DbErr> {
        suppliers::Entity::find()
            .filter(suppliers::Column::Name.eq(name.trim()))
            .one(&self.db)
            .await
    }
}

/// Trims a catalog name and rejects blank ones.
pub fn normalize_name(name: &str) -> Result<String, CatalogError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(CatalogError::EmptyName);
    }
    Ok(name.to_string())
}

fn duplicate_or_db(err: DbErr, name: String) -> CatalogError {
    if is_unique_violation(&err) {
        CatalogError::DuplicateName(name)
    } else {
        CatalogError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_name_trims() {
        assert_eq!(normalize_name("  Cameras ").unwrap(), "Cameras");
    }

    #[test]
    fn test_normalize_name_rejects_blank() {
        assert!(matches!(normalize_name("   "), Err(CatalogError::EmptyName)));
        assert!(matches!(normalize_name(""), Err(CatalogError::EmptyName)));
    }
}

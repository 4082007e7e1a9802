//! Material catalog repository: registration, listing and administrative edits.
//!
//! Checkout and return never go through here; they live in the
//! reconciliation repository so stock has exactly one write path per flow.

use avstock_core::ledger::StockLevel;
use avstock_core::reconciliation::InventoryError;
use avstock_shared::types::PageRequest;
use chrono::{NaiveDate, Utc};
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use super::conflict::is_unique_violation;
use crate::entities::{material_types, materials, suppliers};

/// Error types for material catalog operations.
#[derive(Debug, thiserror::Error)]
pub enum MaterialError {
    /// Material not found.
    #[error("Material not found: {0}")]
    NotFound(Uuid),

    /// Reference code already in use.
    #[error("Reference code already in use: {0}")]
    DuplicateReference(String),

    /// Material type does not exist.
    #[error("Material type not found: {0}")]
    UnknownType(Uuid),

    /// Supplier does not exist.
    #[error("Supplier not found: {0}")]
    UnknownSupplier(Uuid),

    /// Name or reference code is blank.
    #[error("{0} must not be empty")]
    EmptyField(&'static str),

    /// Quantity rejected by the stock ledger.
    #[error(transparent)]
    Stock(#[from] InventoryError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a material.
#[derive(Debug, Clone)]
pub struct CreateMaterialInput {
    /// Unique reference code.
    pub reference_code: String,
    /// Display name.
    pub name: String,
    /// Initial on-hand quantity.
    pub quantity: i32,
    /// Material type.
    pub material_type_id: Option<Uuid>,
    /// Supplier.
    pub supplier_id: Option<Uuid>,
    /// Purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// Serial number.
    pub serial_number: Option<String>,
    /// User registering the material.
    pub created_by: Uuid,
}

/// Administrative edit. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateMaterialInput {
    /// New reference code.
    pub reference_code: Option<String>,
    /// New name.
    pub name: Option<String>,
    /// Corrected on-hand quantity (stocktake).
    pub quantity: Option<i32>,
    /// New material type.
    pub material_type_id: Option<Uuid>,
    /// New supplier.
    pub supplier_id: Option<Uuid>,
    /// New purchase date.
    pub purchase_date: Option<NaiveDate>,
    /// New serial number.
    pub serial_number: Option<String>,
}

/// One page of materials.
#[derive(Debug, Clone)]
pub struct MaterialPage {
    /// Materials on this page, by name.
    pub materials: Vec<materials::Model>,
    /// Total number of materials.
    pub total: u64,
}

/// Material repository.
#[derive(Debug, Clone)]
pub struct MaterialRepository {
    db: DatabaseConnection,
}

impl MaterialRepository {
    /// Creates a new material repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Registers a material with nothing checked out.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The reference code or name is blank, or the code is taken
    /// - The quantity is negative
    /// - The type or supplier does not exist
    pub async fn create(&self, input: CreateMaterialInput) -> Result<materials::Model, MaterialError> {
        let reference_code = required(&input.reference_code, "reference_code")?;
        let name = required(&input.name, "name")?;
        let stock = StockLevel::initial(input.quantity)?;

        if let Some(type_id) = input.material_type_id {
            self.ensure_type_exists(type_id).await?;
        }
        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        let now = Utc::now().into();
        materials::ActiveModel {
            id: Set(Uuid::now_v7()),
            reference_code: Set(reference_code.clone()),
            name: Set(name),
            quantity: Set(stock.on_hand()),
            checked_out: Set(stock.checked_out()),
            material_type_id: Set(input.material_type_id),
            supplier_id: Set(input.supplier_id),
            purchase_date: Set(input.purchase_date),
            serial_number: Set(input.serial_number),
            created_by: Set(input.created_by),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await
        .map_err(|e| duplicate_or_db(e, reference_code))
    }

    /// Finds a material by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<materials::Model>, DbErr> {
        materials::Entity::find_by_id(id).one(&self.db).await
    }

    /// Lists materials by name, one page at a time.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self, page: &PageRequest) -> Result<MaterialPage, DbErr> {
        let page = page.clamped();
        let total = materials::Entity::find().count(&self.db).await?;

        let materials = materials::Entity::find()
            .order_by_asc(materials::Column::Name)
            .order_by_asc(materials::Column::Id)
            .offset(page.offset())
            .limit(page.limit())
            .all(&self.db)
            .await?;

        Ok(MaterialPage { materials, total })
    }

    /// Applies an administrative edit.
    ///
    /// A quantity change is a stocktake correction of the on-hand count; it
    /// runs under the same row lock as checkout and return and leaves the
    /// checked-out quantity alone.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the material does not exist, or a validation error.
    pub async fn update(
        &self,
        id: Uuid,
        input: UpdateMaterialInput,
    ) -> Result<materials::Model, MaterialError> {
        if let Some(type_id) = input.material_type_id {
            self.ensure_type_exists(type_id).await?;
        }
        if let Some(supplier_id) = input.supplier_id {
            self.ensure_supplier_exists(supplier_id).await?;
        }

        let txn = self.db.begin().await?;

        let material = materials::Entity::find_by_id(id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or(MaterialError::NotFound(id))?;

        let stock = StockLevel::new(material.quantity, material.checked_out)?;
        let mut active: materials::ActiveModel = material.into();

        if let Some(quantity) = input.quantity {
            let adjusted = stock.adjust(quantity)?;
            active.quantity = Set(adjusted.on_hand());
        }
        let mut new_code = None;
        if let Some(code) = input.reference_code {
            let code = required(&code, "reference_code")?;
            active.reference_code = Set(code.clone());
            new_code = Some(code);
        }
        if let Some(name) = input.name {
            active.name = Set(required(&name, "name")?);
        }
        if let Some(type_id) = input.material_type_id {
            active.material_type_id = Set(Some(type_id));
        }
        if let Some(supplier_id) = input.supplier_id {
            active.supplier_id = Set(Some(supplier_id));
        }
        if let Some(date) = input.purchase_date {
            active.purchase_date = Set(Some(date));
        }
        if let Some(serial) = input.serial_number {
            active.serial_number = Set(Some(serial));
        }
        active.updated_at = Set(Utc::now().into());

        let updated = active.update(&txn).await.map_err(|e| match new_code {
            Some(code) => duplicate_or_db(e, code),
            None => MaterialError::Database(e),
        })?;

        txn.commit().await?;

        tracing::info!(
            material_id = %updated.id,
            quantity = updated.quantity,
            checked_out = updated.checked_out,
            "material updated"
        );

        Ok(updated)
    }

    async fn ensure_type_exists(&self, id: Uuid) -> Result<(), MaterialError> {
        material_types::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(MaterialError::UnknownType(id))
    }

    async fn ensure_supplier_exists(&self, id: Uuid) -> Result<(), MaterialError> {
        suppliers::Entity::find_by_id(id)
            .one(&self.db)
            .await?
            .map(|_| ())
            .ok_or(MaterialError::UnknownSupplier(id))
    }
}

fn required(value: &str, field: &'static str) -> Result<String, MaterialError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(MaterialError::EmptyField(field));
    }
    Ok(value.to_string())
}

fn duplicate_or_db(err: DbErr, reference_code: String) -> MaterialError {
    if is_unique_violation(&err) {
        MaterialError::DuplicateReference(reference_code)
    } else {
        MaterialError::Database(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_trims() {
        assert_eq!(required("  CAM-01 ", "reference_code").unwrap(), "CAM-01");
    }

    #[test]
    fn test_required_rejects_blank() {
        assert!(matches!(
            required("  ", "name"),
            Err(MaterialError::EmptyField("name"))
        ));
    }
}

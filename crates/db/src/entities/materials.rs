//! `SeaORM` Entity for materials table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "materials")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub reference_code: String,
    pub name: String,
    /// On-hand quantity.
    pub quantity: i32,
    /// Quantity currently held by borrowers.
    pub checked_out: i32,
    pub material_type_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub purchase_date: Option<Date>,
    pub serial_number: Option<String>,
    pub created_by: Uuid,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_types::Entity",
        from = "Column::MaterialTypeId",
        to = "super::material_types::Column::Id"
    )]
    MaterialTypes,
    #[sea_orm(
        belongs_to = "super::suppliers::Entity",
        from = "Column::SupplierId",
        to = "super::suppliers::Column::Id"
    )]
    Suppliers,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::CreatedBy",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::material_debts::Entity")]
    MaterialDebts,
    #[sea_orm(has_many = "super::material_logs::Entity")]
    MaterialLogs,
}

impl Related<super::material_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialTypes.def()
    }
}

impl Related<super::suppliers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Suppliers.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::material_debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialDebts.def()
    }
}

impl Related<super::material_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

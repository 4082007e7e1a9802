//! `SeaORM` Entity for material_returns table (append-only).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "material_returns")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub debt_id: Uuid,
    pub material_id: Uuid,
    pub user_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::material_debts::Entity",
        from = "Column::DebtId",
        to = "super::material_debts::Column::Id"
    )]
    MaterialDebts,
}

impl Related<super::material_debts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MaterialDebts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for material_logs table (append-only).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "material_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub material_id: Uuid,
    pub user_id: Uuid,
    pub debt_id: Uuid,
    pub quantity: i32,
    pub on_hand_after: i32,
    pub debt_amount_after: i32,
    pub idempotency_key: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::materials::Entity",
        from = "Column::MaterialId",
        to = "super::materials::Column::Id"
    )]
    Materials,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::material_debts::Entity",
        from = "Column::DebtId",
        to = "super::material_debts::Column::Id"
    )]
    MaterialDebts,
}

impl Related<super::materials::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Materials.def()
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

impl ActiveModelBehavior for ActiveModel {}

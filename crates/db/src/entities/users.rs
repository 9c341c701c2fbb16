//! `SeaORM` Entity for the users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub full_name: String,
    #[sea_orm(unique)]
    pub email: String,
    pub role: UserRole,
    pub region: String,
    pub category: Option<String>,
    pub subregion: Option<String>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::deals::Entity")]
    Deals,
    #[sea_orm(has_many = "super::points_ledger_entries::Entity")]
    PointsLedgerEntries,
    #[sea_orm(has_many = "super::goals_ledger_entries::Entity")]
    GoalsLedgerEntries,
}

impl Related<super::deals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl Related<super::points_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PointsLedgerEntries.def()
    }
}

impl Related<super::goals_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalsLedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! `SeaORM` Entity for the deals table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::{DealStatus, DealType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "deals")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_type: DealType,
    pub value: Decimal,
    pub status: DealStatus,
    pub points_earned: i64,
    pub goals_earned: Decimal,
    pub close_date: Date,
    pub approved_by: Option<Uuid>,
    pub approved_at: Option<DateTimeWithTimeZone>,
    pub description: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::points_ledger_entries::Entity")]
    PointsLedgerEntries,
    #[sea_orm(has_many = "super::goals_ledger_entries::Entity")]
    GoalsLedgerEntries,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
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

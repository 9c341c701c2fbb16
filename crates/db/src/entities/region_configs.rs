//! `SeaORM` Entity for the region_configs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "region_configs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub region: String,
    pub category: String,
    pub subregion: Option<String>,
    pub new_customer_goal_rate: Decimal,
    pub renewal_goal_rate: Decimal,
    pub monthly_goal_target: Decimal,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::goals_ledger_entries::Entity")]
    GoalsLedgerEntries,
}

impl Related<super::goals_ledger_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GoalsLedgerEntries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

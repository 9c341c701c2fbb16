//! `SeaORM` Entity for the goals_ledger_entries table.
//!
//! Entries are immutable. The attribution month and year come from the
//! deal's close date, not the approval time.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "goals_ledger_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub deal_id: Uuid,
    pub delta: Decimal,
    pub month: i16,
    pub year: i16,
    pub region_config_id: Uuid,
    pub description: String,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::deals::Entity",
        from = "Column::DealId",
        to = "super::deals::Column::Id"
    )]
    Deals,
    #[sea_orm(
        belongs_to = "super::region_configs::Entity",
        from = "Column::RegionConfigId",
        to = "super::region_configs::Column::Id"
    )]
    RegionConfigs,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::deals::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Deals.def()
    }
}

impl Related<super::region_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RegionConfigs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

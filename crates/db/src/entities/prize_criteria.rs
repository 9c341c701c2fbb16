//! `SeaORM` Entity for the prize_criteria table.
//!
//! At most one row is active at any time. A partial unique index backs
//! the guarded deactivate-all-then-activate-one transaction.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::CriteriaType;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "prize_criteria")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub criteria_type: CriteriaType,
    pub region: Option<String>,
    pub category: Option<String>,
    pub subregion: Option<String>,
    pub min_points: Option<i64>,
    pub min_deals: Option<i64>,
    pub points_weight: i16,
    pub deals_weight: i16,
    pub starts_on: Option<Date>,
    pub ends_on: Option<Date>,
    pub is_active: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

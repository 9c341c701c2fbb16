//! `SeaORM` active enums backing the Postgres enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User role in the platform.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Registered seller who logs deals.
    #[sea_orm(string_value = "seller")]
    Seller,
    /// Manager who approves deals.
    #[sea_orm(string_value = "manager")]
    Manager,
    /// Administrator with configuration access.
    #[sea_orm(string_value = "admin")]
    Admin,
}

/// Deal type classification.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deal_type")]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    /// Sale to a customer with no prior contract.
    #[sea_orm(string_value = "new_customer")]
    NewCustomer,
    /// Renewal of an existing contract.
    #[sea_orm(string_value = "renewal")]
    Renewal,
}

/// Deal status in the approval lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "deal_status")]
#[serde(rename_all = "lowercase")]
pub enum DealStatus {
    /// Awaiting an approval decision.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Approved; accruals recorded.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected; no accruals.
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

/// Prize criteria scoring mode.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "criteria_type")]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    /// Score by total earned points.
    #[sea_orm(string_value = "points")]
    Points,
    /// Score by approved deal count.
    #[sea_orm(string_value = "deals")]
    Deals,
    /// Score by weighted points and deal count.
    #[sea_orm(string_value = "combined")]
    Combined,
    /// Score by goals ledger total.
    #[sea_orm(string_value = "top_goals")]
    TopGoals,
}

//! `SeaORM` entity definitions.

pub mod audit_log;
pub mod deals;
pub mod goals_ledger_entries;
pub mod points_configs;
pub mod points_ledger_entries;
pub mod prize_criteria;
pub mod region_configs;
pub mod sea_orm_active_enums;
pub mod users;

//! Accrual ledger rules.
//!
//! Both ledgers are append/remove logs. Entries are never updated in
//! place; recalculation retracts a deal's entries and records fresh ones,
//! keeping the ledgers auditable and totals reproducible from the entries
//! alone. This module holds the rules every writer shares: close-date
//! attribution and write-time rounding.

pub mod entry;

pub use entry::{AttributionMonth, round_goal_delta};

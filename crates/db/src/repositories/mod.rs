//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod approval;
pub mod config;
pub mod criteria;
pub mod deal;
pub mod ledger;
pub mod ranking;
pub mod recalculation;
pub mod user;

pub use approval::ApprovalRepository;
pub use config::{
    ConfigError, ConfigRepository, CreatePointsConfigInput, CreateRegionConfigInput,
    UpdatePointsConfigInput, UpdateRegionConfigInput,
};
pub use criteria::{CreateCriteriaInput, CriteriaError, CriteriaRepository, UpdateCriteriaInput};
pub use deal::{CreateDealInput, DealFilter, DealRepository, DealStoreError};
pub use ledger::{LedgerError, LedgerRepository};
pub use ranking::{GoalProgressRow, RankingError, RankingRepository};
pub use recalculation::{RecalculationJob, RecalculationSummary};
pub use user::{CreateUserInput, UserError, UserRepository};

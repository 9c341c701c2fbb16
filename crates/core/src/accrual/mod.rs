//! Accrual domain: rate resolution and deal-value conversion.
//!
//! An approved deal is converted into two accrual currencies:
//! - points, from the per-region `PointsRates` (dollars per point)
//! - goals, from the per-(region, category, subregion) `RegionRates`
//!
//! Resolution and conversion are pure functions so they can be tested
//! without any storage dependency.

pub mod calculator;
pub mod resolver;
pub mod types;

#[cfg(test)]
mod props;

pub use calculator::AccrualCalculator;
pub use resolver::RateResolver;
pub use types::{DealType, PointsRates, RegionRates, SellerSegment};

//! Property-based tests for accrual calculations.
//!
//! - Points equal floor division of value by rate, and are never negative.
//! - Goals are monotone non-decreasing in deal value for a fixed rate.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use incentiva_shared::types::{PointsConfigId, RegionConfigId};

use super::calculator::AccrualCalculator;
use super::types::{DealType, PointsRates, RegionRates};

/// Strategy to generate positive deal values (0.01 to 10,000,000.00).
fn deal_value() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate any deal value, including non-positive ones.
fn any_value() -> impl Strategy<Value = Decimal> {
    (-1_000_000_000i64..1_000_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to generate positive rates (1.00 to 100,000.00).
fn positive_rate() -> impl Strategy<Value = Decimal> {
    (100i64..10_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Strategy to pick a deal type.
fn deal_type() -> impl Strategy<Value = DealType> {
    prop_oneof![Just(DealType::NewCustomer), Just(DealType::Renewal)]
}

fn points_rates(rate: Decimal) -> PointsRates {
    PointsRates {
        id: PointsConfigId::new(),
        region: "north".to_string(),
        new_customer_rate: rate,
        renewal_rate: rate,
    }
}

fn region_rates(rate: Decimal) -> RegionRates {
    RegionRates {
        id: RegionConfigId::new(),
        region: "north".to_string(),
        category: "gold".to_string(),
        subregion: None,
        new_customer_goal_rate: rate,
        renewal_goal_rate: rate,
        monthly_goal_target: Decimal::ZERO,
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// *For any* value v > 0 and rate r > 0, points == floor(v / r).
    #[test]
    fn prop_points_are_floor_division(
        value in deal_value(),
        rate in positive_rate(),
        dt in deal_type(),
    ) {
        let points = AccrualCalculator::points(value, &points_rates(rate), dt);
        let expected = (value / rate).floor().to_i64().unwrap();
        prop_assert_eq!(points, expected);
    }

    /// *For any* value, points are never negative.
    #[test]
    fn prop_points_never_negative(
        value in any_value(),
        rate in positive_rate(),
        dt in deal_type(),
    ) {
        prop_assert!(AccrualCalculator::points(value, &points_rates(rate), dt) >= 0);
    }

    /// *For any* fixed rate, goals are monotone non-decreasing in deal value.
    #[test]
    fn prop_goals_monotone_in_value(
        value in deal_value(),
        increment in (0i64..1_000_000i64).prop_map(|c| Decimal::new(c, 2)),
        rate in positive_rate(),
        dt in deal_type(),
    ) {
        let rates = region_rates(rate);
        let lower = AccrualCalculator::goals(value, &rates, dt);
        let higher = AccrualCalculator::goals(value + increment, &rates, dt);
        prop_assert!(higher >= lower);
    }

    /// *For any* non-positive value, goals are exactly zero.
    #[test]
    fn prop_goals_zero_for_non_positive_value(
        cents in -1_000_000_000i64..=0i64,
        rate in positive_rate(),
        dt in deal_type(),
    ) {
        let value = Decimal::new(cents, 2);
        prop_assert_eq!(
            AccrualCalculator::goals(value, &region_rates(rate), dt),
            Decimal::ZERO
        );
    }
}

//! Deal-value to points/goals conversion.
//!
//! Both conversions are total functions: a non-positive deal value or a
//! non-positive rate yields zero, never an error. Validation of deal
//! values belongs at the write boundary, not here.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::accrual::types::{DealType, PointsRates, RegionRates};

/// Stateless calculator converting monetary deal values into accruals.
pub struct AccrualCalculator;

impl AccrualCalculator {
    /// Computes redeemable points for a deal: `floor(value / rate)`.
    ///
    /// The rate is the points configuration's dollars-per-point for the
    /// deal's type. Returns 0 for non-positive values or rates.
    #[must_use]
    pub fn points(value: Decimal, rates: &PointsRates, deal_type: DealType) -> i64 {
        let rate = rates.rate_for(deal_type);
        if value <= Decimal::ZERO || rate <= Decimal::ZERO {
            return 0;
        }
        (value / rate).floor().to_i64().unwrap_or(0)
    }

    /// Computes competition goals for a deal: `value / goal_rate`.
    ///
    /// The quotient is returned unrounded. Rounding to two decimal places
    /// happens at the point of ledger write, not earlier, so ranking
    /// aggregation does not drift.
    #[must_use]
    pub fn goals(value: Decimal, rates: &RegionRates, deal_type: DealType) -> Decimal {
        let rate = rates.goal_rate_for(deal_type);
        if value <= Decimal::ZERO || rate <= Decimal::ZERO {
            return Decimal::ZERO;
        }
        value / rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incentiva_shared::types::{PointsConfigId, RegionConfigId};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn points_rates(new_customer: Decimal, renewal: Decimal) -> PointsRates {
        PointsRates {
            id: PointsConfigId::new(),
            region: "north".to_string(),
            new_customer_rate: new_customer,
            renewal_rate: renewal,
        }
    }

    fn region_rates(new_customer: Decimal, renewal: Decimal) -> RegionRates {
        RegionRates {
            id: RegionConfigId::new(),
            region: "north".to_string(),
            category: "gold".to_string(),
            subregion: None,
            new_customer_goal_rate: new_customer,
            renewal_goal_rate: renewal,
            monthly_goal_target: dec!(100),
        }
    }

    #[test]
    fn test_points_floor_division() {
        let rates = points_rates(dec!(1000), dec!(1500));
        assert_eq!(
            AccrualCalculator::points(dec!(50_000), &rates, DealType::NewCustomer),
            50
        );
        // 50,999 / 1000 floors to 50
        assert_eq!(
            AccrualCalculator::points(dec!(50_999), &rates, DealType::NewCustomer),
            50
        );
    }

    #[test]
    fn test_points_uses_rate_for_deal_type() {
        let rates = points_rates(dec!(1000), dec!(2000));
        assert_eq!(
            AccrualCalculator::points(dec!(10_000), &rates, DealType::Renewal),
            5
        );
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-1))]
    #[case(dec!(-50_000))]
    fn test_points_non_positive_value_yields_zero(#[case] value: Decimal) {
        let rates = points_rates(dec!(1000), dec!(1500));
        assert_eq!(AccrualCalculator::points(value, &rates, DealType::NewCustomer), 0);
    }

    #[test]
    fn test_points_non_positive_rate_yields_zero() {
        let rates = points_rates(dec!(0), dec!(-10));
        assert_eq!(
            AccrualCalculator::points(dec!(50_000), &rates, DealType::NewCustomer),
            0
        );
        assert_eq!(
            AccrualCalculator::points(dec!(50_000), &rates, DealType::Renewal),
            0
        );
    }

    #[test]
    fn test_goals_new_customer() {
        let rates = region_rates(dec!(1000), dec!(2000));
        assert_eq!(
            AccrualCalculator::goals(dec!(50_000), &rates, DealType::NewCustomer),
            dec!(50)
        );
    }

    #[test]
    fn test_goals_renewal() {
        let rates = region_rates(dec!(1000), dec!(2000));
        assert_eq!(
            AccrualCalculator::goals(dec!(160_000), &rates, DealType::Renewal),
            dec!(80)
        );
    }

    #[test]
    fn test_goals_unrounded_quotient() {
        // 100 / 3000 keeps full precision here; rounding happens at ledger write.
        let rates = region_rates(dec!(3000), dec!(3000));
        let goals = AccrualCalculator::goals(dec!(100), &rates, DealType::NewCustomer);
        assert!(goals > dec!(0.0333) && goals < dec!(0.0334));
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-100))]
    fn test_goals_non_positive_value_yields_zero(#[case] value: Decimal) {
        let rates = region_rates(dec!(1000), dec!(2000));
        assert_eq!(
            AccrualCalculator::goals(value, &rates, DealType::NewCustomer),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_goals_zero_rate_yields_zero() {
        let rates = region_rates(dec!(0), dec!(0));
        assert_eq!(
            AccrualCalculator::goals(dec!(50_000), &rates, DealType::NewCustomer),
            Decimal::ZERO
        );
    }
}

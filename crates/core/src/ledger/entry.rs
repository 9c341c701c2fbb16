//! Attribution and rounding rules for ledger writes.

use chrono::{Datelike, NaiveDate};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// The month a goals accrual is attributed to.
///
/// Derived from the deal's close date, never from the approval time, so a
/// backdated deal lands in the competition period it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttributionMonth {
    /// Calendar month, 1 to 12.
    pub month: u8,
    /// Calendar year.
    pub year: i32,
}

impl AttributionMonth {
    /// Derives the attribution month from a deal's close date.
    #[must_use]
    pub fn from_close_date(close_date: NaiveDate) -> Self {
        Self {
            // Month of a NaiveDate is always 1..=12.
            month: u8::try_from(close_date.month()).unwrap_or(1),
            year: close_date.year(),
        }
    }
}

/// Rounds a raw goals quotient to two decimal places for ledger storage.
///
/// Rounding happens here, at the point of write, and nowhere earlier, so
/// ranking aggregation never sees pre-rounded drift.
#[must_use]
pub fn round_goal_delta(raw: Decimal) -> Decimal {
    raw.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_attribution_month_from_close_date() {
        let date = NaiveDate::from_ymd_opt(2025, 11, 3).unwrap();
        let attribution = AttributionMonth::from_close_date(date);
        assert_eq!(attribution.month, 11);
        assert_eq!(attribution.year, 2025);
    }

    #[test]
    fn test_attribution_uses_close_date_not_now() {
        // A backdated close date attributes to its own month.
        let date = NaiveDate::from_ymd_opt(2023, 1, 31).unwrap();
        let attribution = AttributionMonth::from_close_date(date);
        assert_eq!((attribution.month, attribution.year), (1, 2023));
    }

    #[test]
    fn test_round_goal_delta_two_places() {
        assert_eq!(round_goal_delta(dec!(49.999)), dec!(50.00));
        assert_eq!(round_goal_delta(dec!(0.333333)), dec!(0.33));
        assert_eq!(round_goal_delta(dec!(80)), dec!(80.00));
    }

    #[test]
    fn test_round_goal_delta_midpoint_away_from_zero() {
        assert_eq!(round_goal_delta(dec!(0.125)), dec!(0.13));
        assert_eq!(round_goal_delta(dec!(-0.125)), dec!(-0.13));
    }
}

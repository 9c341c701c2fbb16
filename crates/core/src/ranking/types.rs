//! Ranking domain types: prize criteria and derived entries.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use incentiva_shared::types::{CriteriaId, UserId};

/// How a prize criteria scores its candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CriteriaType {
    /// Score is the user's total earned points.
    Points,
    /// Score is the user's approved deal count.
    Deals,
    /// Score is a weighted combination of points and deal count.
    Combined,
    /// Score is the user's goals ledger total.
    TopGoals,
}

impl CriteriaType {
    /// Returns the string representation of the criteria type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Deals => "deals",
            Self::Combined => "combined",
            Self::TopGoals => "top_goals",
        }
    }

    /// Parses a criteria type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "points" => Some(Self::Points),
            "deals" => Some(Self::Deals),
            "combined" => Some(Self::Combined),
            "top_goals" => Some(Self::TopGoals),
            _ => None,
        }
    }
}

impl fmt::Display for CriteriaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A named, time-boxed prize selection rule.
///
/// Each optional filter field is an independent predicate; absent means
/// "no restriction". The literal region `"all"` is a legacy sentinel with
/// the same meaning as an absent region filter.
///
/// At most one criteria may be active globally at a time; activation
/// deactivates all others. This is enforced at the data-access boundary,
/// not here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrizeCriteria {
    /// Criteria identity.
    pub id: CriteriaId,
    /// Human-readable name.
    pub name: String,
    /// Scoring mode.
    pub criteria_type: CriteriaType,
    /// Region restriction, if any.
    pub region: Option<String>,
    /// Partner category restriction, if any.
    pub category: Option<String>,
    /// Subregion restriction, if any.
    pub subregion: Option<String>,
    /// Minimum earned points to qualify, if set.
    pub min_points: Option<i64>,
    /// Minimum approved deal count to qualify, if set.
    pub min_deals: Option<i64>,
    /// Weight of points in a combined score, in percent.
    pub points_weight: i16,
    /// Weight of deal count in a combined score, in percent.
    pub deals_weight: i16,
    /// Evaluation window start (matched against approval timestamps).
    pub starts_on: Option<NaiveDate>,
    /// Evaluation window end (matched against approval timestamps).
    pub ends_on: Option<NaiveDate>,
    /// Whether this criteria is the globally active one.
    pub is_active: bool,
}

impl PrizeCriteria {
    /// Returns true when combined weights sum to 100.
    ///
    /// Enforced at the write boundary only. The engine accepts stored
    /// weights as-is and does not normalize.
    #[must_use]
    pub fn weights_are_valid(&self) -> bool {
        self.criteria_type != CriteriaType::Combined
            || self.points_weight + self.deals_weight == 100
    }
}

/// Per-user aggregate the ranking engine scores.
///
/// Built by the data layer from approved deals and the goals ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAggregate {
    /// The user being ranked.
    pub user_id: UserId,
    /// The user's region.
    pub region: String,
    /// The user's partner category, if any.
    pub category: Option<String>,
    /// The user's subregion, if any.
    pub subregion: Option<String>,
    /// Earned points over the evaluation window.
    pub points: i64,
    /// Approved deal count over the evaluation window.
    pub deals: i64,
    /// Goals ledger total over the evaluation window.
    pub goals: Decimal,
}

/// A derived, non-persisted ranking row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// The ranked user.
    pub user_id: UserId,
    /// Earned points.
    pub points: i64,
    /// Approved deal count.
    pub deals: i64,
    /// Computed score under the criteria.
    pub score: Decimal,
    /// 1-based position. Ties receive distinct consecutive ranks.
    pub rank: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn criteria(criteria_type: CriteriaType, pw: i16, dw: i16) -> PrizeCriteria {
        PrizeCriteria {
            id: CriteriaId::new(),
            name: "Q4 Grand Prize".to_string(),
            criteria_type,
            region: None,
            category: None,
            subregion: None,
            min_points: None,
            min_deals: None,
            points_weight: pw,
            deals_weight: dw,
            starts_on: None,
            ends_on: None,
            is_active: true,
        }
    }

    #[test]
    fn test_criteria_type_roundtrip() {
        for ct in [
            CriteriaType::Points,
            CriteriaType::Deals,
            CriteriaType::Combined,
            CriteriaType::TopGoals,
        ] {
            assert_eq!(CriteriaType::parse(ct.as_str()), Some(ct));
        }
        assert_eq!(CriteriaType::parse("goals"), None);
    }

    #[test]
    fn test_weights_valid_for_combined() {
        assert!(criteria(CriteriaType::Combined, 60, 40).weights_are_valid());
        assert!(!criteria(CriteriaType::Combined, 60, 50).weights_are_valid());
    }

    #[test]
    fn test_weights_ignored_for_other_types() {
        assert!(criteria(CriteriaType::Points, 0, 0).weights_are_valid());
        assert!(criteria(CriteriaType::TopGoals, 99, 99).weights_are_valid());
    }
}

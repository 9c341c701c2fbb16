//! Accrual domain types for rate configuration and deal classification.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use incentiva_shared::types::{PointsConfigId, RegionConfigId, UserId};

/// Deal type classification.
///
/// The rate applied to a deal depends on whether it closed a new customer
/// or renewed an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DealType {
    /// Sale to a customer with no prior contract.
    NewCustomer,
    /// Renewal of an existing contract.
    Renewal,
}

impl DealType {
    /// Returns the string representation of the deal type.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NewCustomer => "new_customer",
            Self::Renewal => "renewal",
        }
    }

    /// Parses a deal type from a string.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "new_customer" => Some(Self::NewCustomer),
            "renewal" => Some(Self::Renewal),
            _ => None,
        }
    }
}

impl fmt::Display for DealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Goal rate configuration for one (region, category, subregion) tuple.
///
/// Multiple configurations may share a region and category with different
/// subregions. Exactly one is the match for a given seller at lookup time,
/// or none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRates {
    /// Configuration row identity, referenced by goals ledger entries.
    pub id: RegionConfigId,
    /// Geographic region this configuration applies to.
    pub region: String,
    /// Partner category this configuration applies to.
    pub category: String,
    /// Sub-region, when the configuration is subregion-specific.
    pub subregion: Option<String>,
    /// Dollars per goal for new-customer deals.
    pub new_customer_goal_rate: Decimal,
    /// Dollars per goal for renewal deals.
    pub renewal_goal_rate: Decimal,
    /// Monthly goal target used for progress reporting.
    pub monthly_goal_target: Decimal,
}

impl RegionRates {
    /// Returns the goal rate applicable to the given deal type.
    #[must_use]
    pub const fn goal_rate_for(&self, deal_type: DealType) -> Decimal {
        match deal_type {
            DealType::NewCustomer => self.new_customer_goal_rate,
            DealType::Renewal => self.renewal_goal_rate,
        }
    }
}

/// Points rate configuration for one region.
///
/// At most one configuration is active per region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointsRates {
    /// Configuration row identity.
    pub id: PointsConfigId,
    /// Geographic region this configuration applies to.
    pub region: String,
    /// Dollars per point for new-customer deals.
    pub new_customer_rate: Decimal,
    /// Dollars per point for renewal deals.
    pub renewal_rate: Decimal,
}

impl PointsRates {
    /// Returns the points rate applicable to the given deal type.
    #[must_use]
    pub const fn rate_for(&self, deal_type: DealType) -> Decimal {
        match deal_type {
            DealType::NewCustomer => self.new_customer_rate,
            DealType::Renewal => self.renewal_rate,
        }
    }
}

/// The segment a seller accrues under: region, category, optional subregion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SellerSegment {
    /// The seller this segment belongs to.
    pub user_id: UserId,
    /// Seller's region.
    pub region: String,
    /// Seller's partner category.
    pub category: String,
    /// Seller's subregion, if any.
    pub subregion: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_region_rates() -> RegionRates {
        RegionRates {
            id: RegionConfigId::new(),
            region: "north".to_string(),
            category: "gold".to_string(),
            subregion: None,
            new_customer_goal_rate: dec!(1000),
            renewal_goal_rate: dec!(2000),
            monthly_goal_target: dec!(100),
        }
    }

    #[test]
    fn test_deal_type_as_str() {
        assert_eq!(DealType::NewCustomer.as_str(), "new_customer");
        assert_eq!(DealType::Renewal.as_str(), "renewal");
    }

    #[test]
    fn test_deal_type_parse() {
        assert_eq!(DealType::parse("new_customer"), Some(DealType::NewCustomer));
        assert_eq!(DealType::parse("RENEWAL"), Some(DealType::Renewal));
        assert_eq!(DealType::parse("upsell"), None);
    }

    #[test]
    fn test_goal_rate_for_deal_type() {
        let rates = sample_region_rates();
        assert_eq!(rates.goal_rate_for(DealType::NewCustomer), dec!(1000));
        assert_eq!(rates.goal_rate_for(DealType::Renewal), dec!(2000));
    }

    #[test]
    fn test_points_rate_for_deal_type() {
        let rates = PointsRates {
            id: PointsConfigId::new(),
            region: "north".to_string(),
            new_customer_rate: dec!(1000),
            renewal_rate: dec!(1500),
        };
        assert_eq!(rates.rate_for(DealType::NewCustomer), dec!(1000));
        assert_eq!(rates.rate_for(DealType::Renewal), dec!(1500));
    }
}

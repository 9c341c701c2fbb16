//! Rate configuration resolution.
//!
//! Resolution is an exact tuple match over (region, category, subregion),
//! including the case where both the seller and the configuration carry no
//! subregion. There is no partial or hierarchical fallback: a mismatch
//! yields "unresolved", not a nearest match.

use crate::accrual::types::{RegionRates, SellerSegment};

/// Stateless resolver for goal rate configurations.
pub struct RateResolver;

impl RateResolver {
    /// Resolves the unique configuration matching the seller's segment.
    ///
    /// `candidates` is the set of active configurations to search, in no
    /// particular order. Returns `None` when no configuration matches;
    /// callers treat that as "zero goals accrue" and log a warning, never
    /// an error.
    #[must_use]
    pub fn resolve<'a>(
        candidates: &'a [RegionRates],
        segment: &SellerSegment,
    ) -> Option<&'a RegionRates> {
        candidates.iter().find(|config| {
            config.region == segment.region
                && config.category == segment.category
                && config.subregion == segment.subregion
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incentiva_shared::types::{RegionConfigId, UserId};
    use rust_decimal_macros::dec;

    fn config(region: &str, category: &str, subregion: Option<&str>) -> RegionRates {
        RegionRates {
            id: RegionConfigId::new(),
            region: region.to_string(),
            category: category.to_string(),
            subregion: subregion.map(String::from),
            new_customer_goal_rate: dec!(1000),
            renewal_goal_rate: dec!(2000),
            monthly_goal_target: dec!(100),
        }
    }

    fn segment(region: &str, category: &str, subregion: Option<&str>) -> SellerSegment {
        SellerSegment {
            user_id: UserId::new(),
            region: region.to_string(),
            category: category.to_string(),
            subregion: subregion.map(String::from),
        }
    }

    #[test]
    fn test_resolve_exact_match_with_subregion() {
        let candidates = vec![
            config("north", "gold", None),
            config("north", "gold", Some("coast")),
        ];
        let resolved = RateResolver::resolve(&candidates, &segment("north", "gold", Some("coast")));
        assert_eq!(resolved.unwrap().subregion.as_deref(), Some("coast"));
    }

    #[test]
    fn test_resolve_null_subregion_matches_null_only() {
        let candidates = vec![config("north", "gold", Some("coast"))];
        assert!(RateResolver::resolve(&candidates, &segment("north", "gold", None)).is_none());

        let candidates = vec![config("north", "gold", None)];
        let resolved = RateResolver::resolve(&candidates, &segment("north", "gold", None));
        assert!(resolved.is_some());
        assert!(resolved.unwrap().subregion.is_none());
    }

    #[test]
    fn test_resolve_no_fallback_across_subregions() {
        // A seller with a subregion must not pick up the region-wide row.
        let candidates = vec![config("north", "gold", None)];
        assert!(
            RateResolver::resolve(&candidates, &segment("north", "gold", Some("coast"))).is_none()
        );
    }

    #[test]
    fn test_resolve_region_mismatch_is_unresolved() {
        let candidates = vec![config("north", "gold", None)];
        assert!(RateResolver::resolve(&candidates, &segment("south", "gold", None)).is_none());
    }

    #[test]
    fn test_resolve_category_mismatch_is_unresolved() {
        let candidates = vec![config("north", "gold", None)];
        assert!(RateResolver::resolve(&candidates, &segment("north", "silver", None)).is_none());
    }

    #[test]
    fn test_resolve_empty_candidates() {
        assert!(RateResolver::resolve(&[], &segment("north", "gold", None)).is_none());
    }
}

//! Scoring and ranking of user aggregates under a prize criteria.

use rust_decimal::Decimal;

use crate::ranking::types::{CriteriaType, PrizeCriteria, RankingEntry, UserAggregate};

/// Legacy sentinel meaning "no region restriction".
const REGION_ALL: &str = "all";

/// Stateless ranking engine.
///
/// The engine filters aggregates against the criteria, scores the
/// survivors, and assigns 1-based ranks in descending score order.
/// Equal scores receive distinct consecutive ranks; the tie is broken by
/// stable input order. This mirrors the established prize policy and is
/// deliberate, not an accident of sorting.
pub struct RankingEngine;

impl RankingEngine {
    /// Produces the ordered ranking for a criteria.
    ///
    /// A criteria whose filters match no aggregate yields an empty list.
    #[must_use]
    pub fn rank(criteria: &PrizeCriteria, aggregates: &[UserAggregate]) -> Vec<RankingEntry> {
        let mut scored: Vec<(Decimal, &UserAggregate)> = aggregates
            .iter()
            .filter(|agg| Self::qualifies(criteria, agg))
            .map(|agg| (Self::score(criteria, agg), agg))
            .collect();

        // Stable sort: equal scores keep their input order.
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        scored
            .into_iter()
            .zip(1u32..)
            .map(|((score, agg), rank)| RankingEntry {
                user_id: agg.user_id,
                points: agg.points,
                deals: agg.deals,
                score,
                rank,
            })
            .collect()
    }

    /// Applies each optional filter as an independent predicate, combined
    /// with logical AND.
    #[must_use]
    pub fn qualifies(criteria: &PrizeCriteria, agg: &UserAggregate) -> bool {
        if let Some(region) = &criteria.region
            && region != REGION_ALL
            && *region != agg.region
        {
            return false;
        }

        if let Some(category) = &criteria.category
            && agg.category.as_deref() != Some(category.as_str())
        {
            return false;
        }

        if let Some(subregion) = &criteria.subregion
            && agg.subregion.as_deref() != Some(subregion.as_str())
        {
            return false;
        }

        if let Some(min_points) = criteria.min_points
            && agg.points < min_points
        {
            return false;
        }

        if let Some(min_deals) = criteria.min_deals
            && agg.deals < min_deals
        {
            return false;
        }

        true
    }

    /// Computes the score for one aggregate under the criteria.
    ///
    /// Combined weights are applied as stored. Weights that do not sum to
    /// 100 are not normalized here; validating the split is the write
    /// boundary's job.
    #[must_use]
    pub fn score(criteria: &PrizeCriteria, agg: &UserAggregate) -> Decimal {
        match criteria.criteria_type {
            CriteriaType::Points => Decimal::from(agg.points),
            CriteriaType::Deals => Decimal::from(agg.deals),
            CriteriaType::Combined => {
                let points_weight = Decimal::from(criteria.points_weight) / Decimal::ONE_HUNDRED;
                let deals_weight = Decimal::from(criteria.deals_weight) / Decimal::ONE_HUNDRED;
                Decimal::from(agg.points) * points_weight + Decimal::from(agg.deals) * deals_weight
            }
            CriteriaType::TopGoals => agg.goals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use incentiva_shared::types::{CriteriaId, UserId};
    use rust_decimal_macros::dec;

    fn criteria(criteria_type: CriteriaType) -> PrizeCriteria {
        PrizeCriteria {
            id: CriteriaId::new(),
            name: "test".to_string(),
            criteria_type,
            region: None,
            category: None,
            subregion: None,
            min_points: None,
            min_deals: None,
            points_weight: 60,
            deals_weight: 40,
            starts_on: None,
            ends_on: None,
            is_active: true,
        }
    }

    fn aggregate(points: i64, deals: i64, goals: Decimal) -> UserAggregate {
        UserAggregate {
            user_id: UserId::new(),
            region: "north".to_string(),
            category: Some("gold".to_string()),
            subregion: None,
            points,
            deals,
            goals,
        }
    }

    #[test]
    fn test_combined_score_weighted() {
        let c = criteria(CriteriaType::Combined);
        let agg = aggregate(100, 10, dec!(0));
        // 100 * 0.6 + 10 * 0.4 = 64
        assert_eq!(RankingEngine::score(&c, &agg), dec!(64));
    }

    #[test]
    fn test_points_score() {
        let c = criteria(CriteriaType::Points);
        assert_eq!(RankingEngine::score(&c, &aggregate(250, 3, dec!(0))), dec!(250));
    }

    #[test]
    fn test_deals_score() {
        let c = criteria(CriteriaType::Deals);
        assert_eq!(RankingEngine::score(&c, &aggregate(250, 3, dec!(0))), dec!(3));
    }

    #[test]
    fn test_top_goals_score_reads_goals_not_points() {
        let c = criteria(CriteriaType::TopGoals);
        assert_eq!(
            RankingEngine::score(&c, &aggregate(250, 3, dec!(80.50))),
            dec!(80.50)
        );
    }

    #[test]
    fn test_min_points_excludes_entirely() {
        let mut c = criteria(CriteriaType::Points);
        c.min_points = Some(500);
        let ranking = RankingEngine::rank(&c, &[aggregate(499, 10, dec!(0))]);
        assert!(ranking.is_empty());
    }

    #[test]
    fn test_min_deals_threshold() {
        let mut c = criteria(CriteriaType::Deals);
        c.min_deals = Some(5);
        let aggs = vec![aggregate(0, 4, dec!(0)), aggregate(0, 5, dec!(0))];
        let ranking = RankingEngine::rank(&c, &aggs);
        assert_eq!(ranking.len(), 1);
        assert_eq!(ranking[0].deals, 5);
    }

    #[test]
    fn test_region_filter() {
        let mut c = criteria(CriteriaType::Points);
        c.region = Some("south".to_string());
        assert!(RankingEngine::rank(&c, &[aggregate(100, 1, dec!(0))]).is_empty());
    }

    #[test]
    fn test_region_all_sentinel_matches_everyone() {
        let mut c = criteria(CriteriaType::Points);
        c.region = Some("all".to_string());
        assert_eq!(RankingEngine::rank(&c, &[aggregate(100, 1, dec!(0))]).len(), 1);
    }

    #[test]
    fn test_category_filter_excludes_uncategorized() {
        let mut c = criteria(CriteriaType::Points);
        c.category = Some("gold".to_string());
        let mut agg = aggregate(100, 1, dec!(0));
        agg.category = None;
        assert!(!RankingEngine::qualifies(&c, &agg));
    }

    #[test]
    fn test_ranks_are_descending_and_consecutive() {
        let c = criteria(CriteriaType::Points);
        let aggs = vec![
            aggregate(50, 0, dec!(0)),
            aggregate(200, 0, dec!(0)),
            aggregate(100, 0, dec!(0)),
        ];
        let ranking = RankingEngine::rank(&c, &aggs);
        assert_eq!(ranking.len(), 3);
        assert_eq!(ranking[0].score, dec!(200));
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[1].score, dec!(100));
        assert_eq!(ranking[1].rank, 2);
        assert_eq!(ranking[2].score, dec!(50));
        assert_eq!(ranking[2].rank, 3);
    }

    #[test]
    fn test_equal_scores_get_distinct_consecutive_ranks() {
        let c = criteria(CriteriaType::Combined);
        let first = aggregate(100, 10, dec!(0));
        let second = aggregate(100, 10, dec!(0));
        let first_id = first.user_id;
        let second_id = second.user_id;

        let ranking = RankingEngine::rank(&c, &[first, second]);
        assert_eq!(ranking[0].score, dec!(64));
        assert_eq!(ranking[1].score, dec!(64));
        // No shared rank: the tie is broken by input order.
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[1].rank, 2);
        assert_eq!(ranking[0].user_id, first_id);
        assert_eq!(ranking[1].user_id, second_id);
    }

    #[test]
    fn test_unnormalized_weights_used_as_is() {
        let mut c = criteria(CriteriaType::Combined);
        c.points_weight = 80;
        c.deals_weight = 40;
        // 100 * 0.8 + 10 * 0.4 = 84, no normalization.
        assert_eq!(
            RankingEngine::score(&c, &aggregate(100, 10, dec!(0))),
            dec!(84)
        );
    }

    #[test]
    fn test_no_matching_users_yields_empty() {
        let mut c = criteria(CriteriaType::Points);
        c.region = Some("atlantis".to_string());
        assert!(RankingEngine::rank(&c, &[]).is_empty());
        assert!(RankingEngine::rank(&c, &[aggregate(10, 1, dec!(0))]).is_empty());
    }
}

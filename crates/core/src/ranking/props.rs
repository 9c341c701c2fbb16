//! Property-based tests for the ranking engine.

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use incentiva_shared::types::{CriteriaId, UserId};

use super::engine::RankingEngine;
use super::types::{CriteriaType, PrizeCriteria, UserAggregate};

fn criteria(criteria_type: CriteriaType, min_points: Option<i64>) -> PrizeCriteria {
    PrizeCriteria {
        id: CriteriaId::from_uuid(Uuid::nil()),
        name: "prop".to_string(),
        criteria_type,
        region: None,
        category: None,
        subregion: None,
        min_points,
        min_deals: None,
        points_weight: 60,
        deals_weight: 40,
        starts_on: None,
        ends_on: None,
        is_active: true,
    }
}

/// Strategy for a user aggregate with bounded totals.
fn aggregate() -> impl Strategy<Value = UserAggregate> {
    (
        any::<[u8; 16]>(),
        0i64..100_000,
        0i64..1_000,
        0i64..10_000_000,
    )
        .prop_map(|(id, points, deals, goal_cents)| UserAggregate {
            user_id: UserId::from_uuid(Uuid::from_bytes(id)),
            region: "north".to_string(),
            category: Some("gold".to_string()),
            subregion: None,
            points,
            deals,
            goals: Decimal::new(goal_cents, 2),
        })
}

fn criteria_type() -> impl Strategy<Value = CriteriaType> {
    prop_oneof![
        Just(CriteriaType::Points),
        Just(CriteriaType::Deals),
        Just(CriteriaType::Combined),
        Just(CriteriaType::TopGoals),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Ranks are exactly 1..=n with no gaps and no shared positions.
    #[test]
    fn prop_ranks_are_consecutive_from_one(
        aggs in prop::collection::vec(aggregate(), 0..50),
        ct in criteria_type(),
    ) {
        let ranking = RankingEngine::rank(&criteria(ct, None), &aggs);
        for (index, entry) in ranking.iter().enumerate() {
            prop_assert_eq!(entry.rank as usize, index + 1);
        }
    }

    /// Scores are monotone non-increasing down the ranking.
    #[test]
    fn prop_scores_descend(
        aggs in prop::collection::vec(aggregate(), 0..50),
        ct in criteria_type(),
    ) {
        let ranking = RankingEngine::rank(&criteria(ct, None), &aggs);
        for pair in ranking.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
        }
    }

    /// A min-points threshold excludes below-threshold users entirely.
    #[test]
    fn prop_min_points_excludes(
        aggs in prop::collection::vec(aggregate(), 0..50),
        min_points in 0i64..100_000,
    ) {
        let ranking = RankingEngine::rank(
            &criteria(CriteriaType::Points, Some(min_points)),
            &aggs,
        );
        prop_assert!(ranking.iter().all(|e| e.points >= min_points));
        let qualified = aggs.iter().filter(|a| a.points >= min_points).count();
        prop_assert_eq!(ranking.len(), qualified);
    }

    /// Every ranked user appears exactly once.
    #[test]
    fn prop_no_duplicate_users(
        aggs in prop::collection::vec(aggregate(), 0..50),
        ct in criteria_type(),
    ) {
        let ranking = RankingEngine::rank(&criteria(ct, None), &aggs);
        let mut ids: Vec<_> = ranking.iter().map(|e| e.user_id).collect();
        ids.sort_by_key(|id| id.into_inner());
        let before = ids.len();
        ids.dedup();
        prop_assert_eq!(ids.len(), before);
    }
}

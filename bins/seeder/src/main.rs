//! Database seeder for Incentiva development and testing.
//!
//! Seeds demo users, rate configurations, prize criteria, and pending
//! deals for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{NaiveDate, Utc};
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use incentiva_db::entities::{
    deals, points_configs, prize_criteria, region_configs,
    sea_orm_active_enums::{CriteriaType, DealStatus, DealType, UserRole},
    users,
};

/// Demo manager ID (consistent for all seeds)
const MANAGER_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo seller IDs (consistent for all seeds)
const SELLER_NORTH_ID: &str = "00000000-0000-0000-0000-000000000002";
const SELLER_COAST_ID: &str = "00000000-0000-0000-0000-000000000003";
const SELLER_SOUTH_ID: &str = "00000000-0000-0000-0000-000000000004";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = incentiva_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding users...");
    seed_users(&db).await;

    println!("Seeding rate configurations...");
    seed_rate_configs(&db).await;

    println!("Seeding prize criteria...");
    seed_prize_criteria(&db).await;

    println!("Seeding deals...");
    seed_deals(&db).await;

    println!("Seeding complete!");
}

fn parse_id(raw: &str) -> Uuid {
    Uuid::parse_str(raw).expect("valid seed id")
}

async fn seed_users(db: &DatabaseConnection) {
    let now = Utc::now().into();

    let rows = vec![
        users::ActiveModel {
            id: Set(parse_id(MANAGER_ID)),
            full_name: Set("Mona Manager".to_string()),
            email: Set("mona@incentiva.test".to_string()),
            role: Set(UserRole::Manager),
            region: Set("north".to_string()),
            category: Set(None),
            subregion: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        users::ActiveModel {
            id: Set(parse_id(SELLER_NORTH_ID)),
            full_name: Set("Nora Northfield".to_string()),
            email: Set("nora@incentiva.test".to_string()),
            role: Set(UserRole::Seller),
            region: Set("north".to_string()),
            category: Set(Some("gold".to_string())),
            subregion: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        users::ActiveModel {
            id: Set(parse_id(SELLER_COAST_ID)),
            full_name: Set("Carl Coastline".to_string()),
            email: Set("carl@incentiva.test".to_string()),
            role: Set(UserRole::Seller),
            region: Set("north".to_string()),
            category: Set(Some("gold".to_string())),
            subregion: Set(Some("coast".to_string())),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        users::ActiveModel {
            id: Set(parse_id(SELLER_SOUTH_ID)),
            full_name: Set("Sam Southgate".to_string()),
            email: Set("sam@incentiva.test".to_string()),
            role: Set(UserRole::Seller),
            region: Set("south".to_string()),
            category: Set(Some("silver".to_string())),
            subregion: Set(None),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
    ];

    let ids = [MANAGER_ID, SELLER_NORTH_ID, SELLER_COAST_ID, SELLER_SOUTH_ID];
    for (raw_id, row) in ids.iter().zip(rows) {
        if users::Entity::find_by_id(parse_id(raw_id))
            .one(db)
            .await
            .expect("query user")
            .is_none()
        {
            row.insert(db).await.expect("insert user");
        }
    }
}

async fn seed_rate_configs(db: &DatabaseConnection) {
    let now = Utc::now().into();

    let existing = region_configs::Entity::find()
        .one(db)
        .await
        .expect("query region configs");
    if existing.is_some() {
        println!("  rate configurations already seeded, skipping");
        return;
    }

    let region_rows = vec![
        // Region-wide gold rates in the north.
        region_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set("north".to_string()),
            category: Set("gold".to_string()),
            subregion: Set(None),
            new_customer_goal_rate: Set(dec!(1000)),
            renewal_goal_rate: Set(dec!(2000)),
            monthly_goal_target: Set(dec!(100)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        // Coast-specific override with a steeper target.
        region_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set("north".to_string()),
            category: Set("gold".to_string()),
            subregion: Set(Some("coast".to_string())),
            new_customer_goal_rate: Set(dec!(800)),
            renewal_goal_rate: Set(dec!(1600)),
            monthly_goal_target: Set(dec!(150)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        region_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set("south".to_string()),
            category: Set("silver".to_string()),
            subregion: Set(None),
            new_customer_goal_rate: Set(dec!(1500)),
            renewal_goal_rate: Set(dec!(3000)),
            monthly_goal_target: Set(dec!(80)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
    ];

    for row in region_rows {
        row.insert(db).await.expect("insert region config");
    }

    let points_rows = vec![
        points_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set("north".to_string()),
            new_customer_rate: Set(dec!(1000)),
            renewal_rate: Set(dec!(2000)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
        points_configs::ActiveModel {
            id: Set(Uuid::new_v4()),
            region: Set("south".to_string()),
            new_customer_rate: Set(dec!(1250)),
            renewal_rate: Set(dec!(2500)),
            is_active: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        },
    ];

    for row in points_rows {
        row.insert(db).await.expect("insert points config");
    }
}

async fn seed_prize_criteria(db: &DatabaseConnection) {
    let now = Utc::now().into();

    let existing = prize_criteria::Entity::find()
        .one(db)
        .await
        .expect("query criteria");
    if existing.is_some() {
        println!("  prize criteria already seeded, skipping");
        return;
    }

    let criteria = prize_criteria::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Annual Grand Prize".to_string()),
        criteria_type: Set(CriteriaType::Combined),
        region: Set(None),
        category: Set(None),
        subregion: Set(None),
        min_points: Set(Some(100)),
        min_deals: Set(None),
        points_weight: Set(60),
        deals_weight: Set(40),
        starts_on: Set(NaiveDate::from_ymd_opt(2026, 1, 1)),
        ends_on: Set(NaiveDate::from_ymd_opt(2026, 12, 31)),
        is_active: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
    };

    criteria.insert(db).await.expect("insert criteria");
}

async fn seed_deals(db: &DatabaseConnection) {
    let now = Utc::now().into();

    let existing = deals::Entity::find().one(db).await.expect("query deals");
    if existing.is_some() {
        println!("  deals already seeded, skipping");
        return;
    }

    let rows = vec![
        (SELLER_NORTH_ID, DealType::NewCustomer, dec!(50_000), 2026, 7, 15),
        (SELLER_NORTH_ID, DealType::Renewal, dec!(160_000), 2026, 7, 20),
        (SELLER_COAST_ID, DealType::NewCustomer, dec!(24_000), 2026, 8, 1),
        (SELLER_SOUTH_ID, DealType::Renewal, dec!(75_000), 2026, 8, 2),
    ];

    for (seller, deal_type, value, year, month, day) in rows {
        let deal = deals::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(parse_id(seller)),
            deal_type: Set(deal_type),
            value: Set(value),
            status: Set(DealStatus::Pending),
            points_earned: Set(0),
            goals_earned: Set(dec!(0)),
            close_date: Set(NaiveDate::from_ymd_opt(year, month, day).expect("valid date")),
            approved_by: Set(None),
            approved_at: Set(None),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        deal.insert(db).await.expect("insert deal");
    }
}

//! Initial database migration.
//!
//! Creates all enums, tables, indexes, and triggers for the accrual and
//! ranking engine.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: USERS
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: RATE CONFIGURATION
        // ============================================================
        db.execute_unprepared(REGION_CONFIGS_SQL).await?;
        db.execute_unprepared(POINTS_CONFIGS_SQL).await?;

        // ============================================================
        // PART 4: DEALS
        // ============================================================
        db.execute_unprepared(DEALS_SQL).await?;

        // ============================================================
        // PART 5: ACCRUAL LEDGERS
        // ============================================================
        db.execute_unprepared(POINTS_LEDGER_SQL).await?;
        db.execute_unprepared(GOALS_LEDGER_SQL).await?;

        // ============================================================
        // PART 6: PRIZE CRITERIA
        // ============================================================
        db.execute_unprepared(PRIZE_CRITERIA_SQL).await?;

        // ============================================================
        // PART 7: AUDIT LOG
        // ============================================================
        db.execute_unprepared(AUDIT_LOG_SQL).await?;

        // ============================================================
        // PART 8: TRIGGERS & FUNCTIONS
        // ============================================================
        db.execute_unprepared(TRIGGERS_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- User roles
CREATE TYPE user_role AS ENUM (
    'seller',
    'manager',
    'admin'
);

-- Deal types
CREATE TYPE deal_type AS ENUM (
    'new_customer',
    'renewal'
);

-- Deal lifecycle status
CREATE TYPE deal_status AS ENUM (
    'pending',
    'approved',
    'rejected'
);

-- Prize criteria scoring modes
CREATE TYPE criteria_type AS ENUM (
    'points',
    'deals',
    'combined',
    'top_goals'
);
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    full_name VARCHAR(255) NOT NULL,
    email VARCHAR(255) NOT NULL UNIQUE,
    role user_role NOT NULL DEFAULT 'seller',
    region VARCHAR(100) NOT NULL,
    category VARCHAR(100),
    subregion VARCHAR(100),
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_users_region ON users(region);
CREATE INDEX idx_users_segment ON users(region, category, subregion);
";

const REGION_CONFIGS_SQL: &str = r"
CREATE TABLE region_configs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    region VARCHAR(100) NOT NULL,
    category VARCHAR(100) NOT NULL,
    subregion VARCHAR(100),
    new_customer_goal_rate NUMERIC(12, 2) NOT NULL,
    renewal_goal_rate NUMERIC(12, 2) NOT NULL,
    monthly_goal_target NUMERIC(12, 2) NOT NULL DEFAULT 0,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_goal_rates_positive CHECK (
        new_customer_goal_rate > 0 AND renewal_goal_rate > 0
    )
);

-- Exactly one active configuration per (region, category, subregion) tuple.
-- COALESCE folds NULL subregions into the uniqueness check.
CREATE UNIQUE INDEX uq_region_configs_active_tuple
    ON region_configs (region, category, COALESCE(subregion, ''))
    WHERE is_active;
";

const POINTS_CONFIGS_SQL: &str = r"
CREATE TABLE points_configs (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    region VARCHAR(100) NOT NULL,
    new_customer_rate NUMERIC(12, 2) NOT NULL,
    renewal_rate NUMERIC(12, 2) NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT TRUE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_point_rates_positive CHECK (
        new_customer_rate > 0 AND renewal_rate > 0
    )
);

-- At most one active points configuration per region.
CREATE UNIQUE INDEX uq_points_configs_active_region
    ON points_configs (region)
    WHERE is_active;
";

const DEALS_SQL: &str = r"
CREATE TABLE deals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    deal_type deal_type NOT NULL,
    value NUMERIC(14, 2) NOT NULL,
    status deal_status NOT NULL DEFAULT 'pending',
    points_earned BIGINT NOT NULL DEFAULT 0,
    goals_earned NUMERIC(12, 2) NOT NULL DEFAULT 0,
    close_date DATE NOT NULL,
    approved_by UUID REFERENCES users(id),
    approved_at TIMESTAMPTZ,
    description TEXT,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_deal_value_positive CHECK (value > 0)
);

CREATE INDEX idx_deals_user ON deals(user_id);
CREATE INDEX idx_deals_status ON deals(status);
CREATE INDEX idx_deals_approved_at ON deals(approved_at) WHERE status = 'approved';
CREATE INDEX idx_deals_close_date ON deals(close_date);
";

const POINTS_LEDGER_SQL: &str = r"
CREATE TABLE points_ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    deal_id UUID REFERENCES deals(id) ON DELETE CASCADE,
    delta BIGINT NOT NULL,
    description VARCHAR(500) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_points_ledger_user ON points_ledger_entries(user_id);
CREATE INDEX idx_points_ledger_deal ON points_ledger_entries(deal_id);
CREATE INDEX idx_points_ledger_earned
    ON points_ledger_entries(user_id) WHERE delta > 0;
";

const GOALS_LEDGER_SQL: &str = r"
CREATE TABLE goals_ledger_entries (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id),
    deal_id UUID NOT NULL REFERENCES deals(id) ON DELETE CASCADE,
    delta NUMERIC(12, 2) NOT NULL,
    month SMALLINT NOT NULL,
    year SMALLINT NOT NULL,
    region_config_id UUID NOT NULL REFERENCES region_configs(id),
    description VARCHAR(500) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_goals_month_range CHECK (month BETWEEN 1 AND 12)
);

CREATE INDEX idx_goals_ledger_user ON goals_ledger_entries(user_id);
CREATE INDEX idx_goals_ledger_deal ON goals_ledger_entries(deal_id);
CREATE INDEX idx_goals_ledger_attribution ON goals_ledger_entries(year, month);
";

const PRIZE_CRITERIA_SQL: &str = r"
CREATE TABLE prize_criteria (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(255) NOT NULL,
    criteria_type criteria_type NOT NULL,
    region VARCHAR(100),
    category VARCHAR(100),
    subregion VARCHAR(100),
    min_points BIGINT,
    min_deals BIGINT,
    points_weight SMALLINT NOT NULL DEFAULT 0,
    deals_weight SMALLINT NOT NULL DEFAULT 0,
    starts_on DATE,
    ends_on DATE,
    is_active BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_combined_weights CHECK (
        criteria_type <> 'combined' OR points_weight + deals_weight = 100
    )
);

-- Global invariant: at most one active criteria system-wide.
CREATE UNIQUE INDEX uq_prize_criteria_single_active
    ON prize_criteria ((TRUE))
    WHERE is_active;
";

const AUDIT_LOG_SQL: &str = r"
CREATE TABLE audit_log (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    actor_id UUID,
    action VARCHAR(100) NOT NULL,
    entity_type VARCHAR(100) NOT NULL,
    entity_id UUID NOT NULL,
    snapshot JSONB NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_audit_log_entity ON audit_log(entity_type, entity_id);
";

const TRIGGERS_SQL: &str = r"
-- ============================================================
-- FUNCTION: set_updated_at
-- Keeps updated_at current on every row update
-- ============================================================
CREATE OR REPLACE FUNCTION set_updated_at()
RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;

CREATE TRIGGER trg_users_updated_at
    BEFORE UPDATE ON users
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_region_configs_updated_at
    BEFORE UPDATE ON region_configs
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_points_configs_updated_at
    BEFORE UPDATE ON points_configs
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_deals_updated_at
    BEFORE UPDATE ON deals
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_prize_criteria_updated_at
    BEFORE UPDATE ON prize_criteria
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS audit_log CASCADE;
DROP TABLE IF EXISTS prize_criteria CASCADE;
DROP TABLE IF EXISTS goals_ledger_entries CASCADE;
DROP TABLE IF EXISTS points_ledger_entries CASCADE;
DROP TABLE IF EXISTS deals CASCADE;
DROP TABLE IF EXISTS points_configs CASCADE;
DROP TABLE IF EXISTS region_configs CASCADE;
DROP TABLE IF EXISTS users CASCADE;
DROP FUNCTION IF EXISTS set_updated_at CASCADE;
DROP TYPE IF EXISTS criteria_type;
DROP TYPE IF EXISTS deal_status;
DROP TYPE IF EXISTS deal_type;
DROP TYPE IF EXISTS user_role;
";

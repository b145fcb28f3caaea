//! PostgreSQL Schema
//!
//! DDL for the engine's tables. States, roles and methods are stored as
//! SMALLINT ids exactly as the enums define them; shares and amounts are
//! NUMERIC so no precision is lost between submission and display.

use sqlx::PgPool;

pub const CREATE_CONDOMINIUMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS condominiums_tb (
    condominium_id UUID PRIMARY KEY,
    name           TEXT NOT NULL,
    admin_id       UUID NOT NULL,
    active         BOOLEAN NOT NULL DEFAULT TRUE,
    share_version  BIGINT NOT NULL DEFAULT 0
)
"#;

pub const CREATE_DEPARTMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS departments_tb (
    department_id  UUID PRIMARY KEY,
    condominium_id UUID NOT NULL REFERENCES condominiums_tb (condominium_id),
    code           TEXT NOT NULL,
    share          NUMERIC(10, 6) NOT NULL DEFAULT 0
)
"#;

pub const CREATE_COMMON_AREAS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS common_areas_tb (
    condominium_id UUID NOT NULL REFERENCES condominiums_tb (condominium_id),
    name           TEXT NOT NULL,
    capacity       INTEGER,
    description    TEXT,
    PRIMARY KEY (condominium_id, name)
)
"#;

pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users_tb (
    user_id        UUID PRIMARY KEY,
    name           TEXT NOT NULL,
    email          TEXT NOT NULL,
    role           SMALLINT NOT NULL,
    status         SMALLINT NOT NULL DEFAULT 0,
    condominium_id UUID,
    department_id  UUID
)
"#;

pub const CREATE_MONTHLY_EXPENSES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS monthly_expenses_tb (
    condominium_id UUID NOT NULL REFERENCES condominiums_tb (condominium_id),
    period_year    INTEGER NOT NULL,
    period_month   INTEGER NOT NULL,
    total_amount   NUMERIC(18, 2) NOT NULL,
    description    TEXT,
    created_at     BIGINT NOT NULL,
    PRIMARY KEY (condominium_id, period_year, period_month)
)
"#;

pub const CREATE_PAYMENTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS payments_tb (
    payment_id     TEXT PRIMARY KEY,
    condominium_id UUID NOT NULL,
    department_id  UUID NOT NULL,
    paid_by        UUID NOT NULL,
    period_year    INTEGER NOT NULL,
    period_month   INTEGER NOT NULL,
    amount_paid    NUMERIC(18, 6) NOT NULL,
    method         SMALLINT NOT NULL,
    state          SMALLINT NOT NULL DEFAULT 0,
    submitted_at   BIGINT NOT NULL,
    decided_at     BIGINT
)
"#;

pub const CREATE_PAYMENTS_SETTLED_INDEX: &str = r#"
CREATE INDEX IF NOT EXISTS payments_department_period_idx
    ON payments_tb (department_id, period_year, period_month, state)
"#;

pub const CREATE_RESERVATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS reservations_tb (
    reservation_id   TEXT PRIMARY KEY,
    condominium_id   UUID NOT NULL,
    area_name        TEXT NOT NULL,
    requested_by     UUID NOT NULL,
    starts_at        TIMESTAMPTZ NOT NULL,
    ends_at          TIMESTAMPTZ NOT NULL,
    state            SMALLINT NOT NULL DEFAULT 0,
    rejection_reason TEXT,
    submitted_at     BIGINT NOT NULL,
    decided_at       BIGINT
)
"#;

/// Create all engine tables if they do not exist.
pub async fn init_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    tracing::info!("Initializing PostgreSQL schema...");

    for ddl in [
        CREATE_CONDOMINIUMS_TABLE,
        CREATE_DEPARTMENTS_TABLE,
        CREATE_COMMON_AREAS_TABLE,
        CREATE_USERS_TABLE,
        CREATE_MONTHLY_EXPENSES_TABLE,
        CREATE_PAYMENTS_TABLE,
        CREATE_PAYMENTS_SETTLED_INDEX,
        CREATE_RESERVATIONS_TABLE,
    ] {
        sqlx::query(ddl).execute(pool).await?;
    }

    tracing::info!("PostgreSQL schema initialized");
    Ok(())
}

//! Postgres-backed stores.
//!
//! Runtime-bound queries only; uniqueness is enforced by the schema and
//! surfaced as [`StoreError::Conflict`] via the `23505` error code.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use ecocrop_advisor::{Advice, RiskLevel};
use ecocrop_core::{AnalysisId, Email, UserId};

use crate::analysis_store::{AnalysisStore, HISTORY_LIMIT};
use crate::error::StoreError;
use crate::records::{AnalysisRecord, UserRecord};
use crate::user_store::UserStore;

/// Create the tables and indexes the stores rely on. Idempotent.
pub async fn init_schema(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id UUID PRIMARY KEY,
            email TEXT NOT NULL UNIQUE,
            name TEXT NOT NULL,
            password_hash TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(backend)?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS analyses (
            id UUID PRIMARY KEY,
            user_id UUID NOT NULL REFERENCES users (id),
            crop_name TEXT NOT NULL,
            growth_stage TEXT NOT NULL,
            symptoms TEXT NOT NULL,
            soil_moisture_pct DOUBLE PRECISION,
            temperature_c DOUBLE PRECISION,
            humidity_pct DOUBLE PRECISION,
            photo_base64 TEXT,
            diagnosis TEXT NOT NULL,
            confidence_pct SMALLINT NOT NULL,
            immediate_action TEXT NOT NULL,
            sustainable_treatment TEXT NOT NULL,
            resource_efficiency_tip TEXT NOT NULL,
            risk_level TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(backend)?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS analyses_user_created_idx \
         ON analyses (user_id, created_at DESC)",
    )
    .execute(pool)
    .await
    .map_err(backend)?;

    Ok(())
}

fn backend(e: sqlx::Error) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn map_insert_error(e: sqlx::Error, what: &str) -> StoreError {
    match &e {
        sqlx::Error::Database(db) if db.code().as_deref() == Some("23505") => {
            StoreError::Conflict(format!("{what} already exists"))
        }
        _ => backend(e),
    }
}

/// Postgres-backed account store.
#[derive(Debug, Clone)]
pub struct PostgresUserStore {
    pool: Arc<PgPool>,
}

impl PostgresUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

fn user_from_row(row: &sqlx::postgres::PgRow) -> Result<UserRecord, StoreError> {
    let email: String = row.try_get("email").map_err(backend)?;
    Ok(UserRecord {
        id: UserId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        email: Email::parse(&email).map_err(|e| StoreError::Backend(e.to_string()))?,
        name: row.try_get("name").map_err(backend)?,
        password_hash: row.try_get("password_hash").map_err(backend)?,
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(backend)?,
    })
}

#[async_trait]
impl UserStore for PostgresUserStore {
    async fn insert(&self, user: UserRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO users (id, email, name, password_hash, created_at) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(user.id.as_uuid())
        .bind(user.email.as_str())
        .bind(&user.name)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_insert_error(e, "user"))?;
        Ok(())
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(&*self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(user_from_row).transpose()
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<UserRecord>, StoreError> {
        let row = sqlx::query(
            "SELECT id, email, name, password_hash, created_at FROM users WHERE id = $1",
        )
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(user_from_row).transpose()
    }
}

/// Postgres-backed analysis store.
#[derive(Debug, Clone)]
pub struct PostgresAnalysisStore {
    pool: Arc<PgPool>,
}

impl PostgresAnalysisStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }
}

const ANALYSIS_COLUMNS: &str = "id, user_id, crop_name, growth_stage, symptoms, \
     soil_moisture_pct, temperature_c, humidity_pct, photo_base64, diagnosis, \
     confidence_pct, immediate_action, sustainable_treatment, \
     resource_efficiency_tip, risk_level, created_at";

fn analysis_from_row(row: &sqlx::postgres::PgRow) -> Result<AnalysisRecord, StoreError> {
    let risk: String = row.try_get("risk_level").map_err(backend)?;
    let confidence: i16 = row.try_get("confidence_pct").map_err(backend)?;

    Ok(AnalysisRecord {
        id: AnalysisId::from_uuid(row.try_get::<Uuid, _>("id").map_err(backend)?),
        user_id: UserId::from_uuid(row.try_get::<Uuid, _>("user_id").map_err(backend)?),
        crop_name: row.try_get("crop_name").map_err(backend)?,
        growth_stage: row.try_get("growth_stage").map_err(backend)?,
        symptoms: row.try_get("symptoms").map_err(backend)?,
        soil_moisture_pct: row.try_get("soil_moisture_pct").map_err(backend)?,
        temperature_c: row.try_get("temperature_c").map_err(backend)?,
        humidity_pct: row.try_get("humidity_pct").map_err(backend)?,
        photo_base64: row.try_get("photo_base64").map_err(backend)?,
        advice: Advice {
            diagnosis: row.try_get("diagnosis").map_err(backend)?,
            confidence_pct: confidence.clamp(0, 100) as u8,
            immediate_action: row.try_get("immediate_action").map_err(backend)?,
            sustainable_treatment: row.try_get("sustainable_treatment").map_err(backend)?,
            resource_efficiency_tip: row.try_get("resource_efficiency_tip").map_err(backend)?,
            risk_level: risk
                .parse::<RiskLevel>()
                .map_err(|e| StoreError::Backend(e.to_string()))?,
        },
        created_at: row
            .try_get::<DateTime<Utc>, _>("created_at")
            .map_err(backend)?,
    })
}

#[async_trait]
impl AnalysisStore for PostgresAnalysisStore {
    async fn insert(&self, record: AnalysisRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO analyses (id, user_id, crop_name, growth_stage, symptoms, \
             soil_moisture_pct, temperature_c, humidity_pct, photo_base64, diagnosis, \
             confidence_pct, immediate_action, sustainable_treatment, \
             resource_efficiency_tip, risk_level, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)",
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_uuid())
        .bind(&record.crop_name)
        .bind(&record.growth_stage)
        .bind(&record.symptoms)
        .bind(record.soil_moisture_pct)
        .bind(record.temperature_c)
        .bind(record.humidity_pct)
        .bind(&record.photo_base64)
        .bind(&record.advice.diagnosis)
        .bind(record.advice.confidence_pct as i16)
        .bind(&record.advice.immediate_action)
        .bind(&record.advice.sustainable_treatment)
        .bind(&record.advice.resource_efficiency_tip)
        .bind(record.advice.risk_level.as_str())
        .bind(record.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_insert_error(e, "analysis"))?;
        Ok(())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<AnalysisRecord>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses \
             WHERE user_id = $1 ORDER BY created_at DESC, id DESC LIMIT $2"
        ))
        .bind(user_id.as_uuid())
        .bind(HISTORY_LIMIT as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(backend)?;

        rows.iter().map(analysis_from_row).collect()
    }

    async fn get(
        &self,
        user_id: UserId,
        id: AnalysisId,
    ) -> Result<Option<AnalysisRecord>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {ANALYSIS_COLUMNS} FROM analyses WHERE id = $1 AND user_id = $2"
        ))
        .bind(id.as_uuid())
        .bind(user_id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(backend)?;

        row.as_ref().map(analysis_from_row).transpose()
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use ecocrop_advisor::Advice;
use ecocrop_core::{AnalysisId, Email, UserId};

/// A registered account as persisted.
///
/// `password_hash` is the opaque encoded form from `ecocrop-auth`; the store
/// never interprets it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub email: Email,
    pub name: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// One completed crop analysis, owned by a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub user_id: UserId,
    pub crop_name: String,
    pub growth_stage: String,
    pub symptoms: String,
    pub soil_moisture_pct: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    /// Stored for later review; responses omit it.
    pub photo_base64: Option<String>,
    pub advice: Advice,
    pub created_at: DateTime<Utc>,
}

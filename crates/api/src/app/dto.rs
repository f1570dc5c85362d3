use serde::Deserialize;
use serde_json::json;

use ecocrop_advisor::AnalysisRequest;
use ecocrop_store::{AnalysisRecord, UserRecord};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateAnalysisRequest {
    pub crop_name: String,
    pub growth_stage: String,
    pub symptoms: String,
    pub soil_moisture_pct: Option<f64>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub photo_base64: Option<String>,
}

impl From<CreateAnalysisRequest> for AnalysisRequest {
    fn from(value: CreateAnalysisRequest) -> Self {
        AnalysisRequest {
            crop_name: value.crop_name,
            growth_stage: value.growth_stage,
            symptoms: value.symptoms,
            soil_moisture_pct: value.soil_moisture_pct,
            temperature_c: value.temperature_c,
            humidity_pct: value.humidity_pct,
            photo_base64: value.photo_base64,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RecommendSoilRequest {
    pub soil: String,
    pub rainfall_mm: f64,
    pub temperature_c: f64,
}

#[derive(Debug, Deserialize)]
pub struct RecommendFieldRequest {
    pub nitrogen: f64,
    pub phosphorus: f64,
    pub potassium: f64,
    pub temperature_c: f64,
    pub humidity_pct: f64,
    pub ph: f64,
    pub rainfall_mm: f64,
    /// Optional; enables irrigation advice alongside the ranking.
    pub soil_moisture_pct: Option<f64>,
}

// -------------------------
// Response mapping
// -------------------------

pub fn user_to_json(user: &UserRecord) -> serde_json::Value {
    json!({
        "id": user.id.to_string(),
        "email": user.email.as_str(),
        "name": user.name,
    })
}

/// Analysis as returned over the wire. The photo stays server-side.
pub fn analysis_to_json(record: &AnalysisRecord) -> serde_json::Value {
    json!({
        "id": record.id.to_string(),
        "crop_name": record.crop_name,
        "growth_stage": record.growth_stage,
        "symptoms": record.symptoms,
        "soil_moisture_pct": record.soil_moisture_pct,
        "temperature_c": record.temperature_c,
        "humidity_pct": record.humidity_pct,
        "diagnosis": record.advice.diagnosis,
        "confidence_pct": record.advice.confidence_pct,
        "immediate_action": record.advice.immediate_action,
        "sustainable_treatment": record.advice.sustainable_treatment,
        "resource_efficiency_tip": record.advice.resource_efficiency_tip,
        "risk_level": record.advice.risk_level.as_str(),
        "created_at": record.created_at.to_rfc3339(),
    })
}

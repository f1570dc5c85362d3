use axum::{Json, http::StatusCode, response::IntoResponse};

use ecocrop_agronomy::{FieldReading, SoilType, irrigation_advice, rank_crops, recommend_by_soil};

use crate::app::{dto, errors};

pub async fn by_soil(Json(body): Json<dto::RecommendSoilRequest>) -> axum::response::Response {
    let soil: SoilType = match body.soil.parse() {
        Ok(s) => s,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if !body.rainfall_mm.is_finite() || body.rainfall_mm < 0.0 || !body.temperature_c.is_finite() {
        return errors::json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            "rainfall_mm must be >= 0 and temperature_c finite",
        );
    }

    let crop = recommend_by_soil(soil, body.rainfall_mm, body.temperature_c);

    (
        StatusCode::OK,
        Json(serde_json::json!({ "crop": crop.as_str() })),
    )
        .into_response()
}

pub async fn by_field(Json(body): Json<dto::RecommendFieldRequest>) -> axum::response::Response {
    let reading = FieldReading {
        nitrogen: body.nitrogen,
        phosphorus: body.phosphorus,
        potassium: body.potassium,
        temperature_c: body.temperature_c,
        humidity_pct: body.humidity_pct,
        ph: body.ph,
        rainfall_mm: body.rainfall_mm,
    };

    let rankings = match rank_crops(&reading) {
        Ok(r) => r,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let irrigation = match body.soil_moisture_pct {
        Some(moisture) => {
            match irrigation_advice(moisture, Some(body.temperature_c), Some(body.humidity_pct)) {
                Ok(advice) => Some(advice),
                Err(e) => return errors::domain_error_to_response(e),
            }
        }
        None => None,
    };

    let rankings: Vec<_> = rankings
        .iter()
        .map(|s| serde_json::json!({ "crop": s.crop.as_str(), "score": s.score }))
        .collect();

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "rankings": rankings,
            "irrigation": irrigation,
        })),
    )
        .into_response()
}

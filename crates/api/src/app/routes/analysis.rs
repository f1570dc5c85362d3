use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;

use ecocrop_advisor::AnalysisRequest;
use ecocrop_core::AnalysisId;
use ecocrop_store::AnalysisRecord;

use crate::app::services::AppServices;
use crate::app::{dto, errors};
use crate::context::PrincipalContext;

pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Json(body): Json<dto::CreateAnalysisRequest>,
) -> axum::response::Response {
    let request: AnalysisRequest = body.into();

    let advice = match services.advisor().advise(&request).await {
        Ok(a) => a,
        Err(e) => return errors::advisor_error_to_response(e),
    };

    let record = AnalysisRecord {
        id: AnalysisId::new(),
        user_id: principal.user_id(),
        crop_name: request.crop_name,
        growth_stage: request.growth_stage,
        symptoms: request.symptoms,
        soil_moisture_pct: request.soil_moisture_pct,
        temperature_c: request.temperature_c,
        humidity_pct: request.humidity_pct,
        photo_base64: request.photo_base64,
        advice,
        created_at: Utc::now(),
    };

    if let Err(e) = services.analyses().insert(record.clone()).await {
        return errors::store_error_to_response(e);
    }

    services.publish_analysis_created(&record);

    (StatusCode::CREATED, Json(dto::analysis_to_json(&record))).into_response()
}

pub async fn history(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
) -> axum::response::Response {
    match services.analyses().list_for_user(principal.user_id()).await {
        Ok(items) => {
            let items: Vec<_> = items.iter().map(dto::analysis_to_json).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn detail(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let id: AnalysisId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid analysis id");
        }
    };

    match services.analyses().get(principal.user_id(), id).await {
        Ok(Some(record)) => (StatusCode::OK, Json(dto::analysis_to_json(&record))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "analysis not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}

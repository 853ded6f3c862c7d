use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Extension, Json,
};
use vcintel_core::{EnrichmentRequest, EnrichmentResult};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const INVALID_PAYLOAD: &str = "Invalid enrichment payload";

/// `POST /enrich`: run the pipeline for one company and return the result as-is.
pub(super) async fn enrich_company(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<EnrichmentRequest>, JsonRejection>,
) -> Result<Json<EnrichmentResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(
            request_id = %req_id.0,
            error = %rejection,
            "rejected enrichment payload"
        );
        ApiError::new(StatusCode::BAD_REQUEST, INVALID_PAYLOAD)
    })?;

    tracing::info!(
        request_id = %req_id.0,
        website = %request.website,
        company_id = request.company_id.as_deref().unwrap_or(""),
        "enrichment requested"
    );

    let result = state
        .enricher
        .enrich(&request)
        .await
        .map_err(|e| ApiError::from_enrich(&req_id.0, &e))?;

    Ok(Json(result))
}

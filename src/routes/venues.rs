use axum::{extract::State, Extension, Json};
use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    middleware::request_id::RequestId,
    models::{BestVenueResponse, SelectionRequest},
    routes::AppState,
};

/// Handler for the best-venue endpoint
pub async fn best_venue(
    State(state): State<Arc<AppState>>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<SelectionRequest>,
) -> AppResult<Json<BestVenueResponse>> {
    validate(&request)?;

    tracing::info!(
        request_id = %request_id,
        categories = ?request.categories,
        event_date = %request.event_date,
        "Processing best venue request"
    );

    let result = state.selector.select_best(&request).await;

    let venue = result.venue.ok_or_else(|| {
        tracing::info!(request_id = %request_id, probes = result.probes, "No venue found");
        AppError::NotFound("No venue found".to_string())
    })?;

    tracing::info!(
        request_id = %request_id,
        venue = %venue.name,
        outcome = ?result.outcome,
        "Best venue selected"
    );

    Ok(Json(BestVenueResponse {
        venue,
        outcome: result.outcome,
        probes: result.probes,
    }))
}

fn validate(request: &SelectionRequest) -> AppResult<()> {
    if !request.latitude.is_finite() || !(-90.0..=90.0).contains(&request.latitude) {
        return Err(AppError::InvalidInput(format!(
            "Latitude out of range: {}",
            request.latitude
        )));
    }
    if !request.longitude.is_finite() || !(-180.0..=180.0).contains(&request.longitude) {
        return Err(AppError::InvalidInput(format!(
            "Longitude out of range: {}",
            request.longitude
        )));
    }
    Ok(())
}

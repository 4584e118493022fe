//! POST /spectral: raw analysis of a fresh capture

use axum::{extract::State, routing::post, Json, Router};
use rubin_common::analysis::AudioAnalysis;

use super::{capture_and_analyze, CaptureParams};
use crate::{error::ApiResult, AppState};

pub async fn spectral_data(
    State(state): State<AppState>,
    Json(params): Json<CaptureParams>,
) -> ApiResult<Json<AudioAnalysis>> {
    Ok(Json(capture_and_analyze(&state, params).await?))
}

pub fn spectral_routes() -> Router<AppState> {
    Router::new().route("/spectral", post(spectral_data))
}

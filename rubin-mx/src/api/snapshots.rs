//! Snapshot capture, listing and comparison

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::{capture_and_analyze, CaptureParams};
use crate::{
    error::{ApiError, ApiResult},
    snapshots::Snapshot,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct SnapshotRequest {
    pub name: String,
    #[serde(flatten)]
    pub capture: CaptureParams,
}

#[derive(Debug, Deserialize)]
pub struct CompareQuery {
    pub a: String,
    pub b: String,
}

/// POST /snapshots
pub async fn capture_snapshot(
    State(state): State<AppState>,
    Json(request): Json<SnapshotRequest>,
) -> ApiResult<Json<Snapshot>> {
    if request.name.trim().is_empty() {
        return Err(ApiError::BadRequest("snapshot name must not be empty".to_string()));
    }
    let analysis = capture_and_analyze(&state, request.capture).await?;
    Ok(Json(state.snapshots.insert(request.name, analysis).await))
}

/// GET /snapshots
pub async fn list_snapshots(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.snapshots.names().await)
}

/// GET /snapshots/compare?a=&b=
pub async fn compare_snapshots(
    State(state): State<AppState>,
    Query(query): Query<CompareQuery>,
) -> ApiResult<Json<Value>> {
    Ok(Json(state.snapshots.compare(&query.a, &query.b).await?))
}

pub fn snapshot_routes() -> Router<AppState> {
    Router::new()
        .route("/snapshots", post(capture_snapshot).get(list_snapshots))
        .route("/snapshots/compare", get(compare_snapshots))
}

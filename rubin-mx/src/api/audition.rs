//! POST /audition: classify an isolated track and score its fit

use axum::{extract::State, routing::post, Json, Router};
use rubin_common::{AuditionResult, Role};
use serde::Deserialize;
use tracing::info;

use super::{capture_and_analyze, CaptureParams};
use crate::{
    error::{ApiError, ApiResult},
    evaluation, AppState,
};

#[derive(Debug, Deserialize)]
pub struct AuditionRequest {
    pub style: String,
    /// Skip classification and score as this role
    pub role: Option<String>,
    #[serde(flatten)]
    pub capture: CaptureParams,
}

/// Parse a user-supplied role, accepting only recognized names
pub fn parse_role(name: &str) -> Result<Role, ApiError> {
    let role = Role::from(name);
    if role.is_recognized() {
        Ok(role)
    } else {
        Err(ApiError::BadRequest(format!(
            "unknown role '{}'; expected one of: {}",
            name,
            Role::RECOGNIZED.join(", ")
        )))
    }
}

pub async fn audition_track(
    State(state): State<AppState>,
    Json(request): Json<AuditionRequest>,
) -> ApiResult<Json<AuditionResult>> {
    let role = request.role.as_deref().map(parse_role).transpose()?;
    let profile = state.styles.load(&request.style)?;
    let analysis = capture_and_analyze(&state, request.capture).await?;

    let result = evaluation::audition(&analysis, &profile, role);
    info!(
        style = %result.style,
        role = %result.role,
        fit_score = result.fit_score,
        "Audition complete"
    );
    Ok(Json(result))
}

pub fn audition_routes() -> Router<AppState> {
    Router::new().route("/audition", post(audition_track))
}

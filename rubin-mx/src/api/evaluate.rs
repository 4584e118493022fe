//! Mix evaluation endpoints
//!
//! POST /evaluate returns the full [`EvaluationResult`]; POST /suggest
//! returns only the actionable advice, most urgent first.

use axum::{extract::State, routing::post, Json, Router};
use rubin_common::{Band, EvaluationResult, Severity};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{capture_and_analyze, CaptureParams};
use crate::{error::ApiResult, evaluation, AppState};

#[derive(Debug, Deserialize)]
pub struct EvaluateRequest {
    pub style: String,
    #[serde(flatten)]
    pub capture: CaptureParams,
}

#[derive(Debug, Serialize)]
pub struct Suggestion {
    pub severity: Severity,
    pub category: String,
    pub band: Option<Band>,
    pub problem: String,
    pub suggestion: String,
}

#[derive(Debug, Serialize)]
pub struct SuggestResponse {
    pub style: String,
    pub cohesion_score: f64,
    pub suggestions: Vec<Suggestion>,
}

impl From<EvaluationResult> for SuggestResponse {
    fn from(result: EvaluationResult) -> Self {
        let suggestions = result
            .issues_by_severity()
            .into_iter()
            .map(|issue| Suggestion {
                severity: issue.severity,
                category: issue.category.clone(),
                band: issue.band,
                problem: issue.message.clone(),
                suggestion: issue.suggestion.clone(),
            })
            .collect();

        Self {
            style: result.style,
            cohesion_score: result.cohesion_score,
            suggestions,
        }
    }
}

async fn run_evaluation(state: &AppState, request: EvaluateRequest) -> ApiResult<EvaluationResult> {
    // Resolve the profile first so an unknown style fails before capturing
    let profile = state.styles.load(&request.style)?;
    let analysis = capture_and_analyze(state, request.capture).await?;
    let result = evaluation::evaluate(&analysis, &profile);

    info!(
        style = %result.style,
        cohesion_score = result.cohesion_score,
        issues = result.issues.len(),
        "Evaluation complete"
    );
    Ok(result)
}

/// POST /evaluate
pub async fn evaluate_mix(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> ApiResult<Json<EvaluationResult>> {
    Ok(Json(run_evaluation(&state, request).await?))
}

/// POST /suggest
pub async fn suggest_adjustments(
    State(state): State<AppState>,
    Json(request): Json<EvaluateRequest>,
) -> ApiResult<Json<SuggestResponse>> {
    Ok(Json(run_evaluation(&state, request).await?.into()))
}

pub fn evaluate_routes() -> Router<AppState> {
    Router::new()
        .route("/evaluate", post(evaluate_mix))
        .route("/suggest", post(suggest_adjustments))
}

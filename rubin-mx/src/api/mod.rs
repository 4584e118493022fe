//! HTTP API handlers for rubin-mx

pub mod audition;
pub mod evaluate;
pub mod health;
pub mod snapshots;
pub mod spectral;
pub mod styles;

pub use audition::audition_routes;
pub use evaluate::evaluate_routes;
pub use health::health_routes;
pub use snapshots::snapshot_routes;
pub use spectral::spectral_routes;
pub use styles::style_routes;

use crate::analysis;
use crate::error::{ApiError, ApiResult};
use crate::AppState;
use rubin_common::analysis::AudioAnalysis;
use serde::Deserialize;
use tracing::info;

/// Longest capture a request may ask for, in seconds
pub const MAX_DURATION: f64 = 600.0;

/// Accepted capture sample rates, in Hz
pub const SAMPLE_RATE_RANGE: std::ops::RangeInclusive<u32> = 8000..=192_000;

/// Optional capture parameters shared by every capturing endpoint
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct CaptureParams {
    pub duration: Option<f64>,
    pub sample_rate: Option<u32>,
}

impl CaptureParams {
    /// Fill in defaults and validate
    pub fn resolve(&self, state: &AppState) -> ApiResult<(f64, u32)> {
        let duration = self.duration.unwrap_or(state.capture_defaults.duration);
        let sample_rate = self.sample_rate.unwrap_or(state.capture_defaults.sample_rate);

        if !(duration > 0.0 && duration <= MAX_DURATION) {
            return Err(ApiError::BadRequest(format!(
                "duration must be in (0, {}] seconds, got {}",
                MAX_DURATION, duration
            )));
        }
        if !SAMPLE_RATE_RANGE.contains(&sample_rate) {
            return Err(ApiError::BadRequest(format!(
                "sample_rate must be between {} and {} Hz, got {}",
                SAMPLE_RATE_RANGE.start(),
                SAMPLE_RATE_RANGE.end(),
                sample_rate
            )));
        }
        Ok((duration, sample_rate))
    }
}

/// Capture from the configured source and analyze, off the async runtime
pub(crate) async fn capture_and_analyze(state: &AppState, params: CaptureParams) -> ApiResult<AudioAnalysis> {
    let (duration, sample_rate) = params.resolve(state)?;
    let client = state.capture.clone();

    info!(source = client.name(), duration, sample_rate, "Capturing audio");

    tokio::task::spawn_blocking(move || -> ApiResult<AudioAnalysis> {
        let buffer = client.capture(duration, sample_rate)?;
        Ok(analysis::analyze(&buffer, sample_rate))
    })
    .await
    .map_err(|e| ApiError::Internal(format!("analysis task failed: {}", e)))?
}

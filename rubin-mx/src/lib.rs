//! rubin-mx library interface
//!
//! Exposes the analysis core, the evaluation engine and the HTTP shell so
//! the binary and integration tests share one router.

pub mod analysis;
pub mod api;
pub mod capture;
pub mod config;
pub mod error;
pub mod evaluation;
pub mod snapshots;
pub mod styles;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use capture::AudioClient;
use chrono::{DateTime, Utc};
use snapshots::SnapshotStore;
use std::sync::Arc;
use styles::StyleStore;
use tower_http::trace::TraceLayer;

/// Capture settings used when a request leaves them out
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaptureDefaults {
    pub duration: f64,
    pub sample_rate: u32,
}

impl Default for CaptureDefaults {
    fn default() -> Self {
        Self {
            duration: config::DEFAULT_DURATION,
            sample_rate: config::DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub styles: StyleStore,
    pub capture: Arc<dyn AudioClient>,
    pub snapshots: SnapshotStore,
    pub capture_defaults: CaptureDefaults,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(styles: StyleStore, capture: Arc<dyn AudioClient>, capture_defaults: CaptureDefaults) -> Self {
        Self {
            styles,
            capture,
            snapshots: SnapshotStore::new(),
            capture_defaults,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::health_routes())
        .merge(api::style_routes())
        .merge(api::evaluate_routes())
        .merge(api::audition_routes())
        .merge(api::spectral_routes())
        .merge(api::snapshot_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

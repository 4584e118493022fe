//! Style profile endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use rubin_common::StyleProfile;
use serde::Serialize;

use crate::{
    error::{ApiError, ApiResult},
    AppState,
};

#[derive(Debug, Serialize)]
pub struct StyleList {
    pub styles: Vec<String>,
    pub user_styles: Vec<String>,
}

/// GET /styles
pub async fn list_styles(State(state): State<AppState>) -> ApiResult<Json<StyleList>> {
    Ok(Json(StyleList {
        styles: state.styles.list()?,
        user_styles: state.styles.user_style_names()?,
    }))
}

/// GET /styles/:name
pub async fn get_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<StyleProfile>> {
    Ok(Json(state.styles.load(&name)?))
}

/// PUT /styles/:name
pub async fn put_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(profile): Json<StyleProfile>,
) -> ApiResult<Json<StyleProfile>> {
    if profile.name != name {
        return Err(ApiError::BadRequest(format!(
            "profile name '{}' does not match path '{}'",
            profile.name, name
        )));
    }
    state.styles.save_user(&profile)?;
    Ok(Json(profile))
}

/// DELETE /styles/:name
pub async fn delete_style(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<StatusCode> {
    if !state.styles.is_user_style(&name) && state.styles.is_builtin(&name) {
        return Err(ApiError::Conflict(format!("'{}' is a built-in style and cannot be deleted", name)));
    }
    state.styles.delete_user(&name)?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn style_routes() -> Router<AppState> {
    Router::new()
        .route("/styles", get(list_styles))
        .route("/styles/:name", get(get_style).put(put_style).delete(delete_style))
}

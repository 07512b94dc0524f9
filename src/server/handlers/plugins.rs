//! Plugin API handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, api_error};
use crate::host::HostState;
use crate::plugins::{self, ControlValue, PointerEvent};
use crate::server::state::AppState;

/// Body of a control update.
#[derive(Debug, Deserialize)]
pub struct ControlUpdate {
    pub value: ControlValue,
}

/// GET /api/plugins - List plugin identifiers.
pub async fn list() -> Json<Vec<&'static str>> {
    Json(plugins::PLUGINS.to_vec())
}

/// POST /api/plugins/:name/load - Replace the active plugin.
pub async fn load(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Result<Json<HostState>, ApiError> {
    let mut host = state.host.lock().await;
    match host.load(&name) {
        Ok(_) => Ok(Json(host.state())),
        Err(e) => Err((StatusCode::NOT_FOUND, e.to_string())),
    }
}

/// GET /api/plugin - Active plugin, controls and frame rate.
pub async fn current(State(state): State<Arc<AppState>>) -> Json<HostState> {
    Json(state.host.lock().await.state())
}

/// POST /api/plugin/controls/:key - Apply a control value.
pub async fn set_control(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(update): Json<ControlUpdate>,
) -> Result<Json<HostState>, ApiError> {
    let mut host = state.host.lock().await;
    host.set_control(&key, &update.value).map_err(api_error)?;
    Ok(Json(host.state()))
}

/// POST /api/plugin/pointer - Forward a pointer press or drag.
pub async fn pointer(
    State(state): State<Arc<AppState>>,
    Json(event): Json<PointerEvent>,
) -> StatusCode {
    if state.host.lock().await.pointer(&event) {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::CONFLICT
    }
}

/// POST /api/plugin/unload - Stop producing frames.
pub async fn unload(State(state): State<Arc<AppState>>) -> Json<HostState> {
    let mut host = state.host.lock().await;
    host.unload();
    Json(host.state())
}

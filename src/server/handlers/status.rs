//! Status endpoint.

use axum::{Json, extract::State};
use serde::Serialize;
use std::sync::Arc;

use crate::display::DisplayConfig;
use crate::pipeline::StatsSnapshot;
use crate::server::state::AppState;

#[derive(Debug, Serialize)]
pub struct Status {
    pub display: DisplayConfig,
    pub link: String,
    pub plugin: Option<&'static str>,
    pub frame_rate: u32,
    pub uptime_secs: u64,
    pub stats: StatsSnapshot,
}

/// GET /api/status - Pipeline counters and configuration.
pub async fn status(State(state): State<Arc<AppState>>) -> Json<Status> {
    let host = state.host.lock().await;
    Json(Status {
        display: state.display,
        link: state.link.clone(),
        plugin: host.current(),
        frame_rate: host.frame_rate(),
        uptime_secs: state.started.elapsed().as_secs(),
        stats: state.stats.snapshot(),
    })
}

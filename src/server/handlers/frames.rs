//! Frame preview and external frame ingest.

use axum::{
    Json,
    extract::{
        Query, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::frame::FrameMessage;
use crate::render;
use crate::server::state::AppState;

/// Last frame as JSON.
#[derive(Debug, Serialize)]
pub struct FrameView {
    pub cols: usize,
    pub rows: usize,
    pub bits: Vec<u8>,
}

#[derive(Debug, Deserialize)]
pub struct PngQuery {
    /// Pixels per dot
    #[serde(default = "default_scale")]
    pub scale: u32,
}

fn default_scale() -> u32 {
    12
}

/// GET /api/frame - Last produced frame.
pub async fn frame(State(state): State<Arc<AppState>>) -> Result<Json<FrameView>, StatusCode> {
    let host = state.host.lock().await;
    let frame = host.last_frame().ok_or(StatusCode::NO_CONTENT)?;
    Ok(Json(FrameView {
        cols: frame.cols(),
        rows: frame.rows(),
        bits: frame.to_wire_bits(),
    }))
}

/// GET /api/frame.png - PNG preview of the last produced frame.
pub async fn frame_png(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PngQuery>,
) -> Result<Response, (StatusCode, String)> {
    let frame = state
        .host
        .lock()
        .await
        .last_frame()
        .cloned()
        .ok_or((StatusCode::NO_CONTENT, String::new()))?;
    let png = render::frame_png(&frame, query.scale.clamp(1, 64))
        .map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;
    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        png,
    )
        .into_response())
}

/// GET /ws - Accept frame messages from an external producer.
pub async fn ws(State(state): State<Arc<AppState>>, upgrade: WebSocketUpgrade) -> Response {
    upgrade.on_upgrade(move |socket| ingest(socket, state))
}

async fn ingest(mut socket: WebSocket, state: Arc<AppState>) {
    info!("WebSocket client connected");
    while let Some(message) = socket.recv().await {
        let text = match message {
            Ok(Message::Text(text)) => text,
            Ok(Message::Close(_)) => break,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "WebSocket receive failed");
                break;
            }
        };
        handle_text(&state, &text);
    }
    info!("WebSocket client disconnected");
}

/// Validate one frame message and forward it onto the transport.
pub fn handle_text(state: &AppState, text: &str) {
    match FrameMessage::parse(text, &state.display) {
        Ok(frame) => {
            state.frames.send(frame);
        }
        Err(e) => {
            state.stats.record_rejected();
            warn!(error = %e, "Frame rejected");
        }
    }
}

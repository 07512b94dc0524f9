//! # HTTP Controller
//!
//! Web interface for choosing a plugin, adjusting its controls and
//! forwarding pointer input, plus a WebSocket endpoint for external frame
//! producers.
//!
//! ## Usage
//!
//! ```bash
//! flipdot serve --listen 0.0.0.0:3000 --device /dev/ttyUSB0 --plugin wave
//! ```
//!
//! Then open http://localhost:3000 in a browser.
//!
//! ## Routes
//!
//! | Method | Path | Purpose |
//! |--------|------|---------|
//! | GET  | `/api/plugins` | Plugin identifiers |
//! | POST | `/api/plugins/:name/load` | Load a plugin |
//! | GET  | `/api/plugin` | Active plugin, controls, frame rate |
//! | POST | `/api/plugin/controls/:key` | Set a control |
//! | POST | `/api/plugin/pointer` | Pointer press or drag |
//! | POST | `/api/plugin/unload` | Stop producing |
//! | GET  | `/api/frame`, `/api/frame.png` | Last frame |
//! | GET  | `/api/status` | Counters and configuration |
//! | GET  | `/ws` | Frame ingest |

mod handlers;
mod state;
mod static_files;

pub use state::{AppState, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::error::FlipdotError;
use crate::host::PluginHost;
use crate::pipeline::{Pipeline, Producer};
use crate::transport::{DisplayLink, MemoryLink, ReconnectingSerial};

/// Build the router over shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // Frontend
        .route("/", get(static_files::index_handler))
        .route("/assets/*path", get(static_files::asset_handler))
        // Plugin API
        .route("/api/plugins", get(handlers::plugins::list))
        .route("/api/plugins/:name/load", post(handlers::plugins::load))
        .route("/api/plugin", get(handlers::plugins::current))
        .route(
            "/api/plugin/controls/:key",
            post(handlers::plugins::set_control),
        )
        .route("/api/plugin/pointer", post(handlers::plugins::pointer))
        .route("/api/plugin/unload", post(handlers::plugins::unload))
        // Frames
        .route("/api/frame", get(handlers::frames::frame))
        .route("/api/frame.png", get(handlers::frames::frame_png))
        .route("/ws", get(handlers::frames::ws))
        // Status
        .route("/api/status", get(handlers::status::status))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the pipeline, the producer and the HTTP server.
///
/// Runs until the listener fails. The writer thread and producer task stop
/// with the process.
pub async fn serve(config: ServerConfig) -> Result<(), FlipdotError> {
    let mut host = PluginHost::new(config.display);
    host.set_frame_rate(config.frame_rate);
    if let Some(name) = &config.plugin {
        // An unknown startup plugin leaves the host idle; the UI can load another.
        if let Err(e) = host.load(name) {
            error!(error = %e, "Startup plugin not loaded");
        }
    }
    let host = Arc::new(Mutex::new(host));

    let link: Box<dyn DisplayLink> = if config.dry_run {
        Box::new(MemoryLink::dry_run(config.display))
    } else {
        Box::new(ReconnectingSerial::new(
            &config.device_path,
            config.display.baud_rate,
        ))
    };
    let link_name = link.describe();

    let pipeline = Pipeline::start(config.display, link, config.queue_depth)?;
    let frames = pipeline.sender.clone();
    tokio::spawn(Producer::new(host.clone(), frames.clone()).run());

    let app_state = Arc::new(AppState::new(config.display, link_name.clone(), host, frames));
    let app = router(app_state);

    info!(
        listen = %config.listen_addr,
        link = %link_name,
        display = config.display.name,
        "flipdot server starting"
    );

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            FlipdotError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;
    info!("Open http://{}/ in your browser", config.listen_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| FlipdotError::Transport(format!("Server error: {}", e)))?;

    drop(pipeline);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::DisplayConfig;
    use crate::pipeline::{PipelineStats, frame_channel};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const CONFIG: DisplayConfig = DisplayConfig::DUAL_28X14;

    fn app() -> (Router, Arc<AppState>) {
        let (frames, _rx) = frame_channel(4, Arc::new(PipelineStats::new()));
        let host = Arc::new(Mutex::new(PluginHost::new(CONFIG)));
        let state = Arc::new(AppState::new(CONFIG, "memory".to_string(), host, frames));
        (router(state.clone()), state)
    }

    async fn call(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => request
                .header("content-type", "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_list_plugins() {
        let (app, _) = app();
        let (status, body) = call(&app, "GET", "/api/plugins", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), crate::plugins::PLUGINS.len());
        assert!(body.as_array().unwrap().contains(&json!("wave")));
    }

    #[tokio::test]
    async fn test_load_and_set_control() {
        let (app, state) = app();
        let (status, body) = call(&app, "POST", "/api/plugins/bouncer/load", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["plugin"], json!("bouncer"));

        let (status, _) = call(
            &app,
            "POST",
            "/api/plugin/controls/frame_rate",
            Some(json!({ "value": 10 })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(state.host.lock().await.frame_rate(), 10);

        let (status, _) = call(
            &app,
            "POST",
            "/api/plugin/controls/nope",
            Some(json!({ "value": 1 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = call(
            &app,
            "POST",
            "/api/plugin/controls/frame_rate",
            Some(json!({ "value": "NaN" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(state.host.lock().await.frame_rate(), 10);
    }

    #[tokio::test]
    async fn test_unknown_plugin_is_not_found() {
        let (app, _) = app();
        let (status, _) = call(&app, "POST", "/api/plugins/nope/load", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, body) = call(&app, "GET", "/api/plugin", None).await;
        assert_eq!(body["plugin"], Value::Null);
    }

    #[tokio::test]
    async fn test_pointer_requires_plugin() {
        let (app, _) = app();
        let event = json!({ "x": 10.0, "y": 10.0 });
        let (status, _) = call(&app, "POST", "/api/plugin/pointer", Some(event.clone())).await;
        assert_eq!(status, StatusCode::CONFLICT);

        call(&app, "POST", "/api/plugins/dot_drawer/load", None).await;
        let (status, _) = call(&app, "POST", "/api/plugin/pointer", Some(event)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_frame_endpoints() {
        let (app, state) = app();
        let (status, _) = call(&app, "GET", "/api/frame", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        {
            let mut host = state.host.lock().await;
            host.load("panel_test").unwrap();
            host.tick().unwrap();
        }
        let (status, body) = call(&app, "GET", "/api/frame", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["cols"], json!(28));
        assert_eq!(body["bits"].as_array().unwrap().len(), 392);

        let request = Request::get("/api/frame.png").body(Body::empty()).unwrap();
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/png");
    }

    #[tokio::test]
    async fn test_status_reports_counters() {
        let (app, state) = app();
        handlers::frames::handle_text(&state, "{\"type\":\"frame\",\"bits\":[1]}");
        let (status, body) = call(&app, "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stats"]["rejected"], json!(1));
        assert_eq!(body["display"]["cols"], json!(28));
        assert_eq!(body["link"], json!("memory"));
    }

    #[tokio::test]
    async fn test_ws_text_is_queued() {
        let (app, state) = app();
        drop(app);
        let bits = vec![0u8; 392];
        let text = json!({ "type": "frame", "bits": bits }).to_string();
        handlers::frames::handle_text(&state, &text);
        let stats = state.stats.snapshot();
        assert_eq!(stats.produced, 1);
        assert_eq!(stats.rejected, 0);
    }

    #[tokio::test]
    async fn test_index_is_served() {
        let (app, _) = app();
        let request = Request::get("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

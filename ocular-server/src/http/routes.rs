use std::sync::atomic::Ordering;

use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

use crate::AppState;
use crate::signaling::ws_handler;

const INDEX_PAGE: &str = include_str!("../../assets/index.html");

/// Builds the complete application router: control page, snapshot stream,
/// camera API, and the signaling WebSocket.
pub fn app_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(home))
        .route("/stream", get(stream))
        .route("/api/status", get(status))
        .route("/api/start-camera", post(start_camera))
        .route("/api/stop-camera", post(stop_camera))
        .route("/ws", get(ws_handler))
        .layer(cors)
        .with_state(state)
}

/// Status document for the control page.
#[derive(Debug, Serialize)]
pub struct StreamStatus {
    pub port: u16,
    pub timestamp: DateTime<Utc>,
    pub camera: String,
    pub resolution: String,
    pub streaming: bool,
    pub peers: usize,
}

#[derive(Debug, Serialize)]
struct CameraReply {
    status: &'static str,
    message: String,
}

async fn home() -> Html<&'static str> {
    Html(INDEX_PAGE)
}

/// One JPEG snapshot. Capture failures yield a placeholder image with a 200
/// so the browser `<img>` keeps cycling instead of breaking.
async fn stream(State(state): State<AppState>) -> Response {
    match state.frames.capture_frame().await {
        Ok(frame) => {
            info!("Serving snapshot, {} bytes", frame.len());
            (
                [
                    (header::CONTENT_TYPE, "image/jpeg"),
                    (header::CACHE_CONTROL, "no-cache, no-store, must-revalidate"),
                    (header::PRAGMA, "no-cache"),
                    (header::EXPIRES, "0"),
                ],
                frame,
            )
                .into_response()
        }
        Err(e) => {
            warn!("No frame available: {}", e);
            (
                [(header::CONTENT_TYPE, "image/svg+xml")],
                placeholder_svg(&e.to_string()),
            )
                .into_response()
        }
    }
}

async fn status(State(state): State<AppState>) -> Json<StreamStatus> {
    Json(StreamStatus {
        port: state.config.port,
        timestamp: Utc::now(),
        camera: state.config.capture.command.clone(),
        resolution: state.config.resolution.clone(),
        streaming: state.streaming.load(Ordering::Relaxed),
        peers: state.registry.len(),
    })
}

/// Runs one capture before declaring the camera started, so missing tools
/// and denied permissions surface here instead of on the stream.
async fn start_camera(State(state): State<AppState>) -> Response {
    info!("Camera start requested");
    match state.frames.capture_frame().await {
        Ok(_) => {
            state.streaming.store(true, Ordering::Relaxed);
            Json(CameraReply {
                status: "started",
                message: "camera started".to_owned(),
            })
            .into_response()
        }
        Err(e) => {
            warn!("Camera start failed: {}", e);
            (
                StatusCode::BAD_REQUEST,
                Json(CameraReply {
                    status: "error",
                    message: format!("could not start camera: {e}"),
                }),
            )
                .into_response()
        }
    }
}

async fn stop_camera(State(state): State<AppState>) -> Response {
    state.streaming.store(false, Ordering::Relaxed);
    info!("Camera stopped");
    Json(CameraReply {
        status: "stopped",
        message: "camera stopped".to_owned(),
    })
    .into_response()
}

fn placeholder_svg(reason: &str) -> String {
    let reason = reason
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;");
    format!(
        r##"<svg width="640" height="480" xmlns="http://www.w3.org/2000/svg">
  <rect width="640" height="480" fill="#1a1a2e"/>
  <text x="320" y="225" font-family="sans-serif" font-size="26" fill="#ffffff" text-anchor="middle">Camera unavailable</text>
  <text x="320" y="265" font-family="sans-serif" font-size="15" fill="#ff6b6b" text-anchor="middle">{reason}</text>
</svg>"##
    )
}

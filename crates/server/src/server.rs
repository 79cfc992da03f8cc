//! HTTP server for Slack callbacks.
//!
//! Provides endpoints for:
//! - Slash commands (`POST /slack`)
//! - Outgoing webhooks (`POST /slack_hook`)
//! - Health checks (`GET /health`)

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::FormRejection, State},
    http::{
        header::{CONTENT_TYPE, HOST},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use robots::{Payload, RobotRegistry, TokenStore};
use serde_json::{json, Value};
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, warn};

use crate::auth::{authenticate_hook, authenticate_slash};

const NO_ROBOT_TEXT: &str = "No robot for that command yet :(";
const TEXT_PLAIN: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json; charset=utf-8";

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Robots by command.
    pub registry: Arc<RobotRegistry>,
    /// Request tokens.
    pub tokens: Arc<TokenStore>,
    /// Answer unknown commands with an empty body instead of a complaint.
    pub ignore_non_bot_messages: bool,
}

/// Build the HTTP router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/slack", post(slash_command_handler))
        .route("/slack_hook", post(outgoing_webhook_handler))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the server fails.
pub async fn run_server(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    info!(%addr, "Slackbot listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Slackbot stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully");
        },
        () = terminate => {
            info!("Received SIGTERM, shutting down gracefully");
        },
    }
}

/// Handle a slash command.
///
/// Robots reply as plain text.
async fn slash_command_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<Payload>, FormRejection>,
) -> Response {
    let payload = match form {
        Ok(Form(payload)) => payload.from_slash_command(),
        Err(e) => {
            warn!(error = %e, "Malformed slash command");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if !authenticate_slash(&state.tokens, &payload) {
        debug!(
            token = %payload.token,
            host = ?headers.get(HOST),
            "Ignoring request from unidentified source"
        );
        return StatusCode::BAD_REQUEST.into_response();
    }

    info!(
        robot = %payload.robot,
        team_domain = %payload.team_domain,
        user_name = %payload.user_name,
        "Slash command"
    );

    match state.registry.dispatch(&payload).await {
        Some(text) => ([(CONTENT_TYPE, TEXT_PLAIN)], text).into_response(),
        None => complain(&state, &payload),
    }
}

/// Handle an outgoing webhook.
///
/// Robots reply as a JSON `{"text": ...}` message.
async fn outgoing_webhook_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    form: Result<Form<Payload>, FormRejection>,
) -> Response {
    let payload = match form {
        Ok(Form(payload)) => payload,
        Err(e) => {
            warn!(error = %e, "Malformed outgoing webhook");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    if !authenticate_hook(&state.tokens, &payload) {
        debug!(
            token = %payload.token,
            host = ?headers.get(HOST),
            "Ignoring request from unidentified source"
        );
        return StatusCode::BAD_REQUEST.into_response();
    }

    let payload = payload.from_outgoing_webhook();

    info!(
        robot = %payload.robot,
        team_domain = %payload.team_domain,
        user_name = %payload.user_name,
        "Outgoing webhook"
    );

    match state.registry.dispatch(&payload).await {
        Some(text) => json_text(&text),
        None => complain(&state, &payload),
    }
}

/// Answer a command no robot handles.
fn complain(state: &AppState, payload: &Payload) -> Response {
    if state.ignore_non_bot_messages {
        info!(
            message = %payload.text,
            user_name = %payload.user_name,
            "Ignoring non-bot message"
        );
        return StatusCode::OK.into_response();
    }

    json_text(NO_ROBOT_TEXT)
}

fn json_text(text: &str) -> Response {
    let body = json!({ "text": text }).to_string();
    ([(CONTENT_TYPE, APPLICATION_JSON)], body).into_response()
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "slackbot",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

//! Router tests driving the Slack endpoints in-process.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    Router,
};
use robots::{Payload, Robot, RobotRegistry, TokenStore};
use slackbot::{build_router, AppState};
use tower::ServiceExt;

const FORM: &str = "application/x-www-form-urlencoded";

/// Replies with a fixed text and counts its runs.
struct Canned {
    reply: &'static str,
    runs: Arc<AtomicUsize>,
}

#[async_trait]
impl Robot for Canned {
    async fn run(&self, _payload: &Payload) -> String {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.reply.to_string()
    }

    fn description(&self) -> String {
        "Canned reply".to_string()
    }
}

/// Echoes the text it was given.
struct Echo;

#[async_trait]
impl Robot for Echo {
    async fn run(&self, payload: &Payload) -> String {
        format!("echo: {}", payload.text)
    }

    fn description(&self) -> String {
        "Echo".to_string()
    }
}

struct Fixture {
    router: Router,
    runs: Arc<AtomicUsize>,
}

fn fixture(ignore_non_bot_messages: bool) -> Fixture {
    let runs = Arc::new(AtomicUsize::new(0));

    let mut registry = RobotRegistry::new();
    registry.register(
        "download-prometheus",
        Arc::new(Canned {
            reply: "  first  ",
            runs: Arc::clone(&runs),
        }),
    );
    registry.register(
        "download-prometheus",
        Arc::new(Canned {
            reply: "second",
            runs: Arc::clone(&runs),
        }),
    );
    registry.register("echo", Arc::new(Echo));

    let tokens = TokenStore::from_pairs([
        ("DOWNLOAD_PROMETHEUS_SLACK_TOKEN", "slash-secret"),
        ("DINGO_TILES_OUT_TOKEN", "out-secret"),
    ]);

    let state = AppState {
        registry: Arc::new(registry),
        tokens: Arc::new(tokens),
        ignore_non_bot_messages,
    };

    Fixture {
        router: build_router(state),
        runs,
    }
}

async fn post(router: Router, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, FORM)
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .map(|v| v.to_str().unwrap().to_string());
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();

    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_slash_command_runs_robots_in_order() {
    let fixture = fixture(false);

    let (status, content_type, body) = post(
        fixture.router,
        "/slack",
        "token=slash-secret&command=%2Fdownload-prometheus&team_domain=dingo-tiles&user_name=drnic",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/plain; charset=utf-8"));
    assert_eq!(body, "first  \nsecond");
    assert_eq!(fixture.runs.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_slash_command_wrong_token_rejected() {
    let fixture = fixture(false);

    let (status, _, _) = post(
        fixture.router,
        "/slack",
        "token=nope&command=%2Fdownload-prometheus",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(fixture.runs.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_slash_command_missing_command_rejected() {
    let fixture = fixture(false);

    let (status, _, _) = post(fixture.router, "/slack", "token=slash-secret").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_slash_command_without_configured_token() {
    let fixture = fixture(false);

    let (status, _, body) = post(
        fixture.router,
        "/slack",
        "token=anything&command=%2Fecho&text=hello+there",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "echo: hello there");
}

#[tokio::test]
async fn test_unknown_slash_command_complains() {
    let fixture = fixture(false);

    let (status, content_type, body) =
        post(fixture.router, "/slack", "token=anything&command=%2Fmissing").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["text"], "No robot for that command yet :(");
}

#[tokio::test]
async fn test_unknown_command_ignored_when_configured() {
    let fixture = fixture(true);

    let (status, _, body) =
        post(fixture.router, "/slack", "token=anything&command=%2Fmissing").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_form_rejected() {
    let fixture = fixture(false);

    let request = Request::builder()
        .method("POST")
        .uri("/slack")
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"command":"/echo"}"#))
        .unwrap();
    let response = fixture.router.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_outgoing_webhook_strips_trigger_word() {
    let fixture = fixture(false);

    let (status, content_type, body) = post(
        fixture.router,
        "/slack_hook",
        "token=out-secret&team_domain=dingo-tiles&trigger_word=bot&text=bot+echo+some+words",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        content_type.as_deref(),
        Some("application/json; charset=utf-8")
    );
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["text"], "echo: some words");
}

#[tokio::test]
async fn test_outgoing_webhook_wrong_token_rejected() {
    let fixture = fixture(false);

    let (status, _, _) = post(
        fixture.router,
        "/slack_hook",
        "token=slash-secret&team_domain=dingo-tiles&trigger_word=bot&text=bot+echo",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_outgoing_webhook_unconfigured_team_rejected() {
    let fixture = fixture(false);

    let (status, _, _) = post(
        fixture.router,
        "/slack_hook",
        "team_domain=elsewhere&trigger_word=bot&text=bot+echo",
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_outgoing_webhook_unknown_robot_complains() {
    let fixture = fixture(false);

    let (status, _, body) = post(
        fixture.router,
        "/slack_hook",
        "token=out-secret&team_domain=dingo-tiles&trigger_word=bot&text=bot+dance",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["text"], "No robot for that command yet :(");
}

#[tokio::test]
async fn test_health() {
    let fixture = fixture(false);

    let request = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let response = fixture.router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["service"], "slackbot");
}

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use stockwidget_server::{api::app_router, build_state, config::Config, AppState};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

struct TestApp {
    router: Router,
    state: Arc<AppState>,
    _dir: TempDir,
}

async fn build_test_app() -> TestApp {
    let dir = tempdir().unwrap();
    let mut config = Config::with_data_dir(dir.path());
    // Nothing listens here; tests never configure an API key anyway
    config.provider_url = "http://127.0.0.1:9".to_string();

    let state = build_state(&config).await.unwrap();
    let router = app_router(state.clone(), &config).unwrap();
    TestApp {
        router,
        state,
        _dir: dir,
    }
}

async fn send(app: &TestApp, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

async fn json_body(response: Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn healthz_responds_ok() {
    let app = build_test_app().await;
    let response = send(&app, Method::GET, "/api/v1/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn unknown_symbol_returns_placeholder_quote() {
    let app = build_test_app().await;

    let response = send(&app, Method::GET, "/api/v1/quotes/%20aapl%20", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    let quote = json_body(response).await;
    assert_eq!(quote["symbol"], "AAPL");
    assert_eq!(quote["price"], 150.0);

    let blank = send(&app, Method::GET, "/api/v1/quotes/%20", None).await;
    assert_eq!(blank.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn refresh_is_accepted() {
    let app = build_test_app().await;
    let response = send(&app, Method::POST, "/api/v1/refresh", None).await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
}

#[tokio::test]
async fn widget_lifecycle_controls_recurring_updates() {
    let app = build_test_app().await;
    assert_eq!(app.state.scheduler.recurring_interval(), None);

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/widgets/7",
        Some(serde_json::json!({ "symbol": "msft", "theme": "dark" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let widget = json_body(response).await;
    assert_eq!(widget["id"], 7);
    assert_eq!(widget["size"], "normal");
    assert_eq!(widget["surface"]["symbol"], "MSFT");
    assert_eq!(app.state.scheduler.recurring_interval(), Some(15));

    let listed = json_body(send(&app, Method::GET, "/api/v1/widgets", None).await).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let deleted = send(&app, Method::DELETE, "/api/v1/widgets/7", None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.state.scheduler.recurring_interval(), None);

    let again = send(&app, Method::DELETE, "/api/v1/widgets/7", None).await;
    assert_eq!(again.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn widget_rejects_conflicting_click_actions() {
    let app = build_test_app().await;
    let response = send(
        &app,
        Method::PUT,
        "/api/v1/widgets/1",
        Some(serde_json::json!({
            "symbol": "SPY",
            "launchApp": "com.example.broker",
            "launchUrl": "https://example.com/{SYMBOL}"
        })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["code"], 400);
}

#[tokio::test]
async fn small_widget_is_deleted_by_size() {
    let app = build_test_app().await;
    let response = send(
        &app,
        Method::PUT,
        "/api/v1/widgets/2",
        Some(serde_json::json!({ "size": "small", "symbol": "QQQ" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let wrong_size = send(&app, Method::DELETE, "/api/v1/widgets/2", None).await;
    assert_eq!(wrong_size.status(), StatusCode::NOT_FOUND);

    let deleted = send(&app, Method::DELETE, "/api/v1/widgets/2?size=small", None).await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn settings_clamp_interval_and_hide_credential() {
    let app = build_test_app().await;

    let response = send(
        &app,
        Method::PUT,
        "/api/v1/settings",
        Some(serde_json::json!({ "credential": "  abc123 ", "refreshIntervalMinutes": 5 })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let settings = json_body(response).await;
    assert_eq!(settings["hasCredential"], true);
    assert_eq!(settings["refreshIntervalMinutes"], 15);
    assert!(settings.get("credential").is_none());

    let fetched = json_body(send(&app, Method::GET, "/api/v1/settings", None).await).await;
    assert_eq!(fetched, settings);
}

#[tokio::test]
async fn status_reports_scheduler_state() {
    let app = build_test_app().await;
    let status = json_body(send(&app, Method::GET, "/api/v1/status", None).await).await;
    assert_eq!(status["refreshIntervalMinutes"], 15);
    assert_eq!(status["exchangeTimezone"], "America/New_York");
    assert!(status["recurringIntervalMinutes"].is_null());
    assert!(status["marketOpen"].is_boolean());
}

#[tokio::test]
async fn url_templates_are_listed() {
    let app = build_test_app().await;
    let templates = json_body(send(&app, Method::GET, "/api/v1/url-templates", None).await).await;
    let templates = templates.as_array().unwrap();
    assert_eq!(templates.len(), 7);
    assert!(templates
        .iter()
        .all(|t| t["template"].as_str().unwrap().contains("{SYMBOL}")));
}

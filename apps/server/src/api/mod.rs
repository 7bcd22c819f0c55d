pub mod quotes;
pub mod settings;
pub mod status;
pub mod widgets;

use std::sync::Arc;

use anyhow::Context;
use axum::{http::HeaderValue, routing::get, Router};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{config::Config, main_lib::AppState};

pub async fn healthz() -> &'static str {
    "ok"
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> anyhow::Result<Router> {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .context("Invalid SW_CORS_ALLOW_ORIGINS")?;
        CorsLayer::new().allow_origin(AllowOrigin::list(origins))
    };

    let api = Router::new()
        .route("/healthz", get(healthz))
        .merge(status::router())
        .merge(quotes::router())
        .merge(widgets::router())
        .merge(settings::router());

    Ok(Router::new()
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http()))
}

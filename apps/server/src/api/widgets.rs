use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::Deserialize;
use stockwidget_core::{
    settings::SettingsStore,
    widgets::{WidgetConfig, WidgetKey, WidgetSize, WidgetTheme},
};
use stockwidget_market_data::normalize_symbol;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    scheduler,
    widget_host::RenderedWidget,
};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WidgetUpdate {
    #[serde(default)]
    size: WidgetSize,
    symbol: String,
    launch_app: Option<String>,
    launch_url: Option<String>,
    #[serde(default)]
    theme: WidgetTheme,
}

#[derive(Deserialize)]
struct SizeQuery {
    #[serde(default)]
    size: WidgetSize,
}

async fn list_widgets(State(state): State<Arc<AppState>>) -> Json<Vec<RenderedWidget>> {
    Json(state.widget_host.rendered())
}

/// Creates or replaces a widget configuration and renders it.
async fn upsert_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Json(body): Json<WidgetUpdate>,
) -> ApiResult<Json<RenderedWidget>> {
    let symbol = normalize_symbol(&body.symbol)
        .ok_or_else(|| ApiError::BadRequest("Symbol must not be empty".to_string()))?;
    if body.launch_app.is_some() && body.launch_url.is_some() {
        return Err(ApiError::BadRequest(
            "Set either launchApp or launchUrl, not both".to_string(),
        ));
    }

    let config = WidgetConfig {
        id,
        size: body.size,
        symbol,
        launch_app: body.launch_app,
        launch_url: body.launch_url,
        theme: body.theme,
    };
    state.prefs.upsert_widget(config.clone())?;
    let rendered = state.widget_host.render_widget(&config);

    scheduler::sync_recurring_updates(&state);
    if !state.cache.has_real_data(&config.symbol) {
        state.scheduler.trigger_immediate();
    }

    Ok(Json(rendered))
}

async fn delete_widget(
    State(state): State<Arc<AppState>>,
    Path(id): Path<u32>,
    Query(query): Query<SizeQuery>,
) -> ApiResult<StatusCode> {
    let key = WidgetKey::new(query.size, id);
    if !state.prefs.remove_widget(key)? {
        return Err(ApiError::NotFound);
    }
    state.widget_host.forget(key);
    scheduler::sync_recurring_updates(&state);
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/widgets", get(list_widgets))
        .route("/widgets/{id}", put(upsert_widget).delete(delete_widget))
}

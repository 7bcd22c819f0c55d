use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::{Deserialize, Serialize};
use stockwidget_core::{
    settings::SettingsStore,
    widgets::{builtin_url_templates, UrlTemplate},
};
use tracing::info;

use crate::{error::ApiResult, main_lib::AppState, scheduler};

/// Settings as exposed over HTTP. The API key itself is never returned.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SettingsView {
    has_credential: bool,
    refresh_interval_minutes: u32,
    widget_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsUpdate {
    credential: Option<String>,
    refresh_interval_minutes: Option<u32>,
}

fn settings_view(state: &AppState) -> ApiResult<SettingsView> {
    let settings = state.prefs.settings()?;
    Ok(SettingsView {
        has_credential: settings.has_credential(),
        refresh_interval_minutes: state.prefs.refresh_interval_minutes()?,
        widget_count: settings.widgets.len(),
    })
}

async fn get_settings(State(state): State<Arc<AppState>>) -> ApiResult<Json<SettingsView>> {
    Ok(Json(settings_view(&state)?))
}

/// Stores the new settings, restarts the timer and queues a forced cycle.
async fn update_settings(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SettingsUpdate>,
) -> ApiResult<Json<SettingsView>> {
    if let Some(credential) = &body.credential {
        state.prefs.set_credential(credential)?;
        info!(
            "API key {}",
            if credential.trim().is_empty() { "cleared" } else { "updated" }
        );
    }
    if let Some(minutes) = body.refresh_interval_minutes {
        let stored = state.prefs.set_refresh_interval_minutes(minutes)?;
        info!("Refresh interval set to {} minutes", stored);
    }

    scheduler::reschedule_if_running(&state);
    state.scheduler.trigger_immediate();

    Ok(Json(settings_view(&state)?))
}

async fn list_url_templates() -> Json<Vec<UrlTemplate>> {
    Json(builtin_url_templates())
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/settings", get(get_settings).put(update_settings))
        .route("/url-templates", get(list_url_templates))
}

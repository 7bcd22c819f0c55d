use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use stockwidget_core::{
    settings::SettingsStore,
    status::{StatusLog, UpdateStatus},
    updater::CycleReport,
};

use crate::{error::ApiResult, main_lib::AppState};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StatusView {
    #[serde(flatten)]
    status: UpdateStatus,
    market_open: bool,
    exchange_timezone: String,
    refresh_interval_minutes: u32,
    recurring_interval_minutes: Option<u32>,
    cached_symbols: usize,
    last_cycle: Option<CycleReport>,
}

/// Update timestamps plus scheduler diagnostics.
async fn get_status(State(state): State<Arc<AppState>>) -> ApiResult<Json<StatusView>> {
    let refresh_interval_minutes = state.prefs.refresh_interval_minutes()?;
    Ok(Json(StatusView {
        status: state.prefs.status()?,
        market_open: state.calendar.is_open(Utc::now(), refresh_interval_minutes),
        exchange_timezone: state.calendar.timezone().name().to_string(),
        refresh_interval_minutes,
        recurring_interval_minutes: state.scheduler.recurring_interval(),
        cached_symbols: state.cache.len(),
        last_cycle: state.scheduler.last_report(),
    }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

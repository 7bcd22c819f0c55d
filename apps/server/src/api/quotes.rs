use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use stockwidget_core::cache::CacheSnapshot;
use stockwidget_market_data::{normalize_symbol, Quote};

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
};

async fn list_quotes(State(state): State<Arc<AppState>>) -> Json<CacheSnapshot> {
    Json(state.cache.snapshot())
}

/// Cached quote, or the placeholder when the symbol was never fetched.
async fn get_quote(
    State(state): State<Arc<AppState>>,
    Path(symbol): Path<String>,
) -> ApiResult<Json<Quote>> {
    let symbol = normalize_symbol(&symbol)
        .ok_or_else(|| ApiError::BadRequest("Symbol must not be empty".to_string()))?;
    Ok(Json(state.cache.get(&symbol)))
}

/// Queues a forced update cycle.
async fn refresh(State(state): State<Arc<AppState>>) -> StatusCode {
    state.scheduler.trigger_immediate();
    StatusCode::ACCEPTED
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/quotes", get(list_quotes))
        .route("/quotes/{symbol}", get(get_quote))
        .route("/refresh", post(refresh))
}

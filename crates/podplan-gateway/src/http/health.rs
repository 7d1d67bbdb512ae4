use axum::{extract::State, Json};
use serde_json::{json, Value};
use std::sync::Arc;

use super::{store_error, HandlerResult};
use crate::app::AppState;

/// GET /health: liveness probe with catalog sizes.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> HandlerResult<Json<Value>> {
    let (podcasts, episodes) = state.catalog.counts().map_err(store_error)?;
    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "commit": env!("PODPLAN_GIT_SHA"),
        "podcasts": podcasts,
        "episodes": episodes,
    })))
}

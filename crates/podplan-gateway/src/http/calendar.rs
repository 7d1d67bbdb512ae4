use axum::{
    extract::{Query, State},
    Json,
};
use podplan_calendar::{build_view, NavParams, SchedulerView, ViewMode};
use podplan_core::dates::parse_day;
use serde::Deserialize;
use std::sync::Arc;

use super::{
    bad_request, calendar_error,
    page::{render, today, Page},
    HandlerResult,
};
use crate::app::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ViewQuery {
    /// `day` | `week` | `month` | `year`; anything else shows the month.
    pub mode: Option<String>,
    /// `YYYY-MM-DD`; defaults to today.
    pub date: Option<String>,
}

/// GET|POST /calendar_view
pub async fn calendar_view(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ViewQuery>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<SchedulerView>>> {
    let mode = ViewMode::from_param(query.mode.as_deref());
    let selected = match query.date.as_deref().map(str::trim) {
        None | Some("") => today(),
        Some(raw) => parse_day(raw).map_err(bad_request)?,
    };
    let view = build_view(&state.catalog, mode, selected).map_err(calendar_error)?;
    render(&state, &nav, view)
}

//! Episode pages: listing with date filter, search, create, detail, edit,
//! delete and the calendar's drag-and-drop date update.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use chrono::Local;
use podplan_calendar::NavParams;
use podplan_core::{non_blank, DateRange, EpisodeForm, EpisodeId, PodcastId};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::{
    bad_request,
    page::{redirect, render, Page},
    store_error, HandlerResult,
};
use crate::app::AppState;

/// Podcast an edited or deleted episode redirects to when it has none.
const FALLBACK_PODCAST: PodcastId = 1;

#[derive(Debug, Default, Deserialize)]
pub struct DateFilter {
    /// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
    pub date: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DateUpdate {
    pub episode_id: String,
    pub new_date: String,
}

/// GET /all_episodes: every episode by date, optionally narrowed to a year,
/// month or day.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DateFilter>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let date = non_blank(&filter.date);
    let range = date
        .map(DateRange::parse_filter)
        .transpose()
        .map_err(bad_request)?;
    let episodes = state
        .catalog
        .list_episodes(range.as_ref())
        .map_err(store_error)?;
    render(&state, &nav, json!({ "episodes": episodes, "date": date }))
}

/// GET /search?q=
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let q = query.q.unwrap_or_default();
    let episodes = state.catalog.search_episodes(&q).map_err(store_error)?;
    render(&state, &nav, json!({ "episodes": episodes, "query": q }))
}

/// GET /add_episode: form defaults for an episode not tied to a podcast.
/// The date comes from `?date=` (a calendar click) or defaults to now.
pub async fn add_form(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<DateFilter>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let scheduled_date = match non_blank(&filter.date) {
        Some(date) => date.to_string(),
        None => Local::now().format("%Y-%m-%dT%H:%M").to_string(),
    };
    let podcasts = state.catalog.list_podcasts().map_err(store_error)?;
    render(
        &state,
        &nav,
        json!({ "scheduled_date": scheduled_date, "podcasts": podcasts }),
    )
}

/// POST /add_episode
pub async fn add(
    State(state): State<Arc<AppState>>,
    Form(form): Form<EpisodeForm>,
) -> HandlerResult<Redirect> {
    state
        .catalog
        .create_episode(form.podcast_id, &form)
        .map_err(store_error)?;
    Ok(redirect(&state, "/all_episodes"))
}

/// GET /episode/{id}
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EpisodeId>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let episode = state.catalog.get_episode(id).map_err(store_error)?;
    render(&state, &nav, json!({ "episode": episode }))
}

/// GET /episode/{id}/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EpisodeId>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let episode = state.catalog.get_episode(id).map_err(store_error)?;
    let podcasts = state.catalog.list_podcasts().map_err(store_error)?;
    render(&state, &nav, json!({ "episode": episode, "podcasts": podcasts }))
}

/// POST /episode/{id}/edit: redirects to the podcast named in the form.
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EpisodeId>,
    Form(form): Form<EpisodeForm>,
) -> HandlerResult<Redirect> {
    if !state.catalog.update_episode(id, &form).map_err(store_error)? {
        debug!(id, "edit for unknown episode ignored");
    }
    let target = form.podcast_id.unwrap_or(FALLBACK_PODCAST);
    Ok(redirect(&state, &format!("/podcast/{target}")))
}

/// POST /episode/{id}/delete: redirects to the podcast the episode belonged to.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<EpisodeId>,
) -> HandlerResult<Redirect> {
    let removed = state.catalog.delete_episode(id).map_err(store_error)?;
    let owner = removed
        .and_then(|ep| ep.podcast_id)
        .unwrap_or(FALLBACK_PODCAST);
    Ok(redirect(&state, &format!("/podcast/{owner}")))
}

/// POST /update_episode_date: no validation of either field; the answer is
/// always `success`.
pub async fn update_date(
    State(state): State<Arc<AppState>>,
    Form(update): Form<DateUpdate>,
) -> HandlerResult<&'static str> {
    match update.episode_id.trim().parse::<EpisodeId>() {
        Ok(id) => {
            state
                .catalog
                .update_episode_date(id, &update.new_date)
                .map_err(store_error)?;
        }
        Err(_) => debug!(episode_id = %update.episode_id, "date update for malformed id ignored"),
    }
    Ok("success")
}

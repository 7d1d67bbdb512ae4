//! Podcast pages: list, create, detail, edit, delete and adding an episode
//! to a podcast.

use axum::{
    extract::{Path, Query, State},
    response::Redirect,
    Form, Json,
};
use podplan_calendar::NavParams;
use podplan_core::{EpisodeForm, PodcastForm, PodcastId};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

use super::{
    page::{redirect, render, Page},
    store_error, HandlerResult,
};
use crate::app::AppState;

/// GET /: all podcasts ordered by id.
pub async fn list(
    State(state): State<Arc<AppState>>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let podcasts = state.catalog.list_podcasts().map_err(store_error)?;
    render(&state, &nav, json!({ "podcasts": podcasts }))
}

/// POST /add
pub async fn create(
    State(state): State<Arc<AppState>>,
    Form(form): Form<PodcastForm>,
) -> HandlerResult<Redirect> {
    state.catalog.create_podcast(&form).map_err(store_error)?;
    Ok(redirect(&state, "/"))
}

/// GET /podcast/{id}: the podcast with its episodes by date, or a null
/// podcast when the id is unknown.
pub async fn detail(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let podcast = state.catalog.get_podcast(id).map_err(store_error)?;
    let episodes = match podcast {
        Some(_) => state.catalog.podcast_episodes(id).map_err(store_error)?,
        None => {
            debug!(id, "podcast not found");
            Vec::new()
        }
    };
    render(&state, &nav, json!({ "podcast": podcast, "episodes": episodes }))
}

/// GET /podcast/{id}/edit
pub async fn edit_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let podcast = state.catalog.get_podcast(id).map_err(store_error)?;
    render(&state, &nav, json!({ "podcast": podcast }))
}

/// POST /podcast/{id}/edit
pub async fn edit(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
    Form(form): Form<PodcastForm>,
) -> HandlerResult<Redirect> {
    if !state.catalog.update_podcast(id, &form).map_err(store_error)? {
        debug!(id, "edit for unknown podcast ignored");
    }
    Ok(redirect(&state, &format!("/podcast/{id}")))
}

/// POST /podcast/{id}/delete: removes the podcast and all its episodes.
pub async fn delete(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
) -> HandlerResult<Redirect> {
    state.catalog.delete_podcast(id).map_err(store_error)?;
    Ok(redirect(&state, "/"))
}

/// GET /podcast/{id}/add_episode
pub async fn add_episode_form(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
    Query(nav): Query<NavParams>,
) -> HandlerResult<Json<Page<Value>>> {
    let podcast = state.catalog.get_podcast(id).map_err(store_error)?;
    render(&state, &nav, json!({ "podcast_id": id, "podcast": podcast }))
}

/// POST /podcast/{id}/add_episode
pub async fn add_episode(
    State(state): State<Arc<AppState>>,
    Path(id): Path<PodcastId>,
    Form(form): Form<EpisodeForm>,
) -> HandlerResult<Redirect> {
    state
        .catalog
        .create_episode(Some(id), &form)
        .map_err(store_error)?;
    Ok(redirect(&state, &format!("/podcast/{id}")))
}

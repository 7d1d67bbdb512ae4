use axum::{
    routing::{get, post},
    Router,
};
use podplan_core::config::PodplanConfig;
use podplan_store::CatalogStore;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::http::{calendar, episodes, health, podcasts};

/// Central shared state, passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: PodplanConfig,
    pub catalog: CatalogStore,
}

impl AppState {
    pub fn new(config: PodplanConfig, catalog: CatalogStore) -> Self {
        Self { config, catalog }
    }
}

/// Assemble the full Axum router, nested under the configured prefix.
pub fn build_router(state: Arc<AppState>) -> Router {
    let mount = state.config.gateway.mount_path();
    let cors = state.config.gateway.cors;

    let routes = Router::new()
        .route("/", get(podcasts::list))
        .route("/add", post(podcasts::create))
        .route("/podcast/{id}", get(podcasts::detail))
        .route(
            "/podcast/{id}/edit",
            get(podcasts::edit_form).post(podcasts::edit),
        )
        .route("/podcast/{id}/delete", post(podcasts::delete))
        .route(
            "/podcast/{id}/add_episode",
            get(podcasts::add_episode_form).post(podcasts::add_episode),
        )
        .route("/all_episodes", get(episodes::list))
        .route("/search", get(episodes::search))
        .route("/add_episode", get(episodes::add_form).post(episodes::add))
        .route("/episode/{id}", get(episodes::detail))
        .route(
            "/episode/{id}/edit",
            get(episodes::edit_form).post(episodes::edit),
        )
        .route("/episode/{id}/delete", post(episodes::delete))
        .route("/update_episode_date", post(episodes::update_date))
        .route(
            "/calendar_view",
            get(calendar::calendar_view).post(calendar::calendar_view),
        )
        .route("/health", get(health::health_handler))
        .with_state(state);

    let router = if mount.is_empty() {
        routes
    } else {
        Router::new().nest(&mount, routes)
    };
    let router = if cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use podplan_core::{EpisodeForm, PodcastForm};
    use rusqlite::Connection;
    use serde_json::Value;
    use tower::ServiceExt;

    fn app_with(config: PodplanConfig) -> (Router, Arc<AppState>) {
        let conn = Connection::open_in_memory().unwrap();
        podplan_store::db::init_db(&conn).unwrap();
        let state = Arc::new(AppState::new(config, CatalogStore::new(conn)));
        (build_router(state.clone()), state)
    }

    fn app() -> (Router, Arc<AppState>) {
        app_with(PodplanConfig::default())
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let resp = app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    async fn post_form(app: &Router, uri: &str, body: &str) -> Response {
        app.clone()
            .oneshot(
                Request::post(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    fn location(resp: &Response) -> &str {
        resp.headers()[header::LOCATION].to_str().unwrap()
    }

    fn seed_episode(state: &AppState, podcast_id: Option<i64>, title: &str, date: &str) -> i64 {
        let form = EpisodeForm {
            title: title.to_string(),
            scheduled_date: date.to_string(),
            kind: Some("Solo".into()),
            ..Default::default()
        };
        state.catalog.create_episode(podcast_id, &form).unwrap().id
    }

    #[tokio::test]
    async fn health_reports_counts() {
        let (app, _) = app();
        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["podcasts"], 0);
        assert_eq!(body["episodes"], 0);
    }

    #[tokio::test]
    async fn health_names_build_commit() {
        let (app, _) = app();
        let (_, body) = get_json(&app, "/health").await;
        let commit = body["commit"].as_str().unwrap();
        assert!(!commit.is_empty());
        assert_eq!(commit, commit.trim());
    }

    #[tokio::test]
    async fn create_podcast_then_list() {
        let (app, _) = app();
        let resp = post_form(&app, "/add", "title=Tech+Talk&host=Ana").await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/");

        let (status, body) = get_json(&app, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["page"]["podcasts"][0]["title"], "Tech Talk");
        assert_eq!(body["page"]["podcasts"][0]["host"], "Ana");
        assert_eq!(body["calendar_months"].as_array().unwrap().len(), 2);
        assert_eq!(body["offset"], 0);
        assert!(body["today"].is_string());
    }

    #[tokio::test]
    async fn episode_flows_into_detail_and_day_view() {
        let (app, state) = app();
        post_form(&app, "/add", "title=Tech+Talk&host=Ana").await;
        let resp = post_form(
            &app,
            "/podcast/1/add_episode",
            "title=Ep1&scheduled_date=2024-03-15&type=Solo&guest=",
        )
        .await;
        assert_eq!(location(&resp), "/podcast/1");
        assert_eq!(state.catalog.counts().unwrap(), (1, 1));

        let (_, detail) = get_json(&app, "/podcast/1").await;
        assert_eq!(detail["page"]["podcast"]["title"], "Tech Talk");
        assert_eq!(detail["page"]["episodes"][0]["title"], "Ep1");

        let (status, view) = get_json(&app, "/calendar_view?mode=day&date=2024-03-15").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["page"]["mode"], "day");
        assert_eq!(view["page"]["episodes"][0]["title"], "Ep1");
        assert_eq!(view["page"]["prev_anchor"], "2024-03-14");
        assert_eq!(view["page"]["next_anchor"], "2024-03-16");
    }

    #[tokio::test]
    async fn calendar_jump_selects_months() {
        let (app, state) = app();
        seed_episode(&state, None, "Winter", "2023-02-14");
        let (status, body) =
            get_json(&app, "/all_episodes?calnav=jump&jump_month=2&jump_year=2023&offset=4").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["offset"], 0);
        let months = body["calendar_months"].as_array().unwrap();
        assert_eq!(months[0]["name"], "February");
        assert_eq!(months[0]["year"], 2023);
        assert_eq!(months[1]["name"], "March");

        let cell = months[0]["weeks"]
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|w| w.as_array().unwrap())
            .find(|c| c["date"] == "2023-02-14")
            .unwrap();
        assert_eq!(cell["episode"], "Winter");
        assert_eq!(cell["info"], "solo");
    }

    #[tokio::test]
    async fn malformed_parameters_are_bad_requests() {
        let (app, _) = app();
        for uri in [
            "/?calnav=next&offset=soon",
            "/?calnav=jump&jump_month=13&jump_year=2024",
            "/calendar_view?date=15/03/2024",
            "/all_episodes?date=2024-13",
        ] {
            let (status, body) = get_json(&app, uri).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
            assert!(body["error"].is_string(), "{uri}");
        }
    }

    #[tokio::test]
    async fn unknown_records_render_null() {
        let (app, _) = app();
        let (status, body) = get_json(&app, "/podcast/99").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["page"]["podcast"].is_null());
        assert_eq!(body["page"]["episodes"], serde_json::json!([]));

        let (status, body) = get_json(&app, "/episode/99").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["page"]["episode"].is_null());
    }

    #[tokio::test]
    async fn listing_filter_and_search() {
        let (app, state) = app();
        seed_episode(&state, None, "March talk", "2024-03-02");
        seed_episode(&state, None, "April talk", "2024-04-02");

        let (_, body) = get_json(&app, "/all_episodes?date=2024-03").await;
        let listed = body["page"]["episodes"].as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["title"], "March talk");

        let (_, body) = get_json(&app, "/all_episodes").await;
        assert_eq!(body["page"]["episodes"].as_array().unwrap().len(), 2);

        let (_, body) = get_json(&app, "/search?q=APRIL").await;
        assert_eq!(body["page"]["episodes"][0]["title"], "April talk");

        let (_, body) = get_json(&app, "/search?q=").await;
        assert!(body["page"]["episodes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn add_form_prefills_date() {
        let (app, _) = app();
        let (_, body) = get_json(&app, "/add_episode?date=2024-05-01").await;
        assert_eq!(body["page"]["scheduled_date"], "2024-05-01");

        let (_, body) = get_json(&app, "/add_episode").await;
        let now = body["page"]["scheduled_date"].as_str().unwrap();
        assert_eq!(now.len(), "YYYY-MM-DDTHH:MM".len());
        assert_eq!(&now[10..11], "T");
    }

    #[tokio::test]
    async fn unassociated_episode_redirects_to_listing() {
        let (app, state) = app();
        let resp = post_form(
            &app,
            "/add_episode",
            "podcast_id=&title=Loose&scheduled_date=2024-07-04T10%3A30&type=&guest=Maria",
        )
        .await;
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/all_episodes");

        let ep = &state.catalog.list_episodes(None).unwrap()[0];
        assert!(ep.podcast_id.is_none());
        assert_eq!(ep.kind.as_deref(), Some("Convidado"));
    }

    #[tokio::test]
    async fn edit_and_delete_redirect_to_owner() {
        let (app, state) = app();
        for title in ["One", "Two", "Three"] {
            let form = PodcastForm {
                title: title.into(),
                host: "Host".into(),
                description: None,
            };
            state.catalog.create_podcast(&form).unwrap();
        }
        let id = seed_episode(&state, Some(3), "Ep", "2024-01-01");

        let resp = post_form(
            &app,
            &format!("/episode/{id}/edit"),
            "podcast_id=2&title=Ep+edited&scheduled_date=2024-01-02&type=Solo",
        )
        .await;
        assert_eq!(location(&resp), "/podcast/2");
        let edited = state.catalog.get_episode(id).unwrap().unwrap();
        assert_eq!(edited.title, "Ep edited");
        assert_eq!(edited.podcast_id, Some(3));

        let resp = post_form(&app, &format!("/episode/{id}/delete"), "").await;
        assert_eq!(location(&resp), "/podcast/3");

        let loose = seed_episode(&state, None, "Loose", "2024-01-03");
        let resp = post_form(&app, &format!("/episode/{loose}/delete"), "").await;
        assert_eq!(location(&resp), "/podcast/1");
    }

    #[tokio::test]
    async fn deleting_podcast_cascades() {
        let (app, state) = app();
        post_form(&app, "/add", "title=Doomed&host=Ana").await;
        seed_episode(&state, Some(1), "Ep", "2024-01-01");

        let resp = post_form(&app, "/podcast/1/delete", "").await;
        assert_eq!(location(&resp), "/");
        assert_eq!(state.catalog.counts().unwrap(), (0, 0));
    }

    #[tokio::test]
    async fn quick_date_update_always_succeeds() {
        let (app, state) = app();
        let id = seed_episode(&state, None, "Ep", "2024-01-01");

        for body in [
            format!("episode_id={id}&new_date=2024-02-02"),
            "episode_id=abc&new_date=2024-02-03".to_string(),
            "episode_id=999&new_date=2024-02-04".to_string(),
        ] {
            let resp = post_form(&app, "/update_episode_date", &body).await;
            assert_eq!(resp.status(), StatusCode::OK);
            let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
            assert_eq!(&bytes[..], b"success");
        }
        assert_eq!(
            state.catalog.get_episode(id).unwrap().unwrap().scheduled_date,
            "2024-02-02"
        );
    }

    #[tokio::test]
    async fn routes_and_redirects_honour_prefix() {
        let mut config = PodplanConfig::default();
        config.gateway.prefix = "plan".into();
        let (app, _) = app_with(config);

        let (status, _) = get_json(&app, "/plan/health").await;
        assert_eq!(status, StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let resp = post_form(&app, "/plan/add", "title=Show&host=Host").await;
        assert_eq!(location(&resp), "/plan");
        let resp = post_form(&app, "/plan/podcast/1/edit", "title=Renamed&host=Host").await;
        assert_eq!(location(&resp), "/plan/podcast/1");
    }
}

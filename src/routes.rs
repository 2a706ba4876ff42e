//! Router assembly: common routes at the root, entity routes under `/api`.

use axum::routing::get;
use axum::{Json, Router};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

use crate::handlers::{leagues, memberships, players, teams};
use crate::state::AppState;

const MAX_BODY_BYTES: usize = 64 * 1024;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn version() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/leagues", get(leagues::list).post(leagues::create))
        .route(
            "/leagues/:id",
            get(leagues::get).put(leagues::update).delete(leagues::delete),
        )
        .route("/teams", get(teams::list).post(teams::create))
        .route(
            "/teams/:id",
            get(teams::get).put(teams::update).delete(teams::delete),
        )
        .route("/players", get(players::list).post(players::create))
        .route(
            "/players/:id",
            get(players::get).put(players::update).delete(players::delete),
        )
        .route(
            "/memberships",
            get(memberships::list).post(memberships::create),
        )
        .route(
            "/memberships/:player_id/:team_id",
            get(memberships::get)
                .put(memberships::update)
                .delete(memberships::delete),
        )
        .with_state(state);

    Router::new()
        .route("/health", get(health))
        .route("/version", get(version))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
}

use crate::db::PlayersStorage;
use crate::handlers::{self, pages, players};
use crate::middleware;
use crate::templates::TemplateCache;
use axum::Router;
use axum::handler::HandlerWithoutStateExt;
use axum::routing::get;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

/// Every page a route renders; the template cache must provide all of them.
pub const PAGES: [&str; 6] = [
    "home.html",
    "players.html",
    "players-help.html",
    "player.html",
    "create.html",
    "tournaments.html",
];

/// Application context built once at startup and shared by all handlers.
#[derive(Clone)]
pub struct BossState {
    pub players: PlayersStorage,
    pub templates: Arc<TemplateCache>,
}

impl BossState {
    pub fn new(players: PlayersStorage, templates: TemplateCache) -> Self {
        Self {
            players,
            templates: Arc::new(templates),
        }
    }
}

/// Routes and fallbacks, without the middleware chain.
pub fn routes(state: BossState, static_dir: &Path) -> Router {
    Router::new()
        .route("/", get(pages::home))
        .route("/players", get(players::players_view))
        .route("/players/help", get(pages::players_help))
        .route("/player/view/{pid}", get(players::player_view))
        .route(
            "/player/create",
            get(players::player_form).post(players::player_create),
        )
        .route("/tournaments", get(pages::tournaments))
        .nest_service(
            "/static",
            ServeDir::new(static_dir).not_found_service(handlers::not_found.into_service()),
        )
        .fallback(handlers::not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(state)
}

/// The full application: routes wrapped in the middleware chain.
pub fn boss_router(state: BossState, static_dir: &Path) -> Router {
    middleware::apply(routes(state, static_dir))
}

use crate::error::BossError;
use crate::router::BossState;
use crate::templates::TemplateData;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;

/// GET /
pub async fn home(State(state): State<BossState>) -> Result<Response, BossError> {
    state
        .templates
        .render(StatusCode::OK, "home.html", &TemplateData::new())
}

/// GET /players/help
pub async fn players_help(State(state): State<BossState>) -> Result<Response, BossError> {
    state
        .templates
        .render(StatusCode::OK, "players-help.html", &TemplateData::new())
}

/// GET /tournaments
pub async fn tournaments(State(state): State<BossState>) -> Result<Response, BossError> {
    state
        .templates
        .render(StatusCode::OK, "tournaments.html", &TemplateData::new())
}

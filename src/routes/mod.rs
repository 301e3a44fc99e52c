//! Server-rendered pages

pub mod booking;
pub mod rentals;

use axum::{
    extract::State,
    response::Redirect,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::AppState;

/// HTML pages plus the health check
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { Redirect::to("/booking") }))
        .route("/booking", get(booking::new_form))
        .route("/booking/:id", get(booking::show).post(booking::update))
        .route("/booking/:id/submit", post(booking::submit))
        .route("/booking/:id/reset", post(booking::reset))
        .route("/rentals", get(rentals::rentals))
        .route("/health", get(health))
}

async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.sessions.sync().await;
    Json(json!({
        "status": "ok",
        "sessions": state.sessions.stats(),
    }))
}

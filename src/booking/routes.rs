//! Booking session API route handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::AppState;

use super::models::FieldEdit;
use super::session::{BookingSession, SessionView};

/// Booking endpoints, nested under `/api/bookings`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create))
        .route("/:id", get(show).patch(update).delete(close))
        .route("/:id/submit", post(submit))
        .route("/:id/reset", post(reset))
}

async fn find(state: &AppState, id: Uuid) -> ApiResult<Arc<BookingSession>> {
    state.sessions.get(&id).await.ok_or(ApiError::SessionNotFound)
}

/// Open a booking form
async fn create(State(state): State<AppState>) -> (StatusCode, Json<SessionView>) {
    let session = state.sessions.create().await;
    (StatusCode::CREATED, Json(session.view().await))
}

async fn show(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<Json<SessionView>> {
    let session = find(&state, id).await?;
    Ok(Json(session.view().await))
}

/// Apply field edits in order and return the re-quoted form
async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(edits): Json<Vec<FieldEdit>>,
) -> ApiResult<Json<SessionView>> {
    let session = find(&state, id).await?;
    session.apply(edits).await?;
    Ok(Json(session.view().await))
}

/// Start submission; the response shows the form in `submitting`
async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<(StatusCode, Json<SessionView>)> {
    let session = find(&state, id).await?;
    session.submit(Arc::clone(&state.submitter)).await?;
    Ok((StatusCode::ACCEPTED, Json(session.view().await)))
}

async fn reset(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<SessionView>> {
    let session = find(&state, id).await?;
    session.reset().await?;
    Ok(Json(session.view().await))
}

/// Close the form; cancels a pending submission
async fn close(State(state): State<AppState>, Path(id): Path<Uuid>) -> ApiResult<StatusCode> {
    let session = state
        .sessions
        .remove(&id)
        .await
        .ok_or(ApiError::SessionNotFound)?;
    session.cancel().await;
    Ok(StatusCode::NO_CONTENT)
}

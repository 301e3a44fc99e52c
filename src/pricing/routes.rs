//! Pricing API route handlers

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

use crate::AppState;

use super::requests::QuoteRequest;
use super::responses::{PricingErrorResponse, RateCardResponse};
use super::services::{self, PricingError};

/// Pricing endpoints, nested under `/api/pricing`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", post(quote))
        .route("/rates", get(rates))
}

/// Quote a trip without opening a booking session
async fn quote(State(state): State<AppState>, Json(request): Json<QuoteRequest>) -> Response {
    match services::quote(&request, &state.pricing) {
        Ok(response) => Json(response).into_response(),
        Err(e) => pricing_error_response(&e),
    }
}

/// Current rate table
async fn rates(State(state): State<AppState>) -> Json<RateCardResponse> {
    Json(RateCardResponse::from(state.pricing.as_ref()))
}

fn pricing_error_response(error: &PricingError) -> Response {
    let details = match error {
        PricingError::AnimalCount(e) => Some(serde_json::json!({
            "count": e.count,
            "min": e.min,
            "max": e.max,
        })),
        _ => None,
    };
    let body = PricingErrorResponse {
        error_type: error.error_type().to_string(),
        message: error.to_string(),
        details,
    };
    (StatusCode::UNPROCESSABLE_ENTITY, Json(body)).into_response()
}

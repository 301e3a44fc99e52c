//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use crate::booking::FormError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Page not found")]
    NotFound,

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "That booking form has expired or never existed",
            ),
            AppError::Template(e) => {
                tracing::error!("Template error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Template error")
            }
        };

        // Return simple HTML error page
        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head><title>{} - Helena Backcountry Llamas</title></head>
<body style="font-family: sans-serif; text-align: center; padding: 50px;">
    <h1>{}</h1>
    <p>{}</p>
    <a href="/booking">Start a new booking</a>
</body>
</html>"#,
            status.as_u16(),
            status.as_u16(),
            message
        );

        (status, axum::response::Html(html)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

/// JSON API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Booking session not found")]
    SessionNotFound,

    #[error(transparent)]
    Form(#[from] FormError),
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            ApiError::SessionNotFound => "session_not_found",
            ApiError::Form(FormError::NotEditable(_)) => "not_editable",
            ApiError::Form(FormError::NotSubmitting) => "not_submitting",
            ApiError::Form(FormError::InvalidInput(e)) => e.error_type(),
            ApiError::Form(FormError::InvalidDateRange(_)) => "invalid_date_range",
            ApiError::Form(FormError::AnimalCount(_)) => "animal_count_out_of_range",
            ApiError::Form(FormError::QuoteUnavailable) => "quote_unavailable",
            ApiError::Form(FormError::MissingContact(_)) => "missing_contact",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::SessionNotFound => StatusCode::NOT_FOUND,
            ApiError::Form(FormError::NotEditable(_) | FormError::NotSubmitting) => {
                StatusCode::CONFLICT
            }
            ApiError::Form(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let details = match &self {
            ApiError::Form(FormError::MissingContact(fields)) => json!({ "fields": fields }),
            _ => serde_json::Value::Null,
        };
        let body = json!({
            "error_type": self.error_type(),
            "message": self.to_string(),
            "details": details,
        });
        (self.status(), Json(body)).into_response()
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

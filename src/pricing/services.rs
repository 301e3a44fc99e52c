//! Pricing service functions.
//!
//! Glue between raw form/API input and the pure calculators: date parsing,
//! the animal count policy, and response shaping.

use chrono::NaiveDate;

use super::calculators::{compute_quote, ValidationError};
use super::models::{AnimalCountPolicy, BookingParameters, PricingConfig};
use super::requests::QuoteRequest;
use super::responses::QuoteResponse;

/// Animal count outside the configured range under the `Reject` policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Groups must have between {min} and {max} llamas (got {count}).")]
pub struct AnimalCountError {
    pub count: u32,
    pub min: u32,
    pub max: u32,
}

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("Invalid {field}: '{value}' is not a YYYY-MM-DD date")]
    InvalidDate { field: &'static str, value: String },

    #[error(transparent)]
    AnimalCount(#[from] AnimalCountError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl PricingError {
    /// Stable machine-readable tag for API clients
    pub fn error_type(&self) -> &'static str {
        match self {
            PricingError::InvalidDate { .. } => "invalid_date",
            PricingError::AnimalCount(_) => "animal_count_out_of_range",
            PricingError::Validation(ValidationError::InvalidDateRange { .. }) => {
                "invalid_date_range"
            }
        }
    }
}

/// Apply the configured animal count policy.
///
/// `Accept` passes any positive count through untouched, `Clamp` pulls it into
/// range, `Reject` refuses anything outside `[minimum_animals, maximum_animals]`.
/// Zero is never a group, whatever the policy says.
pub fn resolve_animal_count(
    count: u32,
    config: &PricingConfig,
) -> Result<u32, AnimalCountError> {
    let min = config.minimum_animals;
    let max = config.maximum_animals.max(min);
    match config.animal_count_policy {
        AnimalCountPolicy::Accept if count == 0 => Err(AnimalCountError { count, min, max }),
        AnimalCountPolicy::Accept => Ok(count),
        AnimalCountPolicy::Clamp => Ok(count.clamp(min, max)),
        AnimalCountPolicy::Reject if count < min || count > max => {
            Err(AnimalCountError { count, min, max })
        }
        AnimalCountPolicy::Reject => Ok(count),
    }
}

/// Parse a date input value. Blank input is "not chosen yet".
pub fn parse_date_input(
    field: &'static str,
    value: Option<&str>,
) -> Result<Option<NaiveDate>, PricingError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => NaiveDate::parse_from_str(text, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| PricingError::InvalidDate {
                field,
                value: text.to_string(),
            }),
    }
}

/// Turn a quote request into booking parameters, applying the animal policy.
pub fn parameters_from_request(
    request: &QuoteRequest,
    config: &PricingConfig,
) -> Result<BookingParameters, PricingError> {
    Ok(BookingParameters {
        start_date: parse_date_input("start_date", request.start_date.as_deref())?,
        end_date: parse_date_input("end_date", request.end_date.as_deref())?,
        animal_count: resolve_animal_count(request.animal_count, config)?,
        trailer_requested: request.trailer_requested,
        first_time_renter: request.first_time_renter,
    })
}

/// Quote a trip from an API request.
pub fn quote(
    request: &QuoteRequest,
    config: &PricingConfig,
) -> Result<QuoteResponse, PricingError> {
    let params = parameters_from_request(request, config)?;
    let breakdown = compute_quote(&params, config)?;

    tracing::debug!(
        animal_count = params.animal_count,
        trip_days = breakdown.as_ref().map(|b| b.trip_days),
        "Quote computed"
    );

    Ok(QuoteResponse::from_breakdown(breakdown.as_ref(), config))
}

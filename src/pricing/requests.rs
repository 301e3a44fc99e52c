//! Request DTOs for pricing API endpoints.

use serde::Deserialize;

/// Request to quote a trip.
///
/// Dates arrive as `YYYY-MM-DD` text straight from a date input; blank means
/// "not chosen yet".
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default = "default_animal_count")]
    pub animal_count: u32,
    #[serde(default)]
    pub trailer_requested: bool,
    #[serde(default = "default_first_time")]
    pub first_time_renter: bool,
}

fn default_animal_count() -> u32 {
    2
}

fn default_first_time() -> bool {
    true
}

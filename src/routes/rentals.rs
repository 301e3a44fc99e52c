//! Rentals rate card page

use askama::Template;
use axum::{extract::State, response::Html};

use crate::error::Result;
use crate::pricing::responses::RateCardResponse;
use crate::AppState;

/// Rate card template
#[derive(Template)]
#[template(path = "rentals.html")]
struct RentalsTemplate {
    daily_rate: String,
    trailer_daily_rate: String,
    clinic_fee: String,
    security_deposit: String,
    minimum_animals: u32,
    maximum_animals: u32,
    long_trip_threshold_days: i64,
    discount_percent: String,
}

/// Rentals page, rendered from the live rate table
pub async fn rentals(State(state): State<AppState>) -> Result<Html<String>> {
    let card = RateCardResponse::from(state.pricing.as_ref());

    let template = RentalsTemplate {
        daily_rate: card.daily_rate_per_animal.amount,
        trailer_daily_rate: card.trailer_daily_rate.amount,
        clinic_fee: card.clinic_flat_fee.amount,
        security_deposit: card.security_deposit.amount,
        minimum_animals: card.minimum_animals,
        maximum_animals: card.maximum_animals,
        long_trip_threshold_days: card.long_trip_threshold_days,
        discount_percent: card.discount_percent,
    };

    Ok(Html(template.render()?))
}

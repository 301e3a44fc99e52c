//! Core pricing calculation functions.
//!
//! Pure functions for quote math - no I/O, no shared state. Safe to call on every
//! keystroke and from any thread.

use chrono::NaiveDate;
use rust_decimal::prelude::*;
use rust_decimal::Decimal;

use crate::pricing::models::{BookingParameters, PriceBreakdown, PricingConfig};

/// The only way a quote can fail once both dates are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("End date cannot be before start date.")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
}

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use helena_llamas_web::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Inclusive day count between two calendar dates.
///
/// Start and end are both counted, so a same-day trip is one day and a
/// Monday-to-Tuesday trip is two.
pub fn trip_days(start: NaiveDate, end: NaiveDate) -> Result<i64, ValidationError> {
    if end < start {
        return Err(ValidationError::InvalidDateRange { start, end });
    }
    Ok((end - start).num_days() + 1)
}

/// Compute the full price breakdown for a set of booking parameters.
///
/// Returns `Ok(None)` while either date is missing; that is the neutral
/// "no quote yet" state, not an error.
///
/// The animal count is used as given. Minimum/maximum policy is the caller's
/// business (see `services::resolve_animal_count`).
pub fn compute_quote(
    params: &BookingParameters,
    config: &PricingConfig,
) -> Result<Option<PriceBreakdown>, ValidationError> {
    let (start, end) = match (params.start_date, params.end_date) {
        (Some(start), Some(end)) => (start, end),
        _ => return Ok(None),
    };

    let days = trip_days(start, end)?;
    let day_count = Decimal::from(days);

    let base_animal_cost =
        day_count * Decimal::from(params.animal_count) * config.daily_rate_per_animal;

    // Strictly greater-than: a trip of exactly the threshold gets nothing
    let discount_amount = if days > config.long_trip_threshold_days {
        round_money(base_animal_cost * config.discount_rate, 2)
    } else {
        Decimal::ZERO
    };

    let trailer_cost = if params.trailer_requested {
        day_count * config.trailer_daily_rate
    } else {
        Decimal::ZERO
    };

    let one_time_fee_amount = if params.first_time_renter {
        config.clinic_flat_fee
    } else {
        Decimal::ZERO
    };

    let total_due = base_animal_cost - discount_amount + trailer_cost + one_time_fee_amount;

    Ok(Some(PriceBreakdown {
        trip_days: days,
        animal_count: params.animal_count,
        base_animal_cost,
        discount_amount,
        trailer_cost,
        one_time_fee_amount,
        total_due,
    }))
}

/// Format an amount for display with exactly two decimal places.
pub fn format_money(amount: Decimal) -> String {
    let mut rounded = round_money(amount, 2);
    rounded.rescale(2);
    rounded.to_string()
}

//! Pricing inputs, outputs and the rate table.
//!
//! Everything here is plain data. The arithmetic lives in `calculators`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// How out-of-policy animal counts are treated before a quote is computed.
///
/// The engine itself never looks at this; callers apply it through
/// [`crate::pricing::services::resolve_animal_count`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnimalCountPolicy {
    /// Quote whatever count was entered.
    #[default]
    Accept,
    /// Pull the count into `[minimum_animals, maximum_animals]`.
    Clamp,
    /// Refuse counts outside `[minimum_animals, maximum_animals]`.
    Reject,
}

impl std::str::FromStr for AnimalCountPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accept" => Ok(AnimalCountPolicy::Accept),
            "clamp" => Ok(AnimalCountPolicy::Clamp),
            "reject" => Ok(AnimalCountPolicy::Reject),
            other => Err(format!("unknown animal count policy '{}'", other)),
        }
    }
}

/// Rate table for trip quotes.
///
/// An operator retunes pricing here (or through the `PRICING_*` environment
/// overrides in [`crate::config`]) without touching the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Charge per animal per trip day
    pub daily_rate_per_animal: Decimal,
    pub minimum_animals: u32,
    pub maximum_animals: u32,
    /// Trips strictly longer than this many days get the discount
    pub long_trip_threshold_days: i64,
    /// Fraction of the base animal cost taken off long trips (0.10 = 10%)
    pub discount_rate: Decimal,
    /// One-time handling clinic charge for first-time renters
    pub clinic_flat_fee: Decimal,
    pub trailer_daily_rate: Decimal,
    /// Refundable deposit shown next to the estimate; never part of the total
    pub security_deposit: Decimal,
    pub currency: String,
    pub animal_count_policy: AnimalCountPolicy,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            daily_rate_per_animal: dec!(65),
            minimum_animals: 2,
            maximum_animals: 12,
            long_trip_threshold_days: 5,
            discount_rate: dec!(0.10),
            clinic_flat_fee: dec!(75),
            trailer_daily_rate: dec!(25),
            security_deposit: dec!(250),
            currency: "USD".to_string(),
            animal_count_policy: AnimalCountPolicy::Accept,
        }
    }
}

impl PricingConfig {
    /// Discount rate as a whole percentage, for display ("10%").
    pub fn discount_percent(&self) -> Decimal {
        (self.discount_rate * dec!(100)).normalize()
    }
}

/// Booking parameters as currently entered on the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingParameters {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub animal_count: u32,
    pub trailer_requested: bool,
    pub first_time_renter: bool,
}

impl Default for BookingParameters {
    fn default() -> Self {
        Self {
            start_date: None,
            end_date: None,
            animal_count: 2,
            trailer_requested: false,
            first_time_renter: true,
        }
    }
}

/// Itemised quote for one set of booking parameters.
///
/// `base_animal_cost` is the pre-discount figure; the discount is its own line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceBreakdown {
    pub trip_days: i64,
    pub animal_count: u32,
    pub base_animal_cost: Decimal,
    pub discount_amount: Decimal,
    pub trailer_cost: Decimal,
    pub one_time_fee_amount: Decimal,
    pub total_due: Decimal,
}

impl PriceBreakdown {
    pub fn has_discount(&self) -> bool {
        self.discount_amount > Decimal::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rate_table() {
        let config = PricingConfig::default();
        assert_eq!(config.daily_rate_per_animal, dec!(65));
        assert_eq!(config.minimum_animals, 2);
        assert_eq!(config.long_trip_threshold_days, 5);
        assert_eq!(config.discount_rate, dec!(0.10));
        assert_eq!(config.clinic_flat_fee, dec!(75));
        assert_eq!(config.trailer_daily_rate, dec!(25));
        assert_eq!(config.animal_count_policy, AnimalCountPolicy::Accept);
    }

    #[test]
    fn test_discount_percent() {
        assert_eq!(PricingConfig::default().discount_percent().to_string(), "10");
    }

    #[test]
    fn test_policy_from_str() {
        assert_eq!("Clamp".parse::<AnimalCountPolicy>(), Ok(AnimalCountPolicy::Clamp));
        assert_eq!(" reject ".parse::<AnimalCountPolicy>(), Ok(AnimalCountPolicy::Reject));
        assert!("strict".parse::<AnimalCountPolicy>().is_err());
    }

    #[test]
    fn test_form_defaults() {
        let params = BookingParameters::default();
        assert!(params.start_date.is_none());
        assert_eq!(params.animal_count, 2);
        assert!(!params.trailer_requested);
        assert!(params.first_time_renter);
    }
}

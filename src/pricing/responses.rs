//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::calculators::format_money;
use super::models::{AnimalCountPolicy, PriceBreakdown, PricingConfig};

/// Money value for JSON responses, always two decimal places
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoneyResponse {
    pub amount: String,
    pub currency: String,
}

impl MoneyResponse {
    pub fn new(amount: Decimal, currency: &str) -> Self {
        Self {
            amount: format_money(amount),
            currency: currency.to_string(),
        }
    }
}

/// Breakdown figures for a computed quote
#[derive(Debug, Clone, Serialize)]
pub struct BreakdownResponse {
    pub trip_days: i64,
    pub animal_count: u32,
    pub base_animal_cost: MoneyResponse,
    pub discount_amount: MoneyResponse,
    pub trailer_cost: MoneyResponse,
    pub one_time_fee_amount: MoneyResponse,
    pub total_due: MoneyResponse,
}

/// One display row of the estimate panel
#[derive(Debug, Clone, Serialize)]
pub struct LineItem {
    pub label: String,
    pub detail: String,
    pub amount: MoneyResponse,
    /// Discounts are shown as a deduction
    pub is_credit: bool,
}

/// Response for a quote request
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    /// False until both dates are chosen
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<BreakdownResponse>,
    pub line_items: Vec<LineItem>,
    pub security_deposit: MoneyResponse,
}

impl QuoteResponse {
    pub fn from_breakdown(breakdown: Option<&PriceBreakdown>, config: &PricingConfig) -> Self {
        let currency = config.currency.as_str();
        Self {
            available: breakdown.is_some(),
            breakdown: breakdown.map(|b| BreakdownResponse {
                trip_days: b.trip_days,
                animal_count: b.animal_count,
                base_animal_cost: MoneyResponse::new(b.base_animal_cost, currency),
                discount_amount: MoneyResponse::new(b.discount_amount, currency),
                trailer_cost: MoneyResponse::new(b.trailer_cost, currency),
                one_time_fee_amount: MoneyResponse::new(b.one_time_fee_amount, currency),
                total_due: MoneyResponse::new(b.total_due, currency),
            }),
            line_items: breakdown.map(|b| line_items(b, config)).unwrap_or_default(),
            security_deposit: MoneyResponse::new(config.security_deposit, currency),
        }
    }
}

/// "1 day", "3 days"
pub fn count_label(count: i64, singular: &str, plural: &str) -> String {
    if count == 1 {
        format!("{} {}", count, singular)
    } else {
        format!("{} {}", count, plural)
    }
}

/// Build the estimate rows in display order. Zero-valued add-ons are left out.
pub fn line_items(breakdown: &PriceBreakdown, config: &PricingConfig) -> Vec<LineItem> {
    let currency = config.currency.as_str();
    let mut items = vec![LineItem {
        label: "Llama Rental".to_string(),
        detail: format!(
            "{} × {}",
            count_label(breakdown.animal_count.into(), "animal", "animals"),
            count_label(breakdown.trip_days, "day", "days")
        ),
        amount: MoneyResponse::new(breakdown.base_animal_cost, currency),
        is_credit: false,
    }];

    if breakdown.trailer_cost > Decimal::ZERO {
        items.push(LineItem {
            label: "Trailer Rental".to_string(),
            detail: format!(
                "${}/day × {}",
                config.trailer_daily_rate.normalize(),
                count_label(breakdown.trip_days, "day", "days")
            ),
            amount: MoneyResponse::new(breakdown.trailer_cost, currency),
            is_credit: false,
        });
    }

    if breakdown.one_time_fee_amount > Decimal::ZERO {
        items.push(LineItem {
            label: "Llama Handling Clinic".to_string(),
            detail: "Mandatory one-time fee".to_string(),
            amount: MoneyResponse::new(breakdown.one_time_fee_amount, currency),
            is_credit: false,
        });
    }

    if breakdown.has_discount() {
        items.push(LineItem {
            label: "Long-Trip Reward".to_string(),
            detail: format!(
                "{}% discount for a {}-day trek",
                config.discount_percent(),
                breakdown.trip_days
            ),
            amount: MoneyResponse::new(breakdown.discount_amount, currency),
            is_credit: true,
        });
    }

    items
}

/// Rate card for the rentals page and clients that render their own form
#[derive(Debug, Clone, Serialize)]
pub struct RateCardResponse {
    pub daily_rate_per_animal: MoneyResponse,
    pub minimum_animals: u32,
    pub maximum_animals: u32,
    pub long_trip_threshold_days: i64,
    pub discount_percent: String,
    pub clinic_flat_fee: MoneyResponse,
    pub trailer_daily_rate: MoneyResponse,
    pub security_deposit: MoneyResponse,
    pub animal_count_policy: AnimalCountPolicy,
}

impl From<&PricingConfig> for RateCardResponse {
    fn from(config: &PricingConfig) -> Self {
        let currency = config.currency.as_str();
        Self {
            daily_rate_per_animal: MoneyResponse::new(config.daily_rate_per_animal, currency),
            minimum_animals: config.minimum_animals,
            maximum_animals: config.maximum_animals,
            long_trip_threshold_days: config.long_trip_threshold_days,
            discount_percent: config.discount_percent().to_string(),
            clinic_flat_fee: MoneyResponse::new(config.clinic_flat_fee, currency),
            trailer_daily_rate: MoneyResponse::new(config.trailer_daily_rate, currency),
            security_deposit: MoneyResponse::new(config.security_deposit, currency),
            animal_count_policy: config.animal_count_policy,
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

//! Trip pricing engine.
//!
//! Maps booking parameters (dates, animal count, add-ons) to an itemised quote.
//! The calculators are pure; services and routes adapt them to form and API input.

pub mod calculators;
pub mod models;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{compute_quote, round_money, trip_days, ValidationError};
pub use models::{AnimalCountPolicy, BookingParameters, PriceBreakdown, PricingConfig};
pub use routes::router;
pub use services::{AnimalCountError, PricingError};

//! Runtime configuration from the environment
//!
//! `.env` is loaded by `main` through dotenvy before `Settings::from_env` runs.
//! Every variable is optional; unset means the default below.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;

use crate::cache::SessionStoreConfig;
use crate::pricing::{AnimalCountPolicy, PricingConfig};

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}' ({reason})")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// How booking requests leave the building
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitterSettings {
    /// Wait, then confirm. Nothing is sent anywhere.
    Simulated { delay: Duration },
    /// POST to a booking endpoint with retries
    Http {
        url: String,
        timeout: Duration,
        max_attempts: u32,
    },
}

/// Server settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub sessions: SessionStoreConfig,
    pub submitter: SubmitterSettings,
    pub pricing: PricingConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            sessions: SessionStoreConfig::default(),
            submitter: SubmitterSettings::Simulated {
                delay: Duration::from_millis(1500),
            },
            pricing: PricingConfig::default(),
        }
    }
}

impl Settings {
    /// Read settings from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Read settings from an explicit variable map
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let env = Vars(vars);
        let defaults = Settings::default();
        let default_pricing = &defaults.pricing;
        let default_sessions = defaults.sessions;

        let submitter = match env.get("BOOKING_SUBMIT_URL") {
            Some(url) => SubmitterSettings::Http {
                url: url.to_string(),
                timeout: Duration::from_secs(env.parse_or("BOOKING_SUBMIT_TIMEOUT_SECS", 10)?),
                max_attempts: env.parse_or("BOOKING_SUBMIT_MAX_ATTEMPTS", 3)?,
            },
            None => SubmitterSettings::Simulated {
                delay: Duration::from_millis(env.parse_or("BOOKING_SUBMIT_DELAY_MS", 1500)?),
            },
        };

        let pricing = PricingConfig {
            daily_rate_per_animal: env
                .parse_or("PRICING_DAILY_RATE", default_pricing.daily_rate_per_animal)?,
            minimum_animals: env.parse_or("PRICING_MIN_ANIMALS", default_pricing.minimum_animals)?,
            maximum_animals: env.parse_or("PRICING_MAX_ANIMALS", default_pricing.maximum_animals)?,
            long_trip_threshold_days: env.parse_or(
                "PRICING_LONG_TRIP_DAYS",
                default_pricing.long_trip_threshold_days,
            )?,
            discount_rate: env.parse_or("PRICING_DISCOUNT_RATE", default_pricing.discount_rate)?,
            clinic_flat_fee: env.parse_or("PRICING_CLINIC_FEE", default_pricing.clinic_flat_fee)?,
            trailer_daily_rate: env
                .parse_or("PRICING_TRAILER_DAILY_RATE", default_pricing.trailer_daily_rate)?,
            security_deposit: env
                .parse_or("PRICING_SECURITY_DEPOSIT", default_pricing.security_deposit)?,
            currency: env
                .get("PRICING_CURRENCY")
                .map(str::to_string)
                .unwrap_or_else(|| default_pricing.currency.clone()),
            animal_count_policy: env.parse_or::<AnimalCountPolicy>(
                "PRICING_ANIMAL_POLICY",
                default_pricing.animal_count_policy,
            )?,
        };
        validate_pricing(&pricing)?;

        Ok(Self {
            host: env.get("HOST").unwrap_or(defaults.host.as_str()).to_string(),
            port: env.parse_or("PORT", defaults.port)?,
            sessions: SessionStoreConfig {
                max_capacity: env.parse_or("SESSION_CAPACITY", default_sessions.max_capacity)?,
                time_to_live: Duration::from_secs(
                    env.parse_or("SESSION_TTL_SECS", default_sessions.time_to_live.as_secs())?,
                ),
                time_to_idle: Duration::from_secs(
                    env.parse_or("SESSION_IDLE_SECS", default_sessions.time_to_idle.as_secs())?,
                ),
            },
            submitter,
            pricing,
        })
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn validate_pricing(pricing: &PricingConfig) -> Result<(), ConfigError> {
    let invalid = |key: &'static str, value: String, reason: &str| ConfigError::Invalid {
        key,
        value,
        reason: reason.to_string(),
    };

    if pricing.discount_rate < Decimal::ZERO || pricing.discount_rate > Decimal::ONE {
        return Err(invalid(
            "PRICING_DISCOUNT_RATE",
            pricing.discount_rate.to_string(),
            "must be a fraction between 0 and 1",
        ));
    }
    for (key, value) in [
        ("PRICING_DAILY_RATE", pricing.daily_rate_per_animal),
        ("PRICING_CLINIC_FEE", pricing.clinic_flat_fee),
        ("PRICING_TRAILER_DAILY_RATE", pricing.trailer_daily_rate),
        ("PRICING_SECURITY_DEPOSIT", pricing.security_deposit),
    ] {
        if value < Decimal::ZERO {
            return Err(invalid(key, value.to_string(), "must not be negative"));
        }
    }
    if pricing.minimum_animals == 0 {
        return Err(invalid(
            "PRICING_MIN_ANIMALS",
            pricing.minimum_animals.to_string(),
            "must be at least 1",
        ));
    }
    if pricing.maximum_animals < pricing.minimum_animals {
        return Err(invalid(
            "PRICING_MAX_ANIMALS",
            pricing.maximum_animals.to_string(),
            "must be at least PRICING_MIN_ANIMALS",
        ));
    }
    Ok(())
}

struct Vars(HashMap<String, String>);

impl Vars {
    fn get(&self, key: &str) -> Option<&str> {
        self.0
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn parse_or<T>(&self, key: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        match self.get(key) {
            None => Ok(default),
            Some(raw) => raw.parse::<T>().map_err(|e| ConfigError::Invalid {
                key,
                value: raw.to_string(),
                reason: e.to_string(),
            }),
        }
    }
}

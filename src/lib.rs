//! Helena Backcountry Llamas booking site.
//!
//! Server-rendered booking form with a live trip estimate, a JSON API over the
//! same booking sessions, and a stateless quote endpoint.

pub mod booking;
pub mod cache;
pub mod config;
pub mod error;
pub mod pricing;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::trace::TraceLayer;

use crate::booking::{BookingSubmitter, HttpSubmitter, SimulatedSubmitter};
use crate::cache::SessionStore;
use crate::config::{Settings, SubmitterSettings};
use crate::pricing::PricingConfig;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingConfig>,
    pub sessions: SessionStore,
    pub submitter: Arc<dyn BookingSubmitter>,
}

impl AppState {
    pub fn new(settings: &Settings) -> Result<Self, reqwest::Error> {
        let submitter: Arc<dyn BookingSubmitter> = match &settings.submitter {
            SubmitterSettings::Simulated { delay } => Arc::new(SimulatedSubmitter::new(*delay)),
            SubmitterSettings::Http {
                url,
                timeout,
                max_attempts,
            } => Arc::new(HttpSubmitter::new(url.clone(), *timeout, *max_attempts)?),
        };
        Ok(Self::with_submitter(settings, submitter))
    }

    /// State with a caller-supplied submitter
    pub fn with_submitter(settings: &Settings, submitter: Arc<dyn BookingSubmitter>) -> Self {
        let pricing = Arc::new(settings.pricing.clone());
        Self {
            sessions: SessionStore::new(settings.sessions, Arc::clone(&pricing)),
            pricing,
            submitter,
        }
    }
}

/// Build the application router
pub fn app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .nest("/api/pricing", pricing::router())
        .nest("/api/bookings", booking::router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

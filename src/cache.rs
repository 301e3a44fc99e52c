//! In-memory booking session store using moka
//!
//! Booking forms live only in memory. Sessions expire after a fixed lifetime or
//! when left idle; eviction drops the session, which aborts any submission it
//! still had in flight.

use moka::future::Cache;
use moka::notification::RemovalCause;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

use crate::booking::BookingSession;
use crate::pricing::PricingConfig;

/// Session store sizing and expiry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionStoreConfig {
    pub max_capacity: u64,
    pub time_to_live: Duration,
    pub time_to_idle: Duration,
}

impl Default for SessionStoreConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
            time_to_live: Duration::from_secs(60 * 60),
            time_to_idle: Duration::from_secs(30 * 60),
        }
    }
}

/// Booking sessions keyed by session id
#[derive(Clone)]
pub struct SessionStore {
    sessions: Cache<Uuid, Arc<BookingSession>>,
    pricing: Arc<PricingConfig>,
}

impl SessionStore {
    /// Create a new store with the given limits
    pub fn new(config: SessionStoreConfig, pricing: Arc<PricingConfig>) -> Self {
        Self {
            sessions: Cache::builder()
                .max_capacity(config.max_capacity)
                .time_to_live(config.time_to_live)
                .time_to_idle(config.time_to_idle)
                .eviction_listener(|id: Arc<Uuid>, _session, cause| {
                    if cause != RemovalCause::Explicit {
                        debug!("Booking session {} evicted ({:?})", id, cause);
                    }
                })
                .build(),
            pricing,
        }
    }

    /// Open a fresh booking form
    pub async fn create(&self) -> Arc<BookingSession> {
        let id = Uuid::new_v4();
        let session = Arc::new(BookingSession::new(id, Arc::clone(&self.pricing)));
        self.sessions.insert(id, Arc::clone(&session)).await;
        info!("Booking session {} opened", id);
        session
    }

    pub async fn get(&self, id: &Uuid) -> Option<Arc<BookingSession>> {
        self.sessions.get(id).await
    }

    /// Drop a session. Its pending submission, if any, is aborted once the
    /// last handle goes away.
    pub async fn remove(&self, id: &Uuid) -> Option<Arc<BookingSession>> {
        let removed = self.sessions.remove(id).await;
        if removed.is_some() {
            info!("Booking session {} closed", id);
        }
        removed
    }

    /// Get store statistics for monitoring
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            sessions: self.sessions.entry_count(),
        }
    }

    /// Flush pending housekeeping (expiry, counts)
    pub async fn sync(&self) {
        self.sessions.run_pending_tasks().await;
    }
}

/// Session statistics for the health endpoint
#[derive(Debug, Clone, Serialize)]
pub struct SessionStats {
    pub sessions: u64,
}

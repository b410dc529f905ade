//! Wiring of stores, fan-out and services into an `AppState`.

use std::sync::Arc;

use tracing::info;

use crate::domain::{OsShuffler, Shuffler};
use crate::durable::{DurableStore, MemoryDurable, SeaDurable};
use crate::error::AppError;
use crate::services::{Backends, EventSink};
use crate::state::app_state::AppState;
use crate::state::security_config::SecurityConfig;
use crate::store::{LiveStore, MemoryStore, RedisStore};
use crate::ws::{RealtimeBroker, WsRegistry};

/// Builder for `AppState`, shared by `main` and tests.
pub struct StateBuilder {
    security: SecurityConfig,
    redis_url: Option<String>,
    database_url: Option<String>,
    shuffler: Arc<dyn Shuffler>,
    events: Option<Arc<dyn EventSink>>,
    live: Option<Arc<dyn LiveStore>>,
}

impl StateBuilder {
    pub fn new(security: SecurityConfig) -> Self {
        Self {
            security,
            redis_url: None,
            database_url: None,
            shuffler: Arc::new(OsShuffler),
            events: None,
            live: None,
        }
    }

    pub fn with_redis(mut self, url: Option<String>) -> Self {
        self.redis_url = url;
        self
    }

    pub fn with_database(mut self, url: Option<String>) -> Self {
        self.database_url = url;
        self
    }

    pub fn with_shuffler(mut self, shuffler: Arc<dyn Shuffler>) -> Self {
        self.shuffler = shuffler;
        self
    }

    /// Replace the realtime fan-out, e.g. with a recording sink in tests.
    pub fn with_events(mut self, events: Arc<dyn EventSink>) -> Self {
        self.events = Some(events);
        self
    }

    /// Use `live` instead of Redis or the in-memory store.
    pub fn with_live_store(mut self, live: Arc<dyn LiveStore>) -> Self {
        self.live = Some(live);
        self
    }

    pub async fn build(self) -> Result<AppState, AppError> {
        let registry = Arc::new(WsRegistry::new());

        let mut broker = None;
        let (live, live_label): (Arc<dyn LiveStore>, &'static str) = match (self.live, &self.redis_url) {
            (Some(live), _) => (live, "custom"),
            (None, Some(url)) => {
                let store = RedisStore::connect(url).await?;
                broker = Some(RealtimeBroker::connect(url, registry.clone()).await?);
                info!("Live store: redis");
                (Arc::new(store), "redis")
            }
            (None, None) => (Arc::new(MemoryStore::new()), "memory"),
        };

        let (durable, durable_label): (Arc<dyn DurableStore>, &'static str) =
            match &self.database_url {
                Some(url) => {
                    let store = SeaDurable::connect(url)
                        .await
                        .map_err(|e| AppError::store_unavailable("Unable to open database", e))?;
                    info!("Durable store: database");
                    (Arc::new(store), "database")
                }
                None => (Arc::new(MemoryDurable::new()), "memory"),
            };

        let events: Arc<dyn EventSink> = match (self.events, broker) {
            (Some(events), _) => events,
            (None, Some(broker)) => broker as Arc<dyn EventSink>,
            (None, None) => registry.clone(),
        };

        let backends = Backends::new(live, durable, events);
        Ok(
            AppState::new(self.security, backends, self.shuffler, registry)
                .with_store_labels(live_label, durable_label),
        )
    }
}

pub fn build_state(security: SecurityConfig) -> StateBuilder {
    StateBuilder::new(security)
}

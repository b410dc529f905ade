use std::sync::Arc;

use super::security_config::SecurityConfig;
use crate::domain::Shuffler;
use crate::services::{Backends, HandFlowService, HouseService};
use crate::store::KeyedLocks;
use crate::ws::WsRegistry;

/// Shared state handed to every route and websocket session.
#[derive(Clone)]
pub struct AppState {
    pub security: SecurityConfig,
    pub houses: Arc<HouseService>,
    pub hands: Arc<HandFlowService>,
    /// Per-house and per-hand locks shared by both services.
    pub locks: Arc<KeyedLocks>,
    /// Local websocket sessions by user.
    pub registry: Arc<WsRegistry>,
    /// Which backends are wired in, for `/health`.
    pub live_store: &'static str,
    pub durable_store: &'static str,
}

impl AppState {
    pub fn new(
        security: SecurityConfig,
        backends: Backends,
        shuffler: Arc<dyn Shuffler>,
        registry: Arc<WsRegistry>,
    ) -> Self {
        Self {
            security,
            locks: backends.locks.clone(),
            houses: Arc::new(HouseService::new(backends.clone())),
            hands: Arc::new(HandFlowService::new(backends, shuffler)),
            registry,
            live_store: "memory",
            durable_store: "memory",
        }
    }

    pub fn with_store_labels(mut self, live: &'static str, durable: &'static str) -> Self {
        self.live_store = live;
        self.durable_store = durable;
        self
    }
}

//! Services bridge the pure rules engine with the live store, the durable
//! store and the realtime fan-out.
//!
//! Every mutation runs as load, apply, compare-and-set write under the keyed
//! lock for that one document. Events go out after the write succeeds.

pub mod events;
pub mod hand_flow;
pub mod houses;

use std::sync::Arc;

use crate::durable::DurableStore;
use crate::store::{KeyedLocks, LiveStore};

pub use events::{EventSink, NullSink, OutboundEvent, RecordingSink};
pub use hand_flow::HandFlowService;
pub use houses::HouseService;

/// Collaborators shared by the services.
#[derive(Clone)]
pub struct Backends {
    pub live: Arc<dyn LiveStore>,
    pub durable: Arc<dyn DurableStore>,
    pub locks: Arc<KeyedLocks>,
    pub events: Arc<dyn EventSink>,
}

impl Backends {
    pub fn new(
        live: Arc<dyn LiveStore>,
        durable: Arc<dyn DurableStore>,
        events: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            live,
            durable,
            locks: Arc::new(KeyedLocks::new()),
            events,
        }
    }
}

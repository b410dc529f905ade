//! Realtime session gateway.

pub mod broker;
pub mod hub;
pub mod protocol;
pub mod session;

pub use broker::RealtimeBroker;
pub use hub::WsRegistry;

//! Process-local registry of websocket connections, keyed by user.

use std::sync::Arc;

use actix::prelude::*;
use async_trait::async_trait;
use dashmap::DashMap;
use tracing::debug;
use uuid::Uuid;

use crate::domain::UserId;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::services::events::{EventSink, OutboundEvent};

/// A serialized outbound frame for one session.
#[derive(Message, Clone)]
#[rtype(result = "()")]
pub struct Deliver(pub Arc<str>);

#[derive(Default)]
pub struct WsRegistry {
    connections: DashMap<UserId, DashMap<Uuid, Recipient<Deliver>>>,
}

impl WsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_connection(&self, user_id: UserId, conn_id: Uuid, recipient: Recipient<Deliver>) {
        self.connections
            .entry(user_id)
            .or_default()
            .insert(conn_id, recipient);
    }

    pub fn unregister_connection(&self, user_id: UserId, conn_id: Uuid) {
        if let Some(conns) = self.connections.get(&user_id) {
            conns.remove(&conn_id);
        }
        self.connections.remove_if(&user_id, |_, conns| conns.is_empty());
    }

    pub fn connection_count(&self, user_id: UserId) -> usize {
        self.connections.get(&user_id).map_or(0, |c| c.len())
    }

    /// Hand `event` to every session of `user_id` in this process. Returns
    /// how many sessions it went to.
    pub fn deliver_local(&self, user_id: UserId, event: &OutboundEvent) -> Result<usize, DomainError> {
        let Some(conns) = self.connections.get(&user_id) else {
            return Ok(0);
        };
        let payload: Arc<str> = serde_json::to_string(event)
            .map_err(|e| {
                DomainError::infra(InfraErrorKind::Transport, format!("encode event: {e}"))
            })?
            .into();
        for conn in conns.iter() {
            conn.value().do_send(Deliver(payload.clone()));
        }
        debug!(user_id, sessions = conns.len(), "Delivered event locally");
        Ok(conns.len())
    }
}

#[async_trait]
impl EventSink for WsRegistry {
    async fn send(&self, user_id: UserId, event: OutboundEvent) -> Result<(), DomainError> {
        self.deliver_local(user_id, &event).map(|_| ())
    }
}

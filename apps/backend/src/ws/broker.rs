//! Redis pub/sub fan-out so several server instances share one event stream.
//!
//! Events are published on `user:{id}`. Every instance runs a subscriber on
//! `user:*` and hands what it receives to its local `WsRegistry`.

use std::error::Error as StdError;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use rand::random;
use redis::aio::{ConnectionManager, PubSub};
use redis::{AsyncCommands, Client};
use tokio::time::sleep;
use tokio_stream::StreamExt;
use tracing::{error, info, warn};

use crate::domain::UserId;
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};
use crate::services::events::{EventSink, OutboundEvent};
use crate::ws::hub::WsRegistry;

// Subscriber reconnect backoff
const INITIAL_RETRY_DELAY_SECS: f64 = 1.0;
const MAX_RETRY_DELAY_SECS: f64 = 60.0;
const JITTER_PERCENT: f64 = 0.2;

// Publisher retry, on the request path
const PUBLISHER_MAX_ATTEMPTS: u32 = 3;
const PUBLISHER_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PUBLISHER_MAX_RETRY_DELAY_MS: u64 = 200;

pub struct RealtimeBroker {
    registry: Arc<WsRegistry>,
    publisher: ConnectionManager,
}

pub fn user_channel(user_id: UserId) -> String {
    format!("user:{user_id}")
}

fn parse_user_channel(channel: &str) -> Option<UserId> {
    channel.strip_prefix("user:")?.parse().ok()
}

impl RealtimeBroker {
    /// Connect the publisher and start the background subscriber.
    pub async fn connect(redis_url: &str, registry: Arc<WsRegistry>) -> Result<Arc<Self>, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;
        let publisher = ConnectionManager::new(client)
            .await
            .map_err(|err| AppError::transport("Unable to connect realtime publisher", err))?;

        let broker = Arc::new(Self {
            registry: registry.clone(),
            publisher,
        });

        let redis_url = redis_url.to_string();
        tokio::spawn(async move {
            run_subscription_loop_with_retry(&redis_url, registry).await;
        });
        Ok(broker)
    }

    pub fn registry(&self) -> Arc<WsRegistry> {
        self.registry.clone()
    }

    async fn publish(&self, user_id: UserId, event: &OutboundEvent) -> Result<(), AppError> {
        let channel = user_channel(user_id);
        let encoded = serde_json::to_string(event).map_err(|err| {
            AppError::internal(
                crate::errors::ErrorCode::Internal,
                format!("Failed to serialize realtime event: {err}"),
            )
        })?;

        let mut attempt = 0u32;
        loop {
            attempt += 1;
            let mut conn = self.publisher.clone();
            let res = conn
                .publish::<_, _, ()>(channel.as_str(), encoded.as_str())
                .await;
            let err = match res {
                Ok(()) => return Ok(()),
                Err(err) => AppError::transport("Failed to publish realtime event", err),
            };
            if attempt >= PUBLISHER_MAX_ATTEMPTS || !is_transient_error(&err) {
                return Err(err);
            }
            let delay_ms = PUBLISHER_INITIAL_RETRY_DELAY_MS
                .saturating_mul(2_u64.pow(attempt - 1))
                .min(PUBLISHER_MAX_RETRY_DELAY_MS);
            warn!(error = %err, attempt, retry_delay_ms = delay_ms, "Redis publish failed, retrying");
            sleep(Duration::from_millis(delay_ms)).await;
        }
    }
}

#[async_trait]
impl EventSink for RealtimeBroker {
    async fn send(&self, user_id: UserId, event: OutboundEvent) -> Result<(), DomainError> {
        self.publish(user_id, &event).await.map_err(|err| {
            DomainError::infra(InfraErrorKind::Transport, err.to_string())
        })
    }
}

fn is_transient_error(err: &AppError) -> bool {
    if let AppError::Config { .. } = err {
        return false;
    }

    if let Some(io_err) = StdError::source(err).and_then(|s| s.downcast_ref::<std::io::Error>()) {
        use std::io::ErrorKind;
        match io_err.kind() {
            ErrorKind::PermissionDenied | ErrorKind::Unsupported => return false,
            ErrorKind::ConnectionRefused
            | ErrorKind::ConnectionAborted
            | ErrorKind::ConnectionReset
            | ErrorKind::TimedOut
            | ErrorKind::Interrupted => return true,
            _ => {}
        }
    }

    let msg = format!("{err} {}", StdError::source(err).map(|s| s.to_string()).unwrap_or_default())
        .to_lowercase();
    let permanent = ["authentication failed", "invalid redis_url", "unsupported", "non-tcp"];
    !permanent.iter().any(|p| msg.contains(p))
}

fn retry_delay(attempt: u32) -> Duration {
    let base = INITIAL_RETRY_DELAY_SECS * 2f64.powi(attempt.saturating_sub(1) as i32);
    let capped = base.min(MAX_RETRY_DELAY_SECS);
    let jitter = (random::<f64>() * 2.0 - 1.0) * capped * JITTER_PERCENT;
    Duration::from_secs_f64((capped + jitter).max(0.1))
}

async fn run_subscription_loop_with_retry(redis_url: &str, registry: Arc<WsRegistry>) {
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match run_subscription_loop(redis_url, registry.clone()).await {
            Ok(()) => {
                info!("Redis subscription loop completed");
                break;
            }
            Err(err) if !is_transient_error(&err) => {
                error!(error = %err, attempt, "Redis subscription failed permanently");
                break;
            }
            Err(err) => {
                let delay = retry_delay(attempt);
                warn!(
                    error = %err,
                    attempt,
                    retry_delay_secs = delay.as_secs_f64(),
                    "Redis subscription failed, retrying"
                );
                sleep(delay).await;
                // keep the backoff near its cap instead of overflowing
                attempt = attempt.min(10);
            }
        }
    }
}

async fn run_subscription_loop(redis_url: &str, registry: Arc<WsRegistry>) -> Result<(), AppError> {
    let client = Client::open(redis_url)
        .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;
    let conn_info = client.get_connection_info();

    let redis::ConnectionAddr::Tcp(host, port) = conn_info.addr().clone() else {
        return Err(AppError::transport(
            "Only TCP Redis is supported for pubsub",
            std::io::Error::new(std::io::ErrorKind::Unsupported, "non-tcp protocol"),
        ));
    };

    let stream = tokio::net::TcpStream::connect((host.as_str(), port))
        .await
        .map_err(|err| AppError::transport("Failed to connect Redis subscriber", err))?;
    let mut pubsub = PubSub::new(conn_info.redis_settings(), stream)
        .await
        .map_err(|err| AppError::transport("Failed to open Redis pubsub", err))?;
    pubsub
        .psubscribe("user:*")
        .await
        .map_err(|err| AppError::transport("Failed to subscribe to user:*", err))?;
    info!(host = %host, port, "Redis subscription established");

    let mut messages = pubsub.into_on_message();
    while let Some(msg) = messages.next().await {
        let Ok(channel) = msg.get_channel::<String>() else {
            continue;
        };
        let Some(user_id) = parse_user_channel(&channel) else {
            warn!(channel = %channel, "Realtime message on unexpected channel");
            continue;
        };
        let Ok(payload) = msg.get_payload::<String>() else {
            continue;
        };
        match serde_json::from_str::<OutboundEvent>(&payload) {
            Ok(event) => {
                if let Err(err) = registry.deliver_local(user_id, &event) {
                    warn!(user_id, error = %err, "Local delivery failed");
                }
            }
            Err(err) => {
                error!(error = %err, channel = %channel, "Failed to decode realtime payload");
            }
        }
    }

    warn!("Redis subscription stream ended");
    Err(AppError::transport(
        "Redis subscription stream ended unexpectedly",
        std::io::Error::new(std::io::ErrorKind::ConnectionAborted, "stream ended"),
    ))
}

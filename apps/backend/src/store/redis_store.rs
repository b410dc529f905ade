//! Redis-backed live store.
//!
//! Documents are JSON under `house:{id}` / `hand:{id}`; versions live beside
//! them under `…:version`. Writes go through a Lua script so the version check
//! and both SETs happen atomically on the server.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::error;

use super::{hand_key, house_key, version_conflict, LiveStore};
use crate::domain::{HandId, HandState, HouseId, HouseState};
use crate::error::AppError;
use crate::errors::domain::{DomainError, InfraErrorKind};

const CAS_SCRIPT: &str = r#"
local current = redis.call('GET', KEYS[2])
if not current then current = '0' end
if tonumber(current) ~= tonumber(ARGV[1]) then
  return -1 - tonumber(current)
end
redis.call('SET', KEYS[1], ARGV[2])
redis.call('SET', KEYS[2], ARGV[3])
return tonumber(ARGV[3])
"#;

#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    cas: Script,
}

fn store_error(op: &str, err: impl std::fmt::Display) -> DomainError {
    error!(op, error = %err, "live store operation failed");
    DomainError::infra(InfraErrorKind::Store, format!("live store {op} failed"))
}

impl RedisStore {
    pub async fn connect(redis_url: &str) -> Result<Self, AppError> {
        let client = Client::open(redis_url)
            .map_err(|err| AppError::config(format!("Invalid REDIS_URL: {err}")))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|err| AppError::store_unavailable("Unable to connect to Redis", err))?;
        Ok(Self {
            conn,
            cas: Script::new(CAS_SCRIPT),
        })
    }

    async fn get_doc<T: DeserializeOwned>(&self, key: String) -> Result<Option<T>, DomainError> {
        let mut conn = self.conn.clone();
        let raw: Option<String> = conn.get(&key).await.map_err(|e| store_error("get", e))?;
        raw.map(|json| serde_json::from_str(&json).map_err(|e| store_error("decode", e)))
            .transpose()
    }

    async fn put_doc<T: Serialize>(
        &self,
        what: &str,
        id: i64,
        key: String,
        doc: &T,
        expected: u64,
    ) -> Result<u64, DomainError> {
        let next = expected + 1;
        let json = serde_json::to_string(doc).map_err(|e| store_error("encode", e))?;
        let mut conn = self.conn.clone();
        let result: i64 = self
            .cas
            .key(&key)
            .key(format!("{key}:version"))
            .arg(expected)
            .arg(json)
            .arg(next)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| store_error("put", e))?;
        if result < 0 {
            let found = (-1 - result) as u64;
            return Err(version_conflict(what, id, expected, found));
        }
        Ok(next)
    }
}

// The JSON body carries its own version field; rewrite it to the version
// being stored so readers see one consistent number.
fn with_version<T: Clone>(doc: &T, set: impl FnOnce(&mut T)) -> T {
    let mut copy = doc.clone();
    set(&mut copy);
    copy
}

#[async_trait]
impl LiveStore for RedisStore {
    async fn get_house(&self, id: HouseId) -> Result<Option<HouseState>, DomainError> {
        self.get_doc(house_key(id)).await
    }

    async fn put_house(
        &self,
        house: &HouseState,
        expected_version: u64,
    ) -> Result<u64, DomainError> {
        let doc = with_version(house, |h| h.version = expected_version + 1);
        self.put_doc("house", house.id, house_key(house.id), &doc, expected_version)
            .await
    }

    async fn get_hand(&self, id: HandId) -> Result<Option<HandState>, DomainError> {
        self.get_doc(hand_key(id)).await
    }

    async fn put_hand(&self, hand: &HandState, expected_version: u64) -> Result<u64, DomainError> {
        let doc = with_version(hand, |h| h.version = expected_version + 1);
        self.put_doc("hand", hand.id, hand_key(hand.id), &doc, expected_version)
            .await
    }

    async fn delete_hand(&self, id: HandId) -> Result<(), DomainError> {
        let key = hand_key(id);
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(vec![key.clone(), format!("{key}:version")])
            .await
            .map_err(|e| store_error("delete", e))
    }

    async fn next_id(&self, counter: &str) -> Result<i64, DomainError> {
        let mut conn = self.conn.clone();
        conn.incr(counter, 1)
            .await
            .map_err(|e| store_error("incr", e))
    }
}

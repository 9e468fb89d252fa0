//! Session store access for the token gate.
//!
//! Sessions are issued and expired by an external component; this service
//! only reads them. A session lives at key `user:<token>` as a hash with
//! `name` and `group` fields. The key format is fixed for compatibility with
//! the session issuer.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

/// Session record fields read by the token gate.
pub const FIELD_NAME: &str = "name";
pub const FIELD_GROUP: &str = "group";

/// Key under which the issuer stores the session for `token`.
pub fn session_key(token: &str) -> String {
    format!("user:{}", token)
}

/// Read-only view of the shared session store.
///
/// Injected at service construction so tests can substitute an in-memory
/// fake. Absence of a key or field means "no such session".
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn field(&self, key: &str, field: &str) -> anyhow::Result<Option<String>>;
}

/// Redis-backed session store.
pub struct RedisSessionStore {
    conn: ConnectionManager,
}

impl RedisSessionStore {
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let client = redis::Client::open(url)?;
        let conn = ConnectionManager::new(client).await?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl SessionStore for RedisSessionStore {
    async fn field(&self, key: &str, field: &str) -> anyhow::Result<Option<String>> {
        // ConnectionManager is a cheap clone over a shared multiplexed connection
        let mut conn = self.conn.clone();
        let value: Option<String> = conn.hget(key, field).await?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_matches_issuer_format() {
        assert_eq!(session_key("qwerty-1234"), "user:qwerty-1234");
        assert_eq!(session_key(""), "user:");
    }
}

//! Redis-backed key-value store.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use redis::{AsyncCommands, Client, RedisError, Script, aio::ConnectionManager};
use tracing::{debug, info, warn};

use crate::domain::repositories::{KeyValueStore, StoreError, StoreResult};

/// Sets `KEYS[1]` to `ARGV[2]` only if it currently holds `ARGV[1]`.
const COMPARE_AND_SWAP_LUA: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    redis.call('SET', KEYS[1], ARGV[2])
    return 1
end
return 0
"#;

/// Redis implementation of [`KeyValueStore`].
///
/// Uses `ConnectionManager` for automatic reconnection and cheap clones.
/// Every command runs under `op_timeout`; a command that misses its deadline
/// is reported as [`StoreError::Timeout`] and is not retried. Unlike a cache,
/// errors are never swallowed: Redis is the only copy of the data.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    op_timeout: Duration,
    compare_and_swap: Script,
}

impl RedisStore {
    /// Connects to Redis and validates the connection with a PING.
    ///
    /// # Arguments
    ///
    /// - `redis_url` - Redis connection string (e.g., `"redis://localhost:6379/0"`)
    /// - `op_timeout` - deadline applied to the PING and to every later command
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Connection`] if the URL is invalid or the server
    /// cannot be reached, and [`StoreError::Timeout`] if the PING misses
    /// `op_timeout`.
    pub async fn connect(redis_url: &str, op_timeout: Duration) -> StoreResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = Client::open(redis_url).map_err(|e| {
            StoreError::Connection(format!("Failed to create Redis client: {}", e))
        })?;

        let manager = tokio::time::timeout(op_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| StoreError::Timeout(op_timeout))?
            .map_err(|e| StoreError::Connection(format!("Failed to connect to Redis: {}", e)))?;

        let store = Self {
            conn: manager,
            op_timeout,
            compare_and_swap: Script::new(COMPARE_AND_SWAP_LUA),
        };

        let mut conn = store.conn.clone();
        store
            .run("PING", async move { conn.ping::<()>().await })
            .await?;

        info!("✓ Connected to Redis");

        Ok(store)
    }

    async fn run<T, F>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = Result<T, RedisError>>,
    {
        match tokio::time::timeout(self.op_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!("Redis {} error: {}", op, e);
                Err(map_redis_error(e))
            }
            Err(_) => {
                warn!("Redis {} timed out after {:?}", op, self.op_timeout);
                Err(StoreError::Timeout(self.op_timeout))
            }
        }
    }
}

fn map_redis_error(e: RedisError) -> StoreError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
        StoreError::Connection(e.to_string())
    } else if e.is_timeout() {
        StoreError::Connection(format!("timeout: {}", e))
    } else {
        StoreError::Operation(e.to_string())
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn incr(&self, key: &str) -> StoreResult<i64> {
        let mut conn = self.conn.clone();
        let value = self
            .run("INCR", async move { conn.incr::<_, _, i64>(key, 1).await })
            .await?;
        debug!("INCR {} -> {}", key, value);
        Ok(value)
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut conn = self.conn.clone();
        self.run("GET", async move { conn.get::<_, Option<String>>(key).await })
            .await
    }

    async fn set(&self, key: &str, value: &str, ttl: Option<Duration>) -> StoreResult<()> {
        let mut conn = self.conn.clone();
        match ttl.filter(|ttl| !ttl.is_zero()) {
            Some(ttl) => {
                let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
                self.run("PSETEX", async move {
                    conn.pset_ex::<_, _, ()>(key, value, millis).await
                })
                .await
            }
            None => {
                self.run("SET", async move { conn.set::<_, _, ()>(key, value).await })
                    .await
            }
        }
    }

    async fn set_if_absent(&self, key: &str, value: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        self.run("SETNX", async move { conn.set_nx::<_, _, bool>(key, value).await })
            .await
    }

    async fn compare_and_swap(&self, key: &str, expected: &str, new: &str) -> StoreResult<bool> {
        let mut conn = self.conn.clone();
        let mut invocation = self.compare_and_swap.key(key);
        invocation.arg(expected).arg(new);

        let swapped: i64 = self
            .run("EVALSHA", async move { invocation.invoke_async(&mut conn).await })
            .await?;

        Ok(swapped == 1)
    }

    async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        self.run("PING", async move { conn.ping::<()>().await })
            .await
            .is_ok()
    }
}

use crate::{
    now_millis, timestamp_from_millis, CreateOutcome, LinkAdmin, LinkRecord, LinkStore, Result,
    StorageError,
};
use async_trait::async_trait;
use jiff::Timestamp;
use pinlink_core::Slug;
use redis::{AsyncCommands, Script};
use std::collections::HashMap;
use tracing::{debug, trace, warn};

const KEY_PREFIX: &str = "link:";
const PINNED_SET_KEY: &str = "links:pinned";

// Scripts run atomically on the server, so the existence check and the
// write cannot interleave with another client.
const CREATE_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 1 then
  return 0
end
redis.call('HSET', KEYS[1], 'url', ARGV[1], 'visits', 0, 'pinned', 0, 'created', ARGV[2])
return 1
";

const INCREMENT_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
redis.call('HINCRBY', KEYS[1], 'visits', 1)
return 1
";

const SET_PINNED_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
redis.call('HSET', KEYS[1], 'pinned', ARGV[2])
if ARGV[2] == '1' then
  redis.call('SADD', KEYS[2], ARGV[1])
else
  redis.call('SREM', KEYS[2], ARGV[1])
end
return 1
";

const SET_EXPIRATION_SCRIPT: &str = r"
if redis.call('EXISTS', KEYS[1]) == 0 then
  return 0
end
if ARGV[1] == '' then
  redis.call('HDEL', KEYS[1], 'expires')
else
  redis.call('HSET', KEYS[1], 'expires', ARGV[1])
end
return 1
";

/// Key-value implementation of [`LinkStore`] backed by Redis.
///
/// Each slug is one hash at `link:<slug>` with the fields `url`, `visits`,
/// `pinned`, `created` and an optional `expires` (epoch milliseconds).
/// Pinned slugs are additionally indexed in the set `links:pinned`.
///
/// Creation is a server-side script, which is atomic on a single Redis
/// node. Deployments that proxy to a key-value service without scripting
/// support lose that guarantee.
#[derive(Clone)]
pub struct RedisLinkStore {
    conn: redis::aio::MultiplexedConnection,
    create: Script,
    increment: Script,
    set_pinned: Script,
    set_expiration: Script,
}

impl std::fmt::Debug for RedisLinkStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisLinkStore").finish_non_exhaustive()
    }
}

impl RedisLinkStore {
    /// Creates a store from an existing multiplexed connection.
    pub fn new(conn: redis::aio::MultiplexedConnection) -> Self {
        Self {
            conn,
            create: Script::new(CREATE_SCRIPT),
            increment: Script::new(INCREMENT_SCRIPT),
            set_pinned: Script::new(SET_PINNED_SCRIPT),
            set_expiration: Script::new(SET_EXPIRATION_SCRIPT),
        }
    }

    /// Opens a multiplexed connection to `redis_url`.
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| map_redis_error("failed to parse Redis address", e))?;
        let conn = client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| map_redis_error("failed to connect to Redis", e))?;
        Ok(Self::new(conn))
    }
}

fn record_key(slug: &str) -> String {
    format!("{KEY_PREFIX}{slug}")
}

fn map_redis_error(operation: &str, err: redis::RedisError) -> StorageError {
    let message = format!("{operation}: {err}");
    if message.to_ascii_lowercase().contains("timed out") {
        StorageError::Timeout(message)
    } else if err.is_io_error() {
        StorageError::Unavailable(message)
    } else {
        StorageError::Query(message)
    }
}

/// Rebuilds a record from the hash fields stored under its key.
///
/// Returns `Ok(None)` for an empty hash, which is how Redis reports a
/// missing key.
fn decode_record(slug: Slug, mut fields: HashMap<String, String>) -> Result<Option<LinkRecord>> {
    if fields.is_empty() {
        return Ok(None);
    }

    let invalid = |field: &str, value: &str| {
        StorageError::InvalidData(format!(
            "invalid '{field}' for slug '{slug}': '{value}'"
        ))
    };

    let target_url = fields
        .remove("url")
        .ok_or_else(|| StorageError::InvalidData(format!("missing 'url' for slug '{slug}'")))?;
    let visit_count = match fields.get("visits") {
        Some(raw) => raw.parse::<u64>().map_err(|_| invalid("visits", raw))?,
        None => 0,
    };
    let pinned = matches!(fields.get("pinned").map(String::as_str), Some("1"));
    let created_at = match fields.get("created") {
        Some(raw) => timestamp_from_millis(raw.parse().map_err(|_| invalid("created", raw))?)?,
        None => return Err(StorageError::InvalidData(format!("missing 'created' for slug '{slug}'"))),
    };
    let expires_at = match fields.get("expires").map(String::as_str) {
        None | Some("") => None,
        Some(raw) => Some(parse_expiry(&slug, raw)),
    };

    Ok(Some(LinkRecord {
        slug,
        target_url,
        created_at,
        expires_at,
        visit_count,
        pinned,
    }))
}

/// Reads an `expires` field. An unreadable value fails closed: the link is
/// treated as having expired at [`Timestamp::MIN`].
fn parse_expiry(slug: &Slug, raw: &str) -> Timestamp {
    match raw
        .parse::<i64>()
        .ok()
        .and_then(|millis| Timestamp::from_millisecond(millis).ok())
    {
        Some(expires_at) => expires_at,
        None => {
            warn!(slug = %slug, expires = raw, "unreadable expiry, treating link as expired");
            Timestamp::MIN
        }
    }
}

#[async_trait]
impl LinkStore for RedisLinkStore {
    async fn try_create(&self, slug: &Slug, target_url: &str) -> Result<CreateOutcome> {
        let created_at = now_millis();
        let mut conn = self.conn.clone();

        let inserted: i64 = self
            .create
            .key(record_key(slug.as_str()))
            .arg(target_url)
            .arg(created_at.as_millisecond())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to create link in Redis", e))?;

        if inserted == 1 {
            debug!(slug = %slug, "created link in Redis");
            Ok(CreateOutcome::Created(LinkRecord::new(
                slug.clone(),
                target_url,
                created_at,
            )))
        } else {
            trace!(slug = %slug, "slug already taken in Redis");
            Ok(CreateOutcome::AlreadyExists)
        }
    }

    async fn fetch(&self, slug: &Slug) -> Result<Option<LinkRecord>> {
        trace!(slug = %slug, "fetching link from Redis");
        let mut conn = self.conn.clone();
        let fields: HashMap<String, String> = conn
            .hgetall(record_key(slug.as_str()))
            .await
            .map_err(|e| map_redis_error("failed to fetch link from Redis", e))?;
        decode_record(slug.clone(), fields)
    }

    async fn increment_visits(&self, slug: &Slug) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: i64 = self
            .increment
            .key(record_key(slug.as_str()))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to increment visits in Redis", e))?;
        Ok(())
    }

    async fn list_pinned_active(&self) -> Result<Vec<LinkRecord>> {
        let mut conn = self.conn.clone();
        let mut slugs: Vec<String> = conn
            .smembers(PINNED_SET_KEY)
            .await
            .map_err(|e| map_redis_error("failed to read pinned index from Redis", e))?;
        if slugs.is_empty() {
            return Ok(Vec::new());
        }
        slugs.sort();

        let mut pipe = redis::pipe();
        for slug in &slugs {
            pipe.hgetall(record_key(slug));
        }
        let rows: Vec<HashMap<String, String>> = pipe
            .query_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to fetch pinned links from Redis", e))?;

        let now = Timestamp::now();
        let mut records = Vec::with_capacity(rows.len());
        for (slug, fields) in slugs.into_iter().zip(rows) {
            // one corrupt hash must not abort the whole listing
            match decode_record(Slug::new_unchecked(slug.as_str()), fields) {
                Ok(Some(record)) if record.pinned && !record.is_expired_at(now) => {
                    records.push(record)
                }
                Ok(Some(_)) => {}
                Ok(None) => warn!(slug = %slug, "pinned index references a missing link"),
                Err(e) => warn!(slug = %slug, error = %e, "skipping undecodable pinned link"),
            }
        }
        Ok(records)
    }
}

#[async_trait]
impl LinkAdmin for RedisLinkStore {
    async fn set_pinned(&self, slug: &Slug, pinned: bool) -> Result<bool> {
        let mut conn = self.conn.clone();
        let updated: i64 = self
            .set_pinned
            .key(record_key(slug.as_str()))
            .key(PINNED_SET_KEY)
            .arg(slug.as_str())
            .arg(if pinned { "1" } else { "0" })
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to update pin in Redis", e))?;
        Ok(updated == 1)
    }

    async fn set_expiration(&self, slug: &Slug, expires_at: Option<Timestamp>) -> Result<bool> {
        let mut conn = self.conn.clone();
        let raw = expires_at
            .map(|ts| ts.as_millisecond().to_string())
            .unwrap_or_default();
        let updated: i64 = self
            .set_expiration
            .key(record_key(slug.as_str()))
            .arg(raw)
            .invoke_async(&mut conn)
            .await
            .map_err(|e| map_redis_error("failed to update expiration in Redis", e))?;
        Ok(updated == 1)
    }
}

//! SQLite response cache

use crate::cache::schema::initialize_schema;
use crate::cache::{CacheError, CacheResult, CachedResponse, ResponseCache};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::Duration;

/// SQLite-backed [`ResponseCache`]
pub struct SqliteCache {
    conn: Connection,
}

impl SqliteCache {
    /// Opens (or creates) the cache database at `path`
    pub fn new(path: &Path) -> CacheResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA temp_store = MEMORY;
        ",
        )?;
        initialize_schema(&conn)?;

        Ok(Self { conn })
    }

    /// Creates a throwaway in-memory cache
    pub fn new_in_memory() -> CacheResult<Self> {
        let conn = Connection::open_in_memory()?;
        initialize_schema(&conn)?;
        Ok(Self { conn })
    }
}

fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn parse_timestamp(raw: &str) -> CacheResult<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| CacheError::Timestamp(format!("{}: {}", raw, e)))
}

impl ResponseCache for SqliteCache {
    fn get(&self, key: &str) -> CacheResult<Option<CachedResponse>> {
        let row = self
            .conn
            .query_row(
                "SELECT url, status, content_type, body, fetched_at FROM responses WHERE key = ?1",
                params![key],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, u16>(1)?,
                        row.get::<_, Option<String>>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((url, status, content_type, body, fetched_at)) => Ok(Some(CachedResponse {
                url,
                status,
                content_type,
                body,
                fetched_at: parse_timestamp(&fetched_at)?,
            })),
            None => Ok(None),
        }
    }

    fn put(&mut self, key: &str, entry: &CachedResponse) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO responses (key, url, status, content_type, body, fetched_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(key) DO UPDATE SET
                url = excluded.url,
                status = excluded.status,
                content_type = excluded.content_type,
                body = excluded.body,
                fetched_at = excluded.fetched_at",
            params![
                key,
                entry.url,
                entry.status,
                entry.content_type,
                entry.body,
                format_timestamp(&entry.fetched_at),
            ],
        )?;
        Ok(())
    }

    fn purge_expired(&mut self, ttl: Duration) -> CacheResult<usize> {
        let cutoff = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|ttl| Utc::now().checked_sub_signed(ttl));
        let Some(cutoff) = cutoff else {
            return Ok(0);
        };

        // Timestamps are written with a fixed format, so they sort chronologically
        let removed = self.conn.execute(
            "DELETE FROM responses WHERE fetched_at < ?1",
            params![format_timestamp(&cutoff)],
        )?;
        Ok(removed)
    }

    fn len(&self) -> CacheResult<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM responses", [], |row| row.get(0))?;
        Ok(count.max(0) as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn entry(url: &str, body: &str) -> CachedResponse {
        CachedResponse {
            url: url.to_string(),
            status: 200,
            content_type: Some("text/html".to_string()),
            body: body.to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_put_then_get() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache.put("k1", &entry("https://example.com/", "hello")).unwrap();

        let found = cache.get("k1").unwrap().unwrap();
        assert_eq!(found.url, "https://example.com/");
        assert_eq!(found.body, "hello");
        assert_eq!(found.content_type.as_deref(), Some("text/html"));
        assert!(cache.get("missing").unwrap().is_none());
    }

    #[test]
    fn test_put_replaces_existing() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        cache.put("k1", &entry("https://example.com/", "old")).unwrap();
        cache.put("k1", &entry("https://example.com/", "new")).unwrap();

        assert_eq!(cache.len().unwrap(), 1);
        assert_eq!(cache.get("k1").unwrap().unwrap().body, "new");
    }

    #[test]
    fn test_purge_expired() {
        let mut cache = SqliteCache::new_in_memory().unwrap();
        let mut stale = entry("https://example.com/old", "old");
        stale.fetched_at = Utc::now() - chrono::Duration::hours(48);
        cache.put("old", &stale).unwrap();
        cache.put("new", &entry("https://example.com/new", "new")).unwrap();

        let removed = cache.purge_expired(Duration::from_secs(86_400)).unwrap();
        assert_eq!(removed, 1);
        assert!(cache.get("old").unwrap().is_none());
        assert!(cache.get("new").unwrap().is_some());
    }

    #[test]
    fn test_file_backed_cache_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("cache.sqlite");

        {
            let mut cache = SqliteCache::new(&path).unwrap();
            cache.put("k", &entry("https://example.com/", "kept")).unwrap();
        }

        let cache = SqliteCache::new(&path).unwrap();
        assert_eq!(cache.get("k").unwrap().unwrap().body, "kept");
        assert!(!cache.is_empty().unwrap());
    }
}

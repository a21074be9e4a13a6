use std::collections::HashMap;
use std::fmt::Display;

use chrono::{DateTime, Utc};
use redis::AsyncCommands;
use redis::Client;
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::{Movie, TrendingEntry};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TrendKey {
    /// Sorted set of search terms scored by count
    Counts,
    /// Hash holding the document for one search term
    Entry(String),
}

impl Display for TrendKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendKey::Counts => write!(f, "trending:counts"),
            TrendKey::Entry(term) => write!(f, "trending:entry:{}", term),
        }
    }
}

/// Creates a Redis client for the trend store
pub fn create_redis_client(redis_url: &str) -> anyhow::Result<Client> {
    let client = Client::open(redis_url)?;
    Ok(client)
}

/// Popularity store for search terms
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait TrendStore: Send + Sync {
    /// Increments the counter for `term`, creating its document from `movie`
    /// when the term has never been recorded
    async fn record_search(&self, term: &str, movie: &Movie) -> AppResult<()>;

    /// Top `limit` entries by descending count
    async fn list_trending(&self, limit: usize) -> AppResult<Vec<TrendingEntry>>;
}

/// Redis-backed trend store
///
/// Counts live in one sorted set so ranking is a single ZREVRANGE; each
/// term's document is a hash seeded on first record and never overwritten.
#[derive(Clone)]
pub struct RedisTrendStore {
    redis_client: Client,
    image_base_url: String,
}

impl RedisTrendStore {
    pub fn new(redis_client: Client, image_base_url: String) -> Self {
        Self {
            redis_client,
            image_base_url,
        }
    }
}

#[async_trait::async_trait]
impl TrendStore for RedisTrendStore {
    async fn record_search(&self, term: &str, movie: &Movie) -> AppResult<()> {
        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;

        let poster_url = movie.poster_url(&self.image_base_url).unwrap_or_default();
        let doc_id = Uuid::new_v4().to_string();

        let _: () = record_pipeline(term, movie, &poster_url, &doc_id, Utc::now())
            .query_async(&mut conn)
            .await?;

        tracing::debug!(term = %term, movie_id = movie.id, "Recorded search");
        Ok(())
    }

    async fn list_trending(&self, limit: usize) -> AppResult<Vec<TrendingEntry>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        let mut conn = self.redis_client.get_multiplexed_async_connection().await?;
        let ranked: Vec<(String, f64)> = conn
            .zrevrange_withscores(TrendKey::Counts.to_string(), 0, limit as isize - 1)
            .await?;

        let mut entries = Vec::with_capacity(ranked.len());
        for (term, score) in ranked {
            let fields: HashMap<String, String> =
                conn.hgetall(TrendKey::Entry(term.clone()).to_string()).await?;

            match entry_from_fields(&term, score as u64, &fields) {
                Some(entry) => entries.push(entry),
                None => tracing::warn!(term = %term, "Trending count without a usable document"),
            }
        }

        Ok(entries)
    }
}

/// Atomic write for one recorded search
///
/// The counter always moves and `last_searched_at` is always refreshed. The
/// document fields use HSETNX, so only the first record for a term sets them.
fn record_pipeline(
    term: &str,
    movie: &Movie,
    poster_url: &str,
    doc_id: &str,
    searched_at: DateTime<Utc>,
) -> redis::Pipeline {
    let entry_key = TrendKey::Entry(term.to_string()).to_string();

    let mut pipe = redis::pipe();
    pipe.atomic()
        .zincr(TrendKey::Counts.to_string(), term, 1)
        .ignore()
        .hset_nx(&entry_key, "id", doc_id)
        .ignore()
        .hset_nx(&entry_key, "search_term", term)
        .ignore()
        .hset_nx(&entry_key, "movie_id", movie.id)
        .ignore()
        .hset_nx(&entry_key, "poster_url", poster_url)
        .ignore()
        .hset_nx(&entry_key, "title", &movie.title)
        .ignore()
        .hset(&entry_key, "last_searched_at", searched_at.to_rfc3339())
        .ignore();
    pipe
}

/// Builds an entry from a stored hash, `None` when required fields are missing
fn entry_from_fields(
    term: &str,
    count: u64,
    fields: &HashMap<String, String>,
) -> Option<TrendingEntry> {
    let id = fields.get("id")?.clone();
    let movie_id = fields.get("movie_id")?.parse().ok()?;
    let last_searched_at = fields
        .get("last_searched_at")
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|ts| ts.with_timezone(&Utc));

    Some(TrendingEntry {
        id,
        search_term: fields
            .get("search_term")
            .cloned()
            .unwrap_or_else(|| term.to_string()),
        count,
        movie_id,
        poster_url: fields.get("poster_url").cloned().unwrap_or_default(),
        title: fields.get("title").cloned().unwrap_or_default(),
        last_searched_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn test_movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: Some(format!("/{}.jpg", id)),
            popularity: 10.0,
            vote_average: None,
            release_date: None,
            original_language: None,
        }
    }

    #[test]
    fn test_trend_key_display() {
        assert_eq!(TrendKey::Counts.to_string(), "trending:counts");
        assert_eq!(
            TrendKey::Entry("Batman".to_string()).to_string(),
            "trending:entry:Batman"
        );
    }

    #[test]
    fn test_entry_keys_are_case_sensitive() {
        assert_ne!(
            TrendKey::Entry("batman".to_string()),
            TrendKey::Entry("Batman".to_string())
        );
    }

    #[test]
    fn test_entry_from_fields() {
        let stored = fields(&[
            ("id", "a1b2"),
            ("search_term", "batman"),
            ("movie_id", "268"),
            ("poster_url", "https://img/268.jpg"),
            ("title", "Batman"),
            ("last_searched_at", "2026-10-01T12:00:00+00:00"),
        ]);

        let entry = entry_from_fields("batman", 7, &stored).unwrap();
        assert_eq!(entry.id, "a1b2");
        assert_eq!(entry.count, 7);
        assert_eq!(entry.movie_id, 268);
        assert_eq!(entry.title, "Batman");
        assert!(entry.last_searched_at.is_some());
    }

    #[test]
    fn test_entry_from_fields_missing_document() {
        assert!(entry_from_fields("batman", 3, &HashMap::new()).is_none());
        assert!(entry_from_fields("batman", 3, &fields(&[("id", "x"), ("movie_id", "nan")])).is_none());
    }

    /// Splits a packed RESP pipeline into its commands' argument lists
    fn packed_commands(pipe: &redis::Pipeline) -> Vec<Vec<String>> {
        let packed = String::from_utf8(pipe.get_packed_pipeline()).unwrap();
        let mut commands = Vec::new();
        let mut lines = packed.split("\r\n");
        while let Some(header) = lines.next() {
            let Some(argc) = header.strip_prefix('*') else {
                continue;
            };
            let argc: usize = argc.parse().unwrap();
            let args = (0..argc)
                .map(|_| {
                    lines.next().unwrap();
                    lines.next().unwrap().to_string()
                })
                .collect();
            commands.push(args);
        }
        commands
    }

    #[test]
    fn test_record_pipeline_seeds_document_only_once() {
        let searched_at = DateTime::parse_from_rfc3339("2026-10-01T12:00:00+00:00")
            .unwrap()
            .with_timezone(&Utc);
        let pipe = record_pipeline(
            "alien",
            &test_movie(348, "Alien"),
            "https://img/348.jpg",
            "doc-1",
            searched_at,
        );

        let commands = packed_commands(&pipe);
        let names: Vec<&str> = commands.iter().map(|c| c[0].as_str()).collect();
        assert_eq!(
            names,
            vec!["MULTI", "ZINCRBY", "HSETNX", "HSETNX", "HSETNX", "HSETNX", "HSETNX", "HSET", "EXEC"]
        );

        assert_eq!(commands[1], vec!["ZINCRBY", "trending:counts", "1", "alien"]);

        let seeded: Vec<(&str, &str)> = commands[2..7]
            .iter()
            .map(|c| {
                assert_eq!(c[1], "trending:entry:alien");
                (c[2].as_str(), c[3].as_str())
            })
            .collect();
        assert_eq!(
            seeded,
            vec![
                ("id", "doc-1"),
                ("search_term", "alien"),
                ("movie_id", "348"),
                ("poster_url", "https://img/348.jpg"),
                ("title", "Alien"),
            ]
        );

        assert_eq!(
            commands[7],
            vec!["HSET", "trending:entry:alien", "last_searched_at", "2026-10-01T12:00:00+00:00"]
        );
    }

    #[tokio::test]
    async fn test_zero_limit_skips_store() {
        // Unroutable URL: any connection attempt would fail
        let client = create_redis_client("redis://127.0.0.1:1").unwrap();
        let store = RedisTrendStore::new(client, "https://img".to_string());

        let entries = store.list_trending(0).await.unwrap();
        assert!(entries.is_empty());
    }

    #[tokio::test]
    #[ignore = "requires a running Redis"]
    async fn test_record_and_list_trending() {
        let redis_url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());
        let client = create_redis_client(&redis_url).unwrap();
        let store = RedisTrendStore::new(client.clone(), "https://img".to_string());

        let mut conn = client.get_multiplexed_async_connection().await.unwrap();
        let _: () = conn.del(TrendKey::Counts.to_string()).await.unwrap();

        store.record_search("heat", &test_movie(949, "Heat")).await.unwrap();
        store.record_search("alien", &test_movie(348, "Alien")).await.unwrap();
        store.record_search("alien", &test_movie(679, "Aliens")).await.unwrap();

        let entries = store.list_trending(5).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].search_term, "alien");
        assert_eq!(entries[0].count, 2);
        // First record seeds the document
        assert_eq!(entries[0].movie_id, 348);
        assert_eq!(entries[0].poster_url, "https://img/348.jpg");
        assert_eq!(entries[1].search_term, "heat");

        // Clean up
        let _: () = conn.del(TrendKey::Counts.to_string()).await.unwrap();
        for term in ["heat", "alien"] {
            let _: () = conn.del(TrendKey::Entry(term.to_string()).to_string()).await.unwrap();
        }
    }
}

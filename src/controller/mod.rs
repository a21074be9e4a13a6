//! Page state for the movie discovery view
//!
//! Two feeds are driven independently: the primary feed follows the
//! debounced search term, the trending feed is loaded once at start-up.
//! Neither feed can see or fail the other.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::{
    db::TrendStore,
    error::{AppError, AppResult},
    models::{Movie, TrendingEntry},
    services::{catalog::CatalogClient, debounce::Debouncer, trends::TrendRecorder},
};

pub mod feed;
pub mod render;

pub use feed::{Feed, FeedPhase};
pub use render::PageRenderer;

pub const MOVIES_ERROR: &str = "Error fetching movies. Please try again later.";
pub const TRENDING_ERROR: &str = "Error fetching trending movies. Please try again later.";

/// Tunables for the view controller
#[derive(Debug, Clone)]
pub struct ControllerSettings {
    pub debounce: Duration,
    /// Page poll interval, raised to `render::MIN_REFRESH` when shorter
    pub refresh: Duration,
    pub trending_limit: usize,
    pub image_base_url: String,
}

/// Point-in-time copy of everything the page shows
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub search_term: String,
    pub movies: Feed<Movie>,
    pub trending: Feed<TrendingEntry>,
}

pub struct ViewController {
    catalog: Arc<dyn CatalogClient>,
    trend_store: Arc<dyn TrendStore>,
    recorder: TrendRecorder,
    debouncer: Debouncer<String>,
    renderer: PageRenderer,
    movies: RwLock<Feed<Movie>>,
    trending: RwLock<Feed<TrendingEntry>>,
    trending_limit: usize,
}

impl ViewController {
    /// Must be called inside a tokio runtime; spawns the debounce task
    pub fn new(
        catalog: Arc<dyn CatalogClient>,
        trend_store: Arc<dyn TrendStore>,
        recorder: TrendRecorder,
        settings: ControllerSettings,
    ) -> AppResult<Self> {
        let renderer = PageRenderer::new(settings.image_base_url, settings.refresh)?;

        Ok(Self {
            catalog,
            trend_store,
            recorder,
            debouncer: Debouncer::new(String::new(), settings.debounce),
            renderer,
            movies: RwLock::new(Feed::default()),
            trending: RwLock::new(Feed::default()),
            trending_limit: settings.trending_limit,
        })
    }

    /// Loads the trending feed and starts following the debounced term
    ///
    /// The primary feed is fetched immediately for the current term, then
    /// again on every settled change. Each fetch runs as its own task.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let controller = self.clone();
        tokio::spawn(async move { controller.load_trending().await });

        let weak = Arc::downgrade(self);
        let mut settled = self.debouncer.subscribe();

        tokio::spawn(async move {
            loop {
                let term = settled.borrow_and_update().clone();
                let Some(controller) = weak.upgrade() else {
                    break;
                };
                tokio::spawn(async move { controller.fetch_movies(&term).await });

                if settled.changed().await.is_err() {
                    break;
                }
            }
            tracing::debug!("Search term watcher stopped");
        })
    }

    /// Records a keystroke; the primary feed reacts once the term settles
    pub fn set_search_term(&self, term: String) {
        self.debouncer.set(term);
    }

    pub fn search_term(&self) -> String {
        self.debouncer.latest_input()
    }

    /// Runs one primary-feed request for `query`
    pub async fn fetch_movies(&self, query: &str) {
        let seq = self.movies.write().await.begin();

        match self.catalog.search(query).await {
            Ok(movies) => {
                if !query.is_empty() {
                    if let Some(top) = movies.first() {
                        self.recorder.record(query, top);
                    }
                }

                let count = movies.len();
                if !self.movies.write().await.succeed(seq, movies) {
                    tracing::debug!(query = %query, seq, "Discarded stale movie results");
                    return;
                }
                tracing::debug!(query = %query, results = count, "Movie feed updated");
            }
            Err(e) => {
                tracing::error!(error = %e, query = %query, "Error fetching movies");

                let message = match e {
                    AppError::Catalog(msg) => msg,
                    _ => MOVIES_ERROR.to_string(),
                };
                if !self.movies.write().await.fail(seq, message) {
                    tracing::debug!(query = %query, seq, "Discarded stale movie error");
                }
            }
        }
    }

    /// Runs one trending-feed request
    pub async fn load_trending(&self) {
        let seq = self.trending.write().await.begin();

        match self.trend_store.list_trending(self.trending_limit).await {
            Ok(entries) => {
                tracing::debug!(entries = entries.len(), "Trending feed updated");
                self.trending.write().await.succeed(seq, entries);
            }
            Err(e) => {
                tracing::error!(error = %e, "Error fetching trending movies");
                self.trending
                    .write()
                    .await
                    .fail(seq, TRENDING_ERROR.to_string());
            }
        }
    }

    pub async fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            search_term: self.search_term(),
            movies: self.movies.read().await.clone(),
            trending: self.trending.read().await.clone(),
        }
    }

    pub async fn render_page(&self) -> AppResult<String> {
        let snapshot = self.snapshot().await;
        self.renderer.render_page(&snapshot)
    }

    pub async fn render_feeds(&self) -> AppResult<String> {
        let snapshot = self.snapshot().await;
        self.renderer.render_feeds(&snapshot)
    }
}

use std::time::Duration;

use minijinja::{context, Environment};
use serde::Serialize;

use crate::{
    error::{AppError, AppResult},
    models::{FeedDisplay, Movie, RequestState, TrendingEntry},
};

use super::PageSnapshot;

const PAGE_TEMPLATE: &str = include_str!("../../templates/page.html");
const FEEDS_TEMPLATE: &str = include_str!("../../templates/feeds.html");

/// Poster shown for movies the catalog has no artwork for
pub const NO_POSTER: &str = "/no-movie.png";

/// Shortest interval the page script may poll at
pub const MIN_REFRESH: Duration = Duration::from_millis(250);

#[derive(Debug, Serialize)]
struct MovieCard {
    title: String,
    poster_url: String,
    rating: String,
    language: String,
    year: String,
}

#[derive(Debug, Serialize)]
struct TrendingRow {
    rank: usize,
    search_term: String,
    title: String,
    poster_url: String,
    count: u64,
}

/// Template view of one feed, already reduced by render priority
#[derive(Debug, Serialize)]
struct Section<I> {
    loading: bool,
    error: Option<String>,
    items: Vec<I>,
}

fn section<T, I>(state: &RequestState<T>, to_item: impl Fn(usize, &T) -> I) -> Section<I> {
    match state.display() {
        FeedDisplay::Loading => Section {
            loading: true,
            error: None,
            items: Vec::new(),
        },
        FeedDisplay::Error(message) => Section {
            loading: false,
            error: Some(message.to_string()),
            items: Vec::new(),
        },
        FeedDisplay::Items(items) => Section {
            loading: false,
            error: None,
            items: items
                .iter()
                .enumerate()
                .map(|(i, item)| to_item(i, item))
                .collect(),
        },
    }
}

/// Renders page snapshots to HTML
pub struct PageRenderer {
    env: Environment<'static>,
    image_base_url: String,
    refresh: Duration,
}

impl PageRenderer {
    pub fn new(image_base_url: String, refresh: Duration) -> AppResult<Self> {
        let mut env = Environment::new();
        env.add_template("page.html", PAGE_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("Failed to add page template: {}", e)))?;
        env.add_template("feeds.html", FEEDS_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("Failed to add feeds template: {}", e)))?;

        Ok(Self {
            env,
            image_base_url,
            refresh: refresh.max(MIN_REFRESH),
        })
    }

    /// Full page including the search box
    pub fn render_page(&self, snapshot: &PageSnapshot) -> AppResult<String> {
        self.render("page.html", snapshot)
    }

    /// Only the trending and movie sections, used for in-place refresh
    pub fn render_feeds(&self, snapshot: &PageSnapshot) -> AppResult<String> {
        self.render("feeds.html", snapshot)
    }

    fn render(&self, name: &str, snapshot: &PageSnapshot) -> AppResult<String> {
        let template = self
            .env
            .get_template(name)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        template
            .render(context! {
                search_term => &snapshot.search_term,
                movies => section(snapshot.movies.state(), |_, movie| self.movie_card(movie)),
                trending => section(snapshot.trending.state(), trending_row),
                refresh_ms => self.refresh.as_millis() as u64,
            })
            .map_err(|e| AppError::Internal(format!("Failed to render {}: {}", name, e)))
    }

    fn movie_card(&self, movie: &Movie) -> MovieCard {
        MovieCard {
            title: movie.title.clone(),
            poster_url: movie
                .poster_url(&self.image_base_url)
                .unwrap_or_else(|| NO_POSTER.to_string()),
            rating: movie.rating_label(),
            language: movie
                .original_language
                .clone()
                .unwrap_or_else(|| "N/A".to_string()),
            year: movie.release_year().unwrap_or("N/A").to_string(),
        }
    }
}

fn trending_row(index: usize, entry: &TrendingEntry) -> TrendingRow {
    TrendingRow {
        rank: index + 1,
        search_term: entry.search_term.clone(),
        title: entry.title.clone(),
        poster_url: entry.poster_url.clone(),
        count: entry.count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::feed::Feed;

    fn renderer() -> PageRenderer {
        PageRenderer::new("https://img".to_string(), Duration::from_secs(1)).unwrap()
    }

    fn entry(term: &str, count: u64) -> TrendingEntry {
        TrendingEntry {
            id: format!("id-{}", term),
            search_term: term.to_string(),
            count,
            movie_id: 1,
            poster_url: format!("https://img/{}.jpg", term),
            title: term.to_uppercase(),
            last_searched_at: None,
        }
    }

    fn movie(title: &str) -> Movie {
        Movie {
            id: 1,
            title: title.to_string(),
            poster_path: None,
            popularity: 1.0,
            vote_average: Some(7.4),
            release_date: Some("1995-12-15".to_string()),
            original_language: Some("en".to_string()),
        }
    }

    fn snapshot() -> PageSnapshot {
        PageSnapshot {
            search_term: String::new(),
            movies: Feed::default(),
            trending: Feed::default(),
        }
    }

    #[test]
    fn test_loading_shows_spinner_only() {
        let mut snap = snapshot();
        snap.movies.begin();

        let html = renderer().render_feeds(&snap).unwrap();
        assert!(html.contains("Loading..."));
        assert!(!html.contains("movie-card"));
    }

    #[test]
    fn test_error_is_shown_in_red() {
        let mut snap = snapshot();
        let seq = snap.movies.begin();
        snap.movies.fail(seq, "Movie not found!".to_string());

        let html = renderer().render_feeds(&snap).unwrap();
        assert!(html.contains(r#"<p class="text-red-500">Movie not found!</p>"#));
    }

    #[test]
    fn test_movie_cards() {
        let mut snap = snapshot();
        let seq = snap.movies.begin();
        snap.movies.succeed(seq, vec![movie("Heat")]);

        let html = renderer().render_feeds(&snap).unwrap();
        assert!(html.contains("<h3>Heat</h3>"));
        assert!(html.contains("<span>7.4</span>"));
        assert!(html.contains("1995"));
        assert!(html.contains("no-movie.png"));
    }

    #[test]
    fn test_trending_rows_are_ranked_in_order() {
        let mut snap = snapshot();
        let seq = snap.trending.begin();
        snap.trending.succeed(seq, vec![entry("alien", 9), entry("heat", 4)]);

        let html = renderer().render_feeds(&snap).unwrap();
        let alien = html.find("<p>1</p>").unwrap();
        let heat = html.find("<p>2</p>").unwrap();
        assert!(alien < heat);
        assert!(html.find("alien.jpg").unwrap() < html.find("heat.jpg").unwrap());
    }

    #[test]
    fn test_trending_failure_shows_message_without_rows() {
        let mut snap = snapshot();
        let seq = snap.trending.begin();
        snap.trending.fail(seq, "Error fetching trending movies.".to_string());

        let html = renderer().render_feeds(&snap).unwrap();
        assert!(html.contains("Trending Movies"));
        assert!(html.contains("Error fetching trending movies."));
        assert!(!html.contains("<p>1</p>"));
    }

    #[test]
    fn test_empty_trending_section_is_hidden() {
        let mut snap = snapshot();
        let seq = snap.trending.begin();
        snap.trending.succeed(seq, Vec::new());

        let html = renderer().render_feeds(&snap).unwrap();
        assert!(!html.contains("Trending Movies"));
    }

    #[test]
    fn test_page_escapes_search_term() {
        let mut snap = snapshot();
        snap.search_term = r#""><script>alert(1)</script>"#.to_string();

        let html = renderer().render_page(&snap).unwrap();
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains("id=\"feeds\""));
    }

    #[test]
    fn test_poll_interval_has_a_floor() {
        let html = PageRenderer::new("https://img".to_string(), Duration::ZERO)
            .unwrap()
            .render_page(&snapshot())
            .unwrap();
        assert!(html.contains("}, 250);"));
        assert!(!html.contains("}, 0);"));

        let html = renderer().render_page(&snapshot()).unwrap();
        assert!(html.contains("}, 1000);"));
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A search term and how often it led to a successful search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    /// Store-assigned identifier
    pub id: String,
    pub search_term: String,
    pub count: u64,
    /// Catalog id of the first result when the term was first recorded
    pub movie_id: u64,
    pub poster_url: String,
    pub title: String,
    pub last_searched_at: Option<DateTime<Utc>>,
}

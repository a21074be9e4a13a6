use serde::{Deserialize, Serialize};

/// Fallback shown when the catalog reports a failure without a message
pub const CATALOG_FALLBACK_ERROR: &str = "Failed to fetch movies";

/// A movie as returned by the catalog
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub original_language: Option<String>,
}

impl Movie {
    /// Rating with one decimal, or "N/A" when the catalog has none
    pub fn rating_label(&self) -> String {
        match self.vote_average {
            Some(vote) if vote > 0.0 => format!("{:.1}", vote),
            _ => "N/A".to_string(),
        }
    }

    /// Release year taken from the `YYYY-MM-DD` release date
    pub fn release_year(&self) -> Option<&str> {
        self.release_date
            .as_deref()
            .and_then(|date| date.split('-').next())
            .filter(|year| !year.is_empty())
    }

    /// Full poster URL under the given image base
    pub fn poster_url(&self, image_base_url: &str) -> Option<String> {
        self.poster_path
            .as_deref()
            .filter(|path| !path.is_empty())
            .map(|path| format!("{}{}", image_base_url, path))
    }
}

/// Raw payload of a catalog listing or search call
///
/// The catalog answers either with a `results` array or with
/// `Response: "False"` and an `Error` message.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct CatalogPayload {
    #[serde(default)]
    pub results: Option<Vec<Movie>>,
    #[serde(rename = "Response", default)]
    pub response: Option<String>,
    #[serde(rename = "Error", default)]
    pub error: Option<String>,
}

impl CatalogPayload {
    pub fn is_failure(&self) -> bool {
        self.response.as_deref() == Some("False")
    }
}

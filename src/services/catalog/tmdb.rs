//! TMDB catalog client
//!
//! Two endpoints are used:
//! 1. Default listing: /discover/movie?sort_by=popularity.desc
//! 2. Text search: /search/movie?query={term}
//!
//! Both authenticate with the API read access token as a bearer credential.

use crate::{
    error::{AppError, AppResult},
    models::{CatalogPayload, Movie},
    services::catalog::{parse_payload, CatalogClient},
};
use reqwest::{header, Client as HttpClient};

#[derive(Clone)]
pub struct TmdbCatalog {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

impl TmdbCatalog {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Full request URL for a query
    pub fn endpoint(&self, query: &str) -> String {
        if query.is_empty() {
            format!("{}/discover/movie?sort_by=popularity.desc", self.api_url)
        } else {
            format!(
                "{}/search/movie?query={}",
                self.api_url,
                urlencoding::encode(query)
            )
        }
    }
}

#[async_trait::async_trait]
impl CatalogClient for TmdbCatalog {
    async fn search(&self, query: &str) -> AppResult<Vec<Movie>> {
        let url = self.endpoint(query);

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "TMDB API returned status {}: {}",
                status, body
            )));
        }

        let payload: CatalogPayload = response.json().await?;
        let movies = parse_payload(payload)?;

        tracing::info!(
            query = %query,
            listing = query.is_empty(),
            results = movies.len(),
            catalog = self.name(),
            "Catalog search completed"
        );

        Ok(movies)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

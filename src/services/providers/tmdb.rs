/// TMDB (The Movie Database) API provider
///
/// Every request carries the API key and `language=en-US` as query
/// parameters and is bounded by the client-wide timeout.
use crate::{
    models::{FeedCategory, MovieDetail, TmdbMovieDetails, TmdbPage},
    services::providers::{CatalogProvider, EnrichmentError, EnrichmentResult},
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;

const LANGUAGE: &str = "en-US";
const DISCOVER_SORT: &str = "popularity.desc";

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
    image_base_url: String,
}

impl TmdbProvider {
    pub fn new(
        api_key: String,
        api_url: String,
        image_base_url: String,
        timeout: Duration,
    ) -> EnrichmentResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;

        Ok(Self {
            http_client,
            api_key,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_base_url,
        })
    }

    /// GET `path` and decode the JSON body
    ///
    /// Transport failures map to `Network`, non-2xx to `Upstream`.
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> EnrichmentResult<T> {
        let url = format!("{}{}", self.api_url, path);

        let response = self
            .http_client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", LANGUAGE)])
            .query(params)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(path = %path, status = %status, "TMDB request failed");
            return Err(EnrichmentError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        // A stalled or truncated body is a transport failure, not bad JSON
        let body = response
            .text()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(path = %path, error = %e, "Failed to deserialize TMDB response");
            EnrichmentError::Decode(e.to_string())
        })
    }
}

#[async_trait::async_trait]
impl CatalogProvider for TmdbProvider {
    async fn search_movies(&self, query: &str, page: u32) -> EnrichmentResult<TmdbPage> {
        let results: TmdbPage = self
            .get(
                "/search/movie",
                &[
                    ("query", query.to_string()),
                    ("page", page.to_string()),
                    ("include_adult", "false".to_string()),
                ],
            )
            .await?;

        tracing::info!(
            query = %query,
            page,
            results = results.results.len(),
            provider = "tmdb",
            "Movie search completed"
        );

        Ok(results)
    }

    async fn movie_details(&self, tmdb_id: u64) -> EnrichmentResult<MovieDetail> {
        let details: TmdbMovieDetails = self.get(&format!("/movie/{}", tmdb_id), &[]).await?;
        let detail = details.into_detail(&self.image_base_url);

        tracing::debug!(
            tmdb_id,
            genres = detail.genres.len(),
            provider = "tmdb",
            "Movie details fetched"
        );

        Ok(detail)
    }

    async fn discover_by_genre(&self, genre_id: u64, page: u32) -> EnrichmentResult<TmdbPage> {
        let results: TmdbPage = self
            .get(
                "/discover/movie",
                &[
                    ("with_genres", genre_id.to_string()),
                    ("sort_by", DISCOVER_SORT.to_string()),
                    ("page", page.to_string()),
                ],
            )
            .await?;

        tracing::debug!(
            genre_id,
            results = results.results.len(),
            provider = "tmdb",
            "Genre discovery completed"
        );

        Ok(results)
    }

    async fn category_feed(&self, category: FeedCategory) -> EnrichmentResult<TmdbPage> {
        let params = match category {
            FeedCategory::Trending => vec![],
            _ => vec![("page", "1".to_string())],
        };

        self.get(&category.provider_path(), &params).await
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

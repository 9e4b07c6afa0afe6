/// External movie catalog abstraction
///
/// The recommendation pipeline only reaches the outside world through
/// `CatalogProvider`. The TMDB implementation lives in `tmdb`; tests swap in
/// mocks so enrichment and bundle assembly can run without the network.
use crate::models::{FeedCategory, MovieDetail, TmdbPage};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Failure talking to the external catalog
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum EnrichmentError {
    /// Connection refused, timeout, DNS, or any other transport failure
    #[error("Network error: {0}")]
    Network(String),

    /// Provider answered with a non-2xx status
    #[error("TMDB API returned status {status}: {body}")]
    Upstream { status: u16, body: String },

    /// Provider answered 2xx with a body we could not decode
    #[error("Failed to parse TMDB response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for EnrichmentError {
    fn from(err: reqwest::Error) -> Self {
        // Body-read timeouts surface as decode errors, so check transport first
        if err.is_timeout() || err.is_connect() || err.is_request() || err.is_body() {
            EnrichmentError::Network(err.to_string())
        } else if let (true, Some(status)) = (err.is_status(), err.status()) {
            EnrichmentError::Upstream {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else if err.is_decode() {
            EnrichmentError::Decode(err.to_string())
        } else {
            EnrichmentError::Network(err.to_string())
        }
    }
}

pub type EnrichmentResult<T> = Result<T, EnrichmentError>;

/// Trait for external movie catalogs
///
/// A lookup that legitimately finds nothing is a successful empty page,
/// never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Keyword search, returned as the provider's paginated result set
    async fn search_movies(&self, query: &str, page: u32) -> EnrichmentResult<TmdbPage>;

    /// Full attributes for one movie, genres in provider order
    async fn movie_details(&self, tmdb_id: u64) -> EnrichmentResult<MovieDetail>;

    /// Movies in one genre, most popular first
    async fn discover_by_genre(&self, genre_id: u64, page: u32) -> EnrichmentResult<TmdbPage>;

    /// First page of a home feed category
    async fn category_feed(&self, category: FeedCategory) -> EnrichmentResult<TmdbPage>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::services::enrichment::EnrichmentClient;
use crate::services::providers::{CatalogProvider, EnrichmentResult, TmdbProvider};
use crate::services::similarity::SimilarityEngine;

/// Shared application state
///
/// Built once at startup and never mutated; every field is cheap to clone
/// and read-only, so handlers share it without locking.
#[derive(Clone)]
pub struct AppState {
    pub enrichment: EnrichmentClient,
    pub similarity: SimilarityEngine,
    pub enrichment_concurrency: usize,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        image_base_url: String,
        catalog: Option<Arc<Catalog>>,
        enrichment_concurrency: usize,
    ) -> Self {
        Self {
            enrichment: EnrichmentClient::new(provider, image_base_url),
            similarity: SimilarityEngine::new(catalog),
            enrichment_concurrency,
        }
    }

    /// State backed by the TMDB provider described in `config`
    pub fn from_config(config: &Config, catalog: Arc<Catalog>) -> EnrichmentResult<Self> {
        let provider = TmdbProvider::new(
            config.tmdb_api_key.clone(),
            config.tmdb_api_url.clone(),
            config.tmdb_image_base_url.clone(),
            config.request_timeout(),
        )?;

        Ok(Self::new(
            Arc::new(provider),
            config.tmdb_image_base_url.clone(),
            Some(catalog),
            config.enrichment_concurrency,
        ))
    }
}

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::models::{FeedCategory, MovieCard, MovieDetail, TmdbPage};
use crate::services::providers::{CatalogProvider, EnrichmentResult};

/// Facade over the external catalog used by the recommendation pipeline
///
/// Converts raw provider pages into `MovieCard`s and offers the best-effort
/// lookup used to decorate locally ranked titles.
#[derive(Clone)]
pub struct EnrichmentClient {
    provider: Arc<dyn CatalogProvider>,
    image_base_url: String,
}

impl EnrichmentClient {
    pub fn new(provider: Arc<dyn CatalogProvider>, image_base_url: String) -> Self {
        Self {
            provider,
            image_base_url,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Raw paginated search results
    pub async fn search_results(&self, query: &str, page: u32) -> EnrichmentResult<TmdbPage> {
        self.provider.search_movies(query, page).await
    }

    /// First search hit as a card, `None` when nothing matches
    pub async fn search_first(&self, query: &str) -> EnrichmentResult<Option<MovieCard>> {
        let page = self.provider.search_movies(query, 1).await?;
        Ok(page
            .results
            .first()
            .map(|m| m.to_card(&self.image_base_url, query)))
    }

    pub async fn detail(&self, tmdb_id: u64) -> EnrichmentResult<MovieDetail> {
        self.provider.movie_details(tmdb_id).await
    }

    pub async fn discover_by_genre(&self, genre_id: u64, page: u32) -> EnrichmentResult<TmdbPage> {
        self.provider.discover_by_genre(genre_id, page).await
    }

    /// First `limit` cards of a home feed category
    pub async fn home_feed(
        &self,
        category: FeedCategory,
        limit: usize,
    ) -> EnrichmentResult<Vec<MovieCard>> {
        let page = self.provider.category_feed(category).await?;
        Ok(self.cards(&page, limit))
    }

    pub fn cards(&self, page: &TmdbPage, limit: usize) -> Vec<MovieCard> {
        page.to_cards(&self.image_base_url, limit)
    }

    /// Best-effort card for a locally ranked title
    ///
    /// Any provider failure collapses to `None`; enrichment never fails the
    /// request it decorates.
    pub async fn attach_card_by_title(&self, title: &str) -> Option<MovieCard> {
        match self.search_first(title).await {
            Ok(card) => card,
            Err(e) => {
                tracing::warn!(title = %title, error = %e, "Enrichment lookup failed");
                None
            }
        }
    }

    /// Enriches every title concurrently, keeping input order
    ///
    /// At most `concurrency` lookups are in flight at once.
    pub async fn attach_cards(&self, titles: Vec<String>, concurrency: usize) -> Vec<Option<MovieCard>> {
        let permits = Arc::new(Semaphore::new(concurrency.max(1)));
        let mut tasks = Vec::with_capacity(titles.len());

        for title in titles {
            let client = self.clone();
            let permits = permits.clone();
            let task = tokio::spawn(async move {
                let _permit = permits.acquire_owned().await.ok()?;
                client.attach_card_by_title(&title).await
            });
            tasks.push(task);
        }

        let mut cards = Vec::with_capacity(tasks.len());
        for task in tasks {
            match task.await {
                Ok(card) => cards.push(card),
                Err(e) => {
                    tracing::error!(error = %e, "Enrichment task join error");
                    cards.push(None);
                }
            }
        }

        cards
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TmdbMovie;
    use crate::services::providers::{EnrichmentError, MockCatalogProvider};
    use mockall::predicate::eq;
    use serde_json::Map;

    fn movie(id: u64, title: &str) -> TmdbMovie {
        TmdbMovie {
            id,
            title: Some(title.to_string()),
            poster_path: Some(format!("/{}.jpg", id)),
            release_date: None,
            vote_average: Some(7.0),
            overview: None,
            extra: Map::new(),
        }
    }

    fn page(movies: Vec<TmdbMovie>) -> TmdbPage {
        TmdbPage {
            page: 1,
            results: movies,
            ..Default::default()
        }
    }

    fn client(mock: MockCatalogProvider) -> EnrichmentClient {
        EnrichmentClient::new(Arc::new(mock), "https://img.test".to_string())
    }

    #[tokio::test]
    async fn test_search_first_returns_first_result() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .with(eq("inception"), eq(1))
            .times(1)
            .returning(|_, _| Ok(page(vec![movie(27205, "Inception"), movie(1, "Other")])));

        let card = client(mock).search_first("inception").await.unwrap().unwrap();
        assert_eq!(card.tmdb_id, 27205);
        assert_eq!(card.poster_url.as_deref(), Some("https://img.test/27205.jpg"));
    }

    #[tokio::test]
    async fn test_search_first_no_results_is_none() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .returning(|_, _| Ok(page(vec![])));

        assert_eq!(client(mock).search_first("nothing").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_search_first_propagates_errors() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .returning(|_, _| Err(EnrichmentError::Network("refused".into())));

        let err = client(mock).search_first("inception").await.unwrap_err();
        assert_eq!(err, EnrichmentError::Network("refused".into()));
    }

    #[tokio::test]
    async fn test_attach_card_swallows_failures() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_search_movies()
            .with(eq("Network Down"), eq(1))
            .returning(|_, _| Err(EnrichmentError::Network("timed out".into())));
        mock.expect_search_movies()
            .with(eq("Upstream Down"), eq(1))
            .returning(|_, _| {
                Err(EnrichmentError::Upstream {
                    status: 503,
                    body: "unavailable".into(),
                })
            });
        mock.expect_search_movies()
            .with(eq("Garbled"), eq(1))
            .returning(|_, _| Err(EnrichmentError::Decode("eof".into())));

        let client = client(mock);
        assert_eq!(client.attach_card_by_title("Network Down").await, None);
        assert_eq!(client.attach_card_by_title("Upstream Down").await, None);
        assert_eq!(client.attach_card_by_title("Garbled").await, None);
    }

    /// Provider whose search latency depends on the title, so lookups that
    /// start first finish last
    struct SlowTmdb {
        finished: std::sync::Mutex<Vec<String>>,
    }

    #[async_trait::async_trait]
    impl CatalogProvider for SlowTmdb {
        async fn search_movies(&self, query: &str, _page: u32) -> EnrichmentResult<TmdbPage> {
            let (delay_ms, result) = match query {
                "Heat" => (300, Ok(page(vec![movie(949, "Heat")]))),
                "Ronin" => (200, Err(EnrichmentError::Network("timed out".into()))),
                "Alien" => (10, Ok(page(vec![movie(348, "Alien")]))),
                _ => (50, Ok(page(vec![]))),
            };
            tokio::time::sleep(std::time::Duration::from_millis(delay_ms)).await;
            self.finished.lock().unwrap().push(query.to_string());
            result
        }

        async fn movie_details(&self, _tmdb_id: u64) -> EnrichmentResult<MovieDetail> {
            unimplemented!()
        }

        async fn discover_by_genre(&self, _genre_id: u64, _page: u32) -> EnrichmentResult<TmdbPage> {
            unimplemented!()
        }

        async fn category_feed(&self, _category: FeedCategory) -> EnrichmentResult<TmdbPage> {
            unimplemented!()
        }

        fn name(&self) -> &'static str {
            "slow"
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_cards_keeps_order_and_isolates_failures() {
        let provider = Arc::new(SlowTmdb {
            finished: std::sync::Mutex::new(Vec::new()),
        });
        let client = EnrichmentClient::new(provider.clone(), "https://img.test".to_string());

        let titles = vec!["Heat", "Ronin", "Alien", "Unknown"]
            .into_iter()
            .map(String::from)
            .collect();
        let cards = client.attach_cards(titles, 4).await;

        // Lookups completed out of input order...
        let finished = provider.finished.lock().unwrap().clone();
        assert_eq!(finished, vec!["Alien", "Unknown", "Ronin", "Heat"]);

        // ...but results line up with the titles they were made for
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[0].as_ref().map(|c| c.tmdb_id), Some(949));
        assert!(cards[1].is_none());
        assert_eq!(cards[2].as_ref().map(|c| c.tmdb_id), Some(348));
        assert!(cards[3].is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_attach_cards_respects_concurrency_bound() {
        let provider = Arc::new(SlowTmdb {
            finished: std::sync::Mutex::new(Vec::new()),
        });
        let client = EnrichmentClient::new(provider.clone(), "https://img.test".to_string());

        let titles = vec!["Heat", "Alien"].into_iter().map(String::from).collect();
        let cards = client.attach_cards(titles, 1).await;

        // With a single permit Heat holds the slot until it finishes
        let finished = provider.finished.lock().unwrap().clone();
        assert_eq!(finished, vec!["Heat", "Alien"]);
        assert_eq!(cards[0].as_ref().map(|c| c.tmdb_id), Some(949));
        assert_eq!(cards[1].as_ref().map(|c| c.tmdb_id), Some(348));
    }

    #[tokio::test]
    async fn test_home_feed_limits_cards() {
        let mut mock = MockCatalogProvider::new();
        mock.expect_category_feed()
            .with(eq(FeedCategory::Trending))
            .returning(|_| Ok(page((1..=5).map(|i| movie(i, "M")).collect())));

        let cards = client(mock).home_feed(FeedCategory::Trending, 3).await.unwrap();
        assert_eq!(cards.iter().map(|c| c.tmdb_id).collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}

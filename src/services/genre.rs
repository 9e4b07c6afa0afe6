use crate::models::{MovieCard, MovieDetail};
use crate::services::enrichment::EnrichmentClient;
use crate::services::providers::EnrichmentResult;

/// Popular movies sharing the first genre of `detail`, excluding `detail` itself
///
/// Movies without genres yield an empty list without calling the provider.
pub async fn recommend_by_genre(
    client: &EnrichmentClient,
    detail: &MovieDetail,
    limit: usize,
) -> EnrichmentResult<Vec<MovieCard>> {
    let Some(genre) = detail.genres.first() else {
        return Ok(vec![]);
    };

    let page = client.discover_by_genre(genre.id, 1).await?;
    let cards: Vec<MovieCard> = client
        .cards(&page, limit)
        .into_iter()
        .filter(|card| card.tmdb_id != detail.tmdb_id)
        .collect();

    tracing::debug!(
        tmdb_id = detail.tmdb_id,
        genre = %genre.name,
        results = cards.len(),
        "Genre recommendations computed"
    );

    Ok(cards)
}

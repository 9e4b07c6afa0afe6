use crate::{
    catalog::CatalogError,
    error::{AppError, AppResult},
    models::{RecommendationBundle, RecommendationItem, ScoredTitle},
    services::{enrichment::EnrichmentClient, genre, similarity::SimilarityEngine},
};

/// Tuning knobs for one bundle request
#[derive(Debug, Clone, Copy)]
pub struct BundleLimits {
    pub tfidf_top_n: usize,
    pub genre_limit: usize,
    pub enrichment_concurrency: usize,
}

/// Builds the details + recommendations bundle for a free-text query
///
/// Only a query without any catalog match (or a failure fetching the
/// canonical record itself) fails the bundle. Similarity misses and genre
/// discovery failures degrade to empty lists, per-title enrichment failures
/// to a missing card.
pub async fn assemble(
    client: &EnrichmentClient,
    engine: &SimilarityEngine,
    query: &str,
    limits: BundleLimits,
) -> AppResult<RecommendationBundle> {
    let best = client
        .search_first(query)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No TMDB movie found for query: {}", query)))?;

    let details = client.detail(best.tmdb_id).await?;

    let recs = similar_titles(engine, &details.title, query, limits.tfidf_top_n);

    let titles = recs.iter().map(|r| r.title.clone()).collect();
    let (cards, genre_recs) = tokio::join!(
        client.attach_cards(titles, limits.enrichment_concurrency),
        genre::recommend_by_genre(client, &details, limits.genre_limit),
    );

    let genre_recommendations = genre_recs.unwrap_or_else(|e| {
        tracing::warn!(tmdb_id = details.tmdb_id, error = %e, "Genre recommendations unavailable");
        vec![]
    });

    let tfidf_recommendations: Vec<RecommendationItem> = recs
        .into_iter()
        .zip(cards)
        .map(|(rec, card)| RecommendationItem {
            title: rec.title,
            score: rec.score,
            tmdb: card,
        })
        .collect();

    tracing::info!(
        query = %query,
        tmdb_id = details.tmdb_id,
        tfidf = tfidf_recommendations.len(),
        enriched = tfidf_recommendations.iter().filter(|r| r.tmdb.is_some()).count(),
        "Recommendation bundle assembled"
    );

    Ok(RecommendationBundle {
        query: query.to_string(),
        movie_details: details,
        tfidf_recommendations,
        genre_recommendations,
    })
}

/// Neighbours of the canonical title, falling back to the raw query
///
/// Any similarity failure ends in an empty list rather than an error.
fn similar_titles(
    engine: &SimilarityEngine,
    canonical_title: &str,
    query: &str,
    top_n: usize,
) -> Vec<ScoredTitle> {
    match engine.recommend_titles(canonical_title, top_n) {
        Ok(recs) => return recs,
        Err(CatalogError::NotFound(_)) => {
            tracing::debug!(
                title = %canonical_title,
                query = %query,
                "Canonical title not in local dataset, retrying with query"
            );
        }
        Err(e) => {
            tracing::warn!(error = %e, "Similarity ranking unavailable");
            return vec![];
        }
    }

    engine.recommend_titles(query, top_n).unwrap_or_else(|e| {
        tracing::debug!(query = %query, error = %e, "No local similarity match");
        vec![]
    })
}

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{FeedCategory, MovieCard, MovieDetail, RecommendationBundle, ScoredTitle, TmdbPage};
use crate::services::bundle::{self, BundleLimits};
use crate::services::genre;

use super::AppState;

// Request types

#[derive(Debug, Deserialize)]
pub struct HomeQuery {
    pub category: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TmdbSearchQuery {
    pub query: Option<String>,
    pub page: Option<u32>,
}

#[derive(Debug, Deserialize)]
pub struct GenreQuery {
    pub tmdb_id: Option<u64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct TfidfQuery {
    pub title: Option<String>,
    pub top_n: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct BundleQuery {
    pub query: Option<String>,
    pub tfidf_top_n: Option<usize>,
    pub genre_limit: Option<usize>,
}

// Parameter validation

/// Applies `default` when absent and rejects values outside `[min, max]`
fn bounded<T>(name: &str, value: Option<T>, default: T, min: T, max: T) -> AppResult<T>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    let value = value.unwrap_or(default);
    if value < min || value > max {
        return Err(AppError::InvalidInput(format!(
            "'{}' must be between {} and {}, got {}",
            name, min, max, value
        )));
    }
    Ok(value)
}

/// Requires a parameter of at least one character; whitespace counts
fn required_text(name: &str, value: Option<String>) -> AppResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("'{}' must not be empty", name))),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Poster feed for one home category
pub async fn home_feed(
    State(state): State<AppState>,
    Query(params): Query<HomeQuery>,
) -> AppResult<Json<Vec<MovieCard>>> {
    let category: FeedCategory = params
        .category
        .as_deref()
        .unwrap_or("popular")
        .parse()
        .map_err(AppError::InvalidInput)?;
    let limit = bounded("limit", params.limit, 24, 1, 50)?;

    let cards = state.enrichment.home_feed(category, limit).await?;
    Ok(Json(cards))
}

/// Keyword search, returned in the provider's raw shape
pub async fn tmdb_search(
    State(state): State<AppState>,
    Query(params): Query<TmdbSearchQuery>,
) -> AppResult<Json<TmdbPage>> {
    let query = required_text("query", params.query)?;
    let page = bounded("page", params.page, 1, 1, 10)?;

    let results = state.enrichment.search_results(&query, page).await?;
    Ok(Json(results))
}

pub async fn movie_details(
    State(state): State<AppState>,
    Path(tmdb_id): Path<u64>,
) -> AppResult<Json<MovieDetail>> {
    let detail = state.enrichment.detail(tmdb_id).await?;
    Ok(Json(detail))
}

/// Popular movies in the first genre of `tmdb_id`
pub async fn recommend_genre(
    State(state): State<AppState>,
    Query(params): Query<GenreQuery>,
) -> AppResult<Json<Vec<MovieCard>>> {
    let tmdb_id = params
        .tmdb_id
        .ok_or_else(|| AppError::InvalidInput("'tmdb_id' is required".to_string()))?;
    let limit = bounded("limit", params.limit, 18, 1, 50)?;

    let detail = state.enrichment.detail(tmdb_id).await?;
    let cards = genre::recommend_by_genre(&state.enrichment, &detail, limit).await?;
    Ok(Json(cards))
}

/// Local TF-IDF neighbours only; a title missing from the dataset is a 404
pub async fn recommend_tfidf(
    State(state): State<AppState>,
    Query(params): Query<TfidfQuery>,
) -> AppResult<Json<Vec<ScoredTitle>>> {
    let title = required_text("title", params.title)?;
    let top_n = bounded("top_n", params.top_n, 10, 1, 50)?;

    let recs = state.similarity.recommend_titles(&title, top_n)?;
    Ok(Json(recs))
}

/// Details + TF-IDF recommendations + genre recommendations for a query
pub async fn search_bundle(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<BundleQuery>,
) -> AppResult<Json<RecommendationBundle>> {
    let query = required_text("query", params.query)?;
    let limits = BundleLimits {
        tfidf_top_n: bounded("tfidf_top_n", params.tfidf_top_n, 12, 1, 30)?,
        genre_limit: bounded("genre_limit", params.genre_limit, 12, 1, 30)?,
        enrichment_concurrency: state.enrichment_concurrency,
    };

    tracing::info!(
        request_id = %request_id,
        query = %query,
        tfidf_top_n = limits.tfidf_top_n,
        genre_limit = limits.genre_limit,
        "Processing bundle request"
    );

    let bundle = bundle::assemble(&state.enrichment, &state.similarity, &query, limits).await?;
    Ok(Json(bundle))
}

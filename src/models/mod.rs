use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub mod category;

pub use category::FeedCategory;

/// Movie summary returned to the client
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieCard {
    pub tmdb_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
}

/// Full movie attributes, including the ordered genre list
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieDetail {
    pub tmdb_id: u64,
    pub title: String,
    pub poster_url: Option<String>,
    pub release_date: Option<String>,
    pub vote_average: Option<f64>,
    pub overview: Option<String>,
    pub genres: Vec<Genre>,
    pub backdrop_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Genre {
    pub id: u64,
    pub name: String,
}

/// A locally ranked title with its optional catalog card
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationItem {
    pub title: String,
    pub score: f64,
    pub tmdb: Option<MovieCard>,
}

/// Details plus both recommendation lists for one query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RecommendationBundle {
    pub query: String,
    pub movie_details: MovieDetail,
    pub tfidf_recommendations: Vec<RecommendationItem>,
    pub genre_recommendations: Vec<MovieCard>,
}

/// Bare `{title, score}` pair returned by the TF-IDF endpoint
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredTitle {
    pub title: String,
    pub score: f64,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paginated TMDB result set (search, discover, feeds)
///
/// Unknown top-level fields are carried through untouched so the search
/// endpoint can return the provider's shape as-is.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TmdbPage {
    #[serde(default)]
    pub page: u32,
    #[serde(default)]
    pub results: Vec<TmdbMovie>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One movie entry inside a TMDB result set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TmdbMovie {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// TMDB response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Option<Vec<Genre>>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
}

/// Joins an image path onto the configured image base; empty paths yield `None`
pub fn image_url(base: &str, path: Option<&str>) -> Option<String> {
    match path {
        Some(p) if !p.is_empty() => Some(format!("{}{}", base, p)),
        _ => None,
    }
}

impl TmdbMovie {
    /// Converts to a card; `fallback_title` covers results without a title
    pub fn to_card(&self, image_base: &str, fallback_title: &str) -> MovieCard {
        MovieCard {
            tmdb_id: self.id,
            title: self
                .title
                .clone()
                .unwrap_or_else(|| fallback_title.to_string()),
            poster_url: image_url(image_base, self.poster_path.as_deref()),
            release_date: self.release_date.clone(),
            vote_average: self.vote_average,
            overview: self.overview.clone(),
        }
    }
}

impl TmdbPage {
    /// Converts the first `limit` titled results to cards
    ///
    /// Results with a missing or empty title are dropped.
    pub fn to_cards(&self, image_base: &str, limit: usize) -> Vec<MovieCard> {
        self.results
            .iter()
            .filter(|m| {
                let titled = m.title.as_deref().is_some_and(|t| !t.is_empty());
                if !titled {
                    tracing::debug!(tmdb_id = m.id, "Skipping result without a title");
                }
                titled
            })
            .take(limit)
            .map(|m| m.to_card(image_base, ""))
            .collect()
    }
}

impl TmdbMovieDetails {
    pub fn into_detail(self, image_base: &str) -> MovieDetail {
        MovieDetail {
            tmdb_id: self.id,
            poster_url: image_url(image_base, self.poster_path.as_deref()),
            backdrop_url: image_url(image_base, self.backdrop_path.as_deref()),
            title: self.title,
            release_date: self.release_date,
            vote_average: self.vote_average,
            overview: self.overview,
            genres: self.genres.unwrap_or_default(),
        }
    }
}

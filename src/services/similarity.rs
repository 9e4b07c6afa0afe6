use std::cmp::Ordering;
use std::sync::Arc;

use crate::catalog::{Catalog, CatalogError, CatalogResult, SparseMatrix};
use crate::models::ScoredTitle;

/// Content-similarity ranking over the local TF-IDF catalog
///
/// The catalog is optional so that handlers can report an uninitialized
/// index instead of panicking; in a running server it is always loaded.
#[derive(Clone, Default)]
pub struct SimilarityEngine {
    catalog: Option<Arc<Catalog>>,
}

impl SimilarityEngine {
    pub fn new(catalog: Option<Arc<Catalog>>) -> Self {
        Self { catalog }
    }

    pub fn is_loaded(&self) -> bool {
        self.catalog.is_some()
    }

    fn catalog(&self) -> CatalogResult<&Catalog> {
        self.catalog.as_deref().ok_or(CatalogError::Uninitialized)
    }

    /// Resolves a title to its matrix row
    pub fn lookup(&self, title: &str) -> CatalogResult<usize> {
        self.catalog()?.lookup(title)
    }

    /// At most `n` rows most similar to `row`, excluding `row` itself
    pub fn top_similar(&self, row: usize, n: usize) -> CatalogResult<Vec<ScoredTitle>> {
        let catalog = self.catalog()?;
        Ok(rank_similar(catalog.matrix(), catalog.titles(), row, n))
    }

    /// Looks up `title` and ranks its neighbours
    pub fn recommend_titles(&self, title: &str, n: usize) -> CatalogResult<Vec<ScoredTitle>> {
        let row = self.lookup(title)?;
        let recs = self.top_similar(row, n)?;

        tracing::debug!(title = %title, row, results = recs.len(), "Similarity ranking computed");

        Ok(recs)
    }
}

/// Ranks every row by dot product against `query_row`
///
/// Scores sort descending; equal scores keep ascending row order. The query
/// row is skipped, as is any row without a title. A zero query row scores
/// everything 0.0 and so yields the first `n` other titled rows in order.
/// A NaN score (overflowing weights) ranks below every number.
pub fn rank_similar(
    matrix: &SparseMatrix,
    titles: &[Option<String>],
    query_row: usize,
    n: usize,
) -> Vec<ScoredTitle> {
    let scores = matrix.dot_all(query_row);

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| {
        rank_key(scores[b])
            .partial_cmp(&rank_key(scores[a]))
            .unwrap_or(Ordering::Equal)
    });

    order
        .into_iter()
        .filter(|&row| row != query_row)
        .filter_map(|row| {
            let title = titles.get(row)?.as_ref()?;
            Some(ScoredTitle {
                title: title.clone(),
                score: scores[row],
            })
        })
        .take(n)
        .collect()
}

fn rank_key(score: f64) -> f64 {
    if score.is_nan() {
        f64::NEG_INFINITY
    } else {
        score
    }
}

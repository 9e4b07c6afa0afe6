use std::collections::HashMap;

use super::{CatalogError, CatalogResult};

/// Trims surrounding whitespace and case-folds a title
pub fn normalize_title(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Normalized title -> matrix row lookup
///
/// Built once from any sequence of `(title, row)` pairs. When two source
/// titles normalize to the same key, the pair seen last wins; the number of
/// such collisions is kept for diagnostics.
#[derive(Debug, Clone, Default)]
pub struct TitleIndex {
    rows: HashMap<String, usize>,
    collisions: usize,
}

impl TitleIndex {
    /// Builds the index from `(title, row)` pairs
    ///
    /// Fails with `InvalidArtifact` on a negative row offset.
    pub fn build<I, S>(pairs: I) -> CatalogResult<Self>
    where
        I: IntoIterator<Item = (S, i64)>,
        S: AsRef<str>,
    {
        let mut rows = HashMap::new();
        let mut collisions = 0;

        for (title, row) in pairs {
            let title = title.as_ref();
            let row = usize::try_from(row).map_err(|_| {
                CatalogError::InvalidArtifact(format!(
                    "negative row offset {} for title '{}'",
                    row, title
                ))
            })?;

            if rows.insert(normalize_title(title), row).is_some() {
                collisions += 1;
            }
        }

        if collisions > 0 {
            tracing::warn!(
                collisions,
                "Duplicate normalized titles in index source, last entry kept"
            );
        }

        Ok(Self { rows, collisions })
    }

    /// Resolves a title using the same normalization as `build`
    pub fn lookup(&self, title: &str) -> CatalogResult<usize> {
        self.rows
            .get(&normalize_title(title))
            .copied()
            .ok_or_else(|| CatalogError::NotFound(title.to_string()))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn collisions(&self) -> usize {
        self.collisions
    }

    /// Largest row offset referenced by the index
    pub fn max_row(&self) -> Option<usize> {
        self.rows.values().copied().max()
    }
}

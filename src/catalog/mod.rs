//! Local similarity catalog
//!
//! Holds the artifacts loaded once at startup: the normalized title index,
//! the TF-IDF matrix, and the title column mapping rows back to titles.
//! A `Catalog` is validated on construction and never mutated afterwards, so
//! it is shared across requests behind an `Arc` without locking.

use std::path::PathBuf;

pub mod artifacts;
pub mod matrix;
pub mod title_index;

pub use matrix::SparseMatrix;
pub use title_index::{normalize_title, TitleIndex};

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("Invalid artifact: {0}")]
    InvalidArtifact(String),

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Title not found: '{0}'")]
    NotFound(String),

    #[error("Similarity resources not loaded")]
    Uninitialized,
}

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Immutable, validated similarity artifacts
#[derive(Debug)]
pub struct Catalog {
    index: TitleIndex,
    matrix: SparseMatrix,
    titles: Vec<Option<String>>,
}

impl Catalog {
    /// Validates the artifacts against each other
    ///
    /// The title column must be non-empty and have one entry per matrix row,
    /// and every index offset must address an existing row.
    pub fn new(
        index: TitleIndex,
        matrix: SparseMatrix,
        titles: Vec<Option<String>>,
    ) -> CatalogResult<Self> {
        if titles.is_empty() {
            return Err(CatalogError::InvalidArtifact(
                "title column is empty".to_string(),
            ));
        }

        if titles.len() != matrix.rows() {
            return Err(CatalogError::InvalidArtifact(format!(
                "title column has {} rows but matrix has {}",
                titles.len(),
                matrix.rows()
            )));
        }

        if let Some(max_row) = index.max_row() {
            if max_row >= matrix.rows() {
                return Err(CatalogError::InvalidArtifact(format!(
                    "index offset {} out of range for {} rows",
                    max_row,
                    matrix.rows()
                )));
            }
        }

        Ok(Self {
            index,
            matrix,
            titles,
        })
    }

    pub fn index(&self) -> &TitleIndex {
        &self.index
    }

    pub fn matrix(&self) -> &SparseMatrix {
        &self.matrix
    }

    pub fn titles(&self) -> &[Option<String>] {
        &self.titles
    }

    /// Resolves a free-text title to its matrix row
    pub fn lookup(&self, title: &str) -> CatalogResult<usize> {
        self.index.lookup(title)
    }
}

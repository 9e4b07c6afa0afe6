use serde::Deserialize;

use super::{CatalogError, CatalogResult};

/// Row-compressed sparse matrix of pre-normalized TF-IDF rows
///
/// Rows are L2-normalized upstream, so the dot product of two rows is their
/// cosine similarity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "CsrParts")]
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

/// On-disk CSR layout (`shape`, `indptr`, `indices`, `data`)
#[derive(Debug, Deserialize)]
struct CsrParts {
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<f64>,
}

impl TryFrom<CsrParts> for SparseMatrix {
    type Error = CatalogError;

    fn try_from(parts: CsrParts) -> CatalogResult<Self> {
        SparseMatrix::from_csr(
            parts.shape.0,
            parts.shape.1,
            parts.indptr,
            parts.indices,
            parts.data,
        )
    }
}

impl SparseMatrix {
    /// Builds a matrix from raw CSR arrays, validating their structure
    pub fn from_csr(
        rows: usize,
        cols: usize,
        indptr: Vec<usize>,
        indices: Vec<usize>,
        data: Vec<f64>,
    ) -> CatalogResult<Self> {
        if indptr.len() != rows + 1 {
            return Err(CatalogError::InvalidArtifact(format!(
                "indptr has {} entries, expected {}",
                indptr.len(),
                rows + 1
            )));
        }
        if indptr[0] != 0 || indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(CatalogError::InvalidArtifact(
                "indptr must start at 0 and be non-decreasing".to_string(),
            ));
        }
        if indices.len() != data.len() || indptr[rows] != data.len() {
            return Err(CatalogError::InvalidArtifact(format!(
                "nnz mismatch: indptr ends at {}, {} indices, {} values",
                indptr[rows],
                indices.len(),
                data.len()
            )));
        }
        if let Some(col) = indices.iter().find(|&&c| c >= cols) {
            return Err(CatalogError::InvalidArtifact(format!(
                "column index {} out of range for {} columns",
                col, cols
            )));
        }
        if let Some(value) = data.iter().find(|v| !v.is_finite()) {
            return Err(CatalogError::InvalidArtifact(format!(
                "matrix holds non-finite value {}",
                value
            )));
        }

        Ok(Self {
            rows,
            cols,
            indptr,
            indices,
            data,
        })
    }

    /// Builds a matrix from dense rows, dropping zeros
    pub fn from_dense(dense: &[Vec<f64>]) -> Self {
        let cols = dense.iter().map(Vec::len).max().unwrap_or(0);
        let mut indptr = Vec::with_capacity(dense.len() + 1);
        let mut indices = Vec::new();
        let mut data = Vec::new();

        indptr.push(0);
        for row in dense {
            for (col, &value) in row.iter().enumerate() {
                if value != 0.0 {
                    indices.push(col);
                    data.push(value);
                }
            }
            indptr.push(data.len());
        }

        Self {
            rows: dense.len(),
            cols,
            indptr,
            indices,
            data,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn nnz(&self) -> usize {
        self.data.len()
    }

    /// Non-zero `(column, value)` entries of one row
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let (start, end) = if row < self.rows {
            (self.indptr[row], self.indptr[row + 1])
        } else {
            (0, 0)
        };
        self.indices[start..end]
            .iter()
            .copied()
            .zip(self.data[start..end].iter().copied())
    }

    /// Dot product of `row` against every row, i.e. `M · M[row]ᵀ`
    pub fn dot_all(&self, row: usize) -> Vec<f64> {
        let mut query = vec![0.0; self.cols];
        for (col, value) in self.row(row) {
            query[col] = value;
        }

        (0..self.rows)
            .map(|r| self.row(r).map(|(col, value)| value * query[col]).sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_dense_drops_zeros() {
        let m = SparseMatrix::from_dense(&[vec![1.0, 0.0], vec![0.0, 0.0], vec![0.5, 0.5]]);
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.nnz(), 3);
        assert_eq!(m.row(1).count(), 0);
        assert_eq!(m.row(2).collect::<Vec<_>>(), vec![(0, 0.5), (1, 0.5)]);
    }

    #[test]
    fn test_dot_all() {
        let m = SparseMatrix::from_dense(&[vec![1.0, 0.0], vec![0.6, 0.8], vec![0.0, 1.0]]);
        let scores = m.dot_all(1);
        assert!((scores[0] - 0.6).abs() < 1e-9);
        assert!((scores[1] - 1.0).abs() < 1e-9);
        assert!((scores[2] - 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_deserialize_csr() {
        let json = r#"{
            "shape": [2, 3],
            "indptr": [0, 1, 3],
            "indices": [2, 0, 1],
            "data": [1.0, 0.6, 0.8]
        }"#;

        let m: SparseMatrix = serde_json::from_str(json).unwrap();
        assert_eq!(m.rows(), 2);
        assert_eq!(m.cols(), 3);
        assert_eq!(m.row(0).collect::<Vec<_>>(), vec![(2, 1.0)]);
    }

    #[test]
    fn test_from_csr_rejects_bad_indptr() {
        let result = SparseMatrix::from_csr(2, 2, vec![0, 1], vec![0], vec![1.0]);
        assert!(matches!(result, Err(CatalogError::InvalidArtifact(_))));

        let result = SparseMatrix::from_csr(2, 2, vec![0, 2, 1], vec![0, 1], vec![1.0, 1.0]);
        assert!(matches!(result, Err(CatalogError::InvalidArtifact(_))));
    }

    #[test]
    fn test_from_csr_rejects_column_out_of_range() {
        let result = SparseMatrix::from_csr(1, 2, vec![0, 1], vec![2], vec![1.0]);
        assert!(matches!(result, Err(CatalogError::InvalidArtifact(msg)) if msg.contains("column")));
    }

    #[test]
    fn test_from_csr_rejects_nnz_mismatch() {
        let result = SparseMatrix::from_csr(1, 2, vec![0, 2], vec![0, 1], vec![1.0]);
        assert!(result.is_err());
    }

    #[test]
    fn test_from_csr_rejects_non_finite_values() {
        for bad in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let result = SparseMatrix::from_csr(1, 2, vec![0, 2], vec![0, 1], vec![1.0, bad]);
            assert!(
                matches!(result, Err(CatalogError::InvalidArtifact(ref msg)) if msg.contains("non-finite")),
                "{}",
                bad
            );
        }
    }
}

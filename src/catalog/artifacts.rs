use serde::de::{DeserializeOwned, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::fs;
use std::path::Path;

use super::{Catalog, CatalogError, CatalogResult, SparseMatrix, TitleIndex};

/// Entries of a JSON object in file order, duplicate keys included
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedPairs(pub Vec<(String, i64)>);

impl<'de> Deserialize<'de> for OrderedPairs {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PairsVisitor;

        impl<'de> Visitor<'de> for PairsVisitor {
            type Value = OrderedPairs;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object mapping titles to row numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut pairs = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(pair) = map.next_entry::<String, i64>()? {
                    pairs.push(pair);
                }
                Ok(OrderedPairs(pairs))
            }
        }

        deserializer.deserialize_map(PairsVisitor)
    }
}

/// Accepted shapes of the title -> row artifact
///
/// Each shape is flattened to `(title, row)` pairs before the index is built.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum IndexSource {
    /// `{"Title": 0, ...}`
    Mapping(OrderedPairs),
    /// `[["Title", 0], ...]`
    Pairs(Vec<(String, i64)>),
    /// Series in split orient: `{"index": ["Title", ...], "data": [0, ...]}`
    Series { index: Vec<String>, data: Vec<i64> },
}

impl IndexSource {
    pub fn into_pairs(self) -> CatalogResult<Vec<(String, i64)>> {
        match self {
            IndexSource::Mapping(OrderedPairs(pairs)) => Ok(pairs),
            IndexSource::Pairs(pairs) => Ok(pairs),
            IndexSource::Series { index, data } => {
                if index.len() != data.len() {
                    return Err(CatalogError::InvalidArtifact(format!(
                        "series has {} labels but {} values",
                        index.len(),
                        data.len()
                    )));
                }
                Ok(index.into_iter().zip(data).collect())
            }
        }
    }

    /// Parses any accepted shape from JSON
    pub fn from_json(raw: &str) -> CatalogResult<Self> {
        serde_json::from_str(raw).map_err(|_| {
            CatalogError::InvalidArtifact(
                "index must be a title->row object, a list of [title, row] pairs, \
                 or a series with 'index' and 'data'"
                    .to_string(),
            )
        })
    }
}

fn read_to_string(path: &Path) -> CatalogResult<String> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_json<T: DeserializeOwned>(path: &Path) -> CatalogResult<T> {
    let raw = read_to_string(path)?;
    serde_json::from_str(&raw).map_err(|source| CatalogError::Json {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_index(path: &Path) -> CatalogResult<TitleIndex> {
    let raw = read_to_string(path)?;
    let pairs = IndexSource::from_json(&raw)?.into_pairs()?;
    TitleIndex::build(pairs)
}

pub fn load_matrix(path: &Path) -> CatalogResult<SparseMatrix> {
    read_json(path)
}

pub fn load_titles(path: &Path) -> CatalogResult<Vec<Option<String>>> {
    read_json(path)
}

impl Catalog {
    /// Loads and cross-validates all three artifacts
    pub fn load(indices_path: &Path, matrix_path: &Path, titles_path: &Path) -> CatalogResult<Self> {
        let index = load_index(indices_path)?;
        let matrix = load_matrix(matrix_path)?;
        let titles = load_titles(titles_path)?;

        let catalog = Catalog::new(index, matrix, titles)?;

        tracing::info!(
            rows = catalog.matrix().rows(),
            cols = catalog.matrix().cols(),
            nnz = catalog.matrix().nnz(),
            indexed_titles = catalog.index().len(),
            "Similarity catalog loaded"
        );

        Ok(catalog)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(name: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "reelmatch-{}-{}",
                name,
                uuid::Uuid::new_v4()
            ));
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }

        fn write(&self, file: &str, contents: &str) -> PathBuf {
            let path = self.0.join(file);
            fs::write(&path, contents).unwrap();
            path
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn test_index_source_shapes_agree() {
        let mapping = IndexSource::from_json(r#"{"Heat": 0, "Alien": 1}"#).unwrap();
        let pairs = IndexSource::from_json(r#"[["Heat", 0], ["Alien", 1]]"#).unwrap();
        let series =
            IndexSource::from_json(r#"{"name": null, "index": ["Heat", "Alien"], "data": [0, 1]}"#)
                .unwrap();

        assert!(matches!(mapping, IndexSource::Mapping(_)));
        assert!(matches!(pairs, IndexSource::Pairs(_)));
        assert!(matches!(series, IndexSource::Series { .. }));

        let indexes: Vec<TitleIndex> = [mapping, pairs, series]
            .into_iter()
            .map(|s| TitleIndex::build(s.into_pairs().unwrap()).unwrap())
            .collect();

        for title in ["heat", "ALIEN"] {
            let rows: Vec<usize> = indexes.iter().map(|i| i.lookup(title).unwrap()).collect();
            assert!(rows.windows(2).all(|w| w[0] == w[1]));
        }
    }

    #[test]
    fn test_mapping_duplicates_follow_file_order() {
        // Sorted by key, "heat " would come after "Heat" and win instead
        let source = IndexSource::from_json(r#"{"heat ": 7, "Heat": 3}"#).unwrap();
        let pairs = source.into_pairs().unwrap();
        assert_eq!(pairs, vec![("heat ".to_string(), 7), ("Heat".to_string(), 3)]);

        let index = TitleIndex::build(pairs).unwrap();
        assert_eq!(index.lookup("HEAT").unwrap(), 3);
        assert_eq!(index.collisions(), 1);
    }

    #[test]
    fn test_index_source_rejects_unknown_shape() {
        for raw in [r#""just a string""#, r#"[1, 2, 3]"#, r#"{"Heat": "zero"}"#] {
            let result = IndexSource::from_json(raw);
            assert!(matches!(result, Err(CatalogError::InvalidArtifact(_))), "{}", raw);
        }
    }

    #[test]
    fn test_series_length_mismatch() {
        let source = IndexSource::Series {
            index: vec!["Heat".to_string()],
            data: vec![0, 1],
        };
        assert!(source.into_pairs().is_err());
    }

    #[test]
    fn test_load_catalog_from_files() {
        let dir = TempDir::new("load");
        let indices = dir.write("indices.json", r#"[["Heat", 0], ["Alien", 1], ["Ronin", 2]]"#);
        let matrix = dir.write(
            "matrix.json",
            r#"{"shape": [3, 2], "indptr": [0, 1, 2, 4], "indices": [0, 1, 0, 1], "data": [1.0, 1.0, 0.6, 0.8]}"#,
        );
        let titles = dir.write("titles.json", r#"["Heat", "Alien", null]"#);

        let catalog = Catalog::load(&indices, &matrix, &titles).unwrap();
        assert_eq!(catalog.lookup("ronin").unwrap(), 2);
        assert_eq!(catalog.titles()[2], None);
    }

    #[test]
    fn test_sample_data_loads() {
        let data = Path::new(env!("CARGO_MANIFEST_DIR")).join("data");
        let catalog = Catalog::load(
            &data.join("indices.json"),
            &data.join("tfidf_matrix.json"),
            &data.join("titles.json"),
        )
        .unwrap();

        assert_eq!(catalog.matrix().rows(), 5);
        assert_eq!(catalog.lookup("avatar").unwrap(), 0);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = TempDir::new("missing");
        let missing = dir.0.join("nope.json");
        let result = load_titles(&missing);
        assert!(matches!(result, Err(CatalogError::Io { .. })));
    }

    #[test]
    fn test_load_rejects_mismatched_rows() {
        let dir = TempDir::new("mismatch");
        let indices = dir.write("indices.json", r#"{"Heat": 0}"#);
        let matrix = dir.write(
            "matrix.json",
            r#"{"shape": [2, 1], "indptr": [0, 1, 2], "indices": [0, 0], "data": [1.0, 1.0]}"#,
        );
        let titles = dir.write("titles.json", r#"["Heat"]"#);

        let result = Catalog::load(&indices, &matrix, &titles);
        assert!(matches!(result, Err(CatalogError::InvalidArtifact(_))));
    }
}

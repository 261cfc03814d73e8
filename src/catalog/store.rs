use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::CatalogMovie;

/// Errors from catalog construction, lookups, and artifact loading
#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("movie title not found: {0}")]
    TitleNotFound(String),

    #[error("row {row} out of range ({rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },

    #[error("malformed embedding matrix: {0}")]
    Shape(String),

    #[error("catalog artifacts disagree: {0}")]
    Misaligned(String),

    #[error("artifact io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("artifact decode failed: {0}")]
    Decode(String),

    #[error("artifact encode failed: {0}")]
    Encode(String),
}

/// Dense row-major `[N, D]` matrix of f32 embeddings, one row per movie.
///
/// Immutable after load; rows are aligned with catalog entries by index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingMatrix {
    rows: usize,
    dim: usize,
    data: Vec<f32>,
}

impl EmbeddingMatrix {
    pub fn new(rows: usize, dim: usize, data: Vec<f32>) -> Result<Self, CatalogError> {
        if rows > 0 && dim == 0 {
            return Err(CatalogError::Shape(format!(
                "{} rows with zero dimensionality",
                rows
            )));
        }
        if data.len() != rows * dim {
            return Err(CatalogError::Shape(format!(
                "{} values cannot fill {} rows of {} dims",
                data.len(),
                rows,
                dim
            )));
        }

        Ok(EmbeddingMatrix { rows, dim, data })
    }

    /// Build a matrix from per-movie vectors, checking they share one
    /// dimensionality.
    pub fn from_rows(vectors: Vec<Vec<f32>>) -> Result<Self, CatalogError> {
        let rows = vectors.len();
        let dim = vectors.first().map_or(0, |v| v.len());

        let mut data = Vec::with_capacity(rows * dim);
        for (row, vector) in vectors.iter().enumerate() {
            if vector.len() != dim {
                return Err(CatalogError::Shape(format!(
                    "row {} has {} values, expected {}",
                    row,
                    vector.len(),
                    dim
                )));
            }
            data.extend_from_slice(vector);
        }

        EmbeddingMatrix::new(rows, dim, data)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Integrity check for deserialized artifacts, which bypass `new`.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.rows > 0 && self.dim == 0 {
            return Err(CatalogError::Shape(format!(
                "{} rows with zero dimensionality",
                self.rows
            )));
        }
        if self.data.len() != self.rows * self.dim {
            return Err(CatalogError::Shape(format!(
                "{} values cannot fill {} rows of {} dims",
                self.data.len(),
                self.rows,
                self.dim
            )));
        }
        Ok(())
    }

    /// Embedding stored at `row`.
    pub fn row(&self, row: usize) -> Result<&[f32], CatalogError> {
        if row >= self.rows {
            return Err(CatalogError::RowOutOfRange {
                row,
                rows: self.rows,
            });
        }
        Ok(&self.data[row * self.dim..(row + 1) * self.dim])
    }
}

/// Read-only view over the movie catalog and its embeddings.
///
/// Construction checks the row bijection between the title/id table and the
/// matrix; afterwards every lookup is a pure read, so the store is shared
/// across requests without locking.
#[derive(Debug, Clone)]
pub struct MovieCatalog {
    movies: Vec<CatalogMovie>,
    embeddings: EmbeddingMatrix,
    by_title: HashMap<String, usize>,
}

impl MovieCatalog {
    pub fn new(
        movies: Vec<CatalogMovie>,
        embeddings: EmbeddingMatrix,
    ) -> Result<Self, CatalogError> {
        if movies.len() != embeddings.rows() {
            return Err(CatalogError::Misaligned(format!(
                "{} catalog entries but {} embedding rows",
                movies.len(),
                embeddings.rows()
            )));
        }

        // Duplicate titles resolve to the first row.
        let mut by_title = HashMap::with_capacity(movies.len());
        for (row, movie) in movies.iter().enumerate() {
            by_title.entry(movie.title.clone()).or_insert(row);
        }

        Ok(MovieCatalog {
            movies,
            embeddings,
            by_title,
        })
    }

    /// Row index for a title.
    pub fn resolve(&self, title: &str) -> Result<usize, CatalogError> {
        self.by_title
            .get(title)
            .copied()
            .ok_or_else(|| CatalogError::TitleNotFound(title.to_string()))
    }

    /// Embedding vector stored at a row.
    pub fn vector(&self, row: usize) -> Result<&[f32], CatalogError> {
        self.embeddings.row(row)
    }

    /// Catalog entry stored at a row.
    pub fn movie(&self, row: usize) -> Result<&CatalogMovie, CatalogError> {
        self.movies.get(row).ok_or(CatalogError::RowOutOfRange {
            row,
            rows: self.movies.len(),
        })
    }

    /// All entries in row order.
    pub fn movies(&self) -> &[CatalogMovie] {
        &self.movies
    }

    pub fn embeddings(&self) -> &EmbeddingMatrix {
        &self.embeddings
    }

    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u64, title: &str) -> CatalogMovie {
        CatalogMovie {
            id,
            title: title.to_string(),
        }
    }

    fn sample_catalog() -> MovieCatalog {
        let movies = vec![entry(1, "Inception"), entry(2, "Heat"), entry(3, "Alien")];
        let embeddings = EmbeddingMatrix::from_rows(vec![
            vec![1.0, 0.0],
            vec![0.5, 0.5],
            vec![0.0, 1.0],
        ])
        .unwrap();
        MovieCatalog::new(movies, embeddings).unwrap()
    }

    #[test]
    fn test_resolve_known_title() {
        let catalog = sample_catalog();
        assert_eq!(catalog.resolve("Heat").unwrap(), 1);
    }

    #[test]
    fn test_resolve_unknown_title() {
        let catalog = sample_catalog();
        let err = catalog.resolve("NoSuchMovie123").unwrap_err();
        assert!(matches!(err, CatalogError::TitleNotFound(_)));
    }

    #[test]
    fn test_duplicate_titles_resolve_to_first_row() {
        let movies = vec![entry(1, "Solaris"), entry(2, "Solaris")];
        let embeddings =
            EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        let catalog = MovieCatalog::new(movies, embeddings).unwrap();

        assert_eq!(catalog.resolve("Solaris").unwrap(), 0);
    }

    #[test]
    fn test_vector_returns_stored_row() {
        let catalog = sample_catalog();
        assert_eq!(catalog.vector(1).unwrap(), &[0.5, 0.5]);
    }

    #[test]
    fn test_vector_out_of_range() {
        let catalog = sample_catalog();
        let err = catalog.vector(3).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::RowOutOfRange { row: 3, rows: 3 }
        ));
    }

    #[test]
    fn test_movie_accessor_matches_row_order() {
        let catalog = sample_catalog();
        assert_eq!(catalog.movie(2).unwrap().title, "Alien");
        assert!(catalog.movie(99).is_err());
    }

    #[test]
    fn test_new_rejects_row_count_mismatch() {
        let movies = vec![entry(1, "Inception")];
        let embeddings =
            EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0, 1.0]]).unwrap();
        assert!(matches!(
            MovieCatalog::new(movies, embeddings),
            Err(CatalogError::Misaligned(_))
        ));
    }

    #[test]
    fn test_from_rows_rejects_ragged_vectors() {
        let result = EmbeddingMatrix::from_rows(vec![vec![1.0, 0.0], vec![0.0]]);
        assert!(matches!(result, Err(CatalogError::Shape(_))));
    }

    #[test]
    fn test_matrix_new_rejects_bad_length() {
        assert!(matches!(
            EmbeddingMatrix::new(2, 3, vec![0.0; 5]),
            Err(CatalogError::Shape(_))
        ));
    }
}

//! Persisted catalog artifacts.
//!
//! Three files produced offline and read once at startup: the title/id table
//! (JSON array in row order), the embedding matrix (bincode), and the
//! prebuilt similarity index (bincode). Loading cross-checks row counts and
//! dimensionality so a stale or mixed set of artifacts fails fast instead of
//! serving misaligned recommendations.

use std::fs;
use std::path::Path;

use crate::index::SimilarityIndex;
use crate::models::CatalogMovie;

use super::store::{CatalogError, EmbeddingMatrix, MovieCatalog};

/// Everything the serving process needs, loaded and cross-validated.
#[derive(Debug)]
pub struct CatalogBundle {
    pub catalog: MovieCatalog,
    pub index: SimilarityIndex,
}

/// Load the title/id table: a JSON array of `{id, title}` in row order.
pub fn load_movies(path: impl AsRef<Path>) -> Result<Vec<CatalogMovie>, CatalogError> {
    let bytes = fs::read(path)?;
    serde_json::from_slice(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))
}

pub fn save_movies(path: impl AsRef<Path>, movies: &[CatalogMovie]) -> Result<(), CatalogError> {
    let json =
        serde_json::to_vec_pretty(movies).map_err(|e| CatalogError::Encode(e.to_string()))?;
    fs::write(path, json)?;
    Ok(())
}

/// Load the dense `[N, D]` embedding matrix.
pub fn load_embeddings(path: impl AsRef<Path>) -> Result<EmbeddingMatrix, CatalogError> {
    let bytes = fs::read(path)?;
    let matrix: EmbeddingMatrix =
        bincode::deserialize(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))?;
    matrix.validate()?;
    Ok(matrix)
}

pub fn save_embeddings(
    path: impl AsRef<Path>,
    matrix: &EmbeddingMatrix,
) -> Result<(), CatalogError> {
    let bytes = bincode::serialize(matrix).map_err(|e| CatalogError::Encode(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load the prebuilt similarity index.
pub fn load_index(path: impl AsRef<Path>) -> Result<SimilarityIndex, CatalogError> {
    let bytes = fs::read(path)?;
    let index: SimilarityIndex =
        bincode::deserialize(&bytes).map_err(|e| CatalogError::Decode(e.to_string()))?;
    index
        .validate()
        .map_err(|e| CatalogError::Decode(e.to_string()))?;
    Ok(index)
}

pub fn save_index(path: impl AsRef<Path>, index: &SimilarityIndex) -> Result<(), CatalogError> {
    let bytes = bincode::serialize(index).map_err(|e| CatalogError::Encode(e.to_string()))?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Load and cross-validate all three artifacts.
pub fn load_bundle(
    catalog_path: impl AsRef<Path>,
    embeddings_path: impl AsRef<Path>,
    index_path: impl AsRef<Path>,
) -> Result<CatalogBundle, CatalogError> {
    let movies = load_movies(catalog_path)?;
    let embeddings = load_embeddings(embeddings_path)?;
    let index = load_index(index_path)?;

    if index.len() != embeddings.rows() {
        return Err(CatalogError::Misaligned(format!(
            "index has {} rows but embedding matrix has {}",
            index.len(),
            embeddings.rows()
        )));
    }
    if index.dimension() != embeddings.dim() {
        return Err(CatalogError::Misaligned(format!(
            "index dimensionality {} but embedding matrix {}",
            index.dimension(),
            embeddings.dim()
        )));
    }

    let catalog = MovieCatalog::new(movies, embeddings)?;

    tracing::info!(
        movies = catalog.len(),
        dimensions = catalog.embeddings().dim(),
        "Catalog artifacts loaded"
    );

    Ok(CatalogBundle { catalog, index })
}

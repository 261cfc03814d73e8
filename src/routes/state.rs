use std::sync::Arc;

use crate::{
    catalog::MovieCatalog,
    index::SimilarityIndex,
    services::{metadata::MetadataProvider, posters::PosterResolver},
};

/// Shared application state.
///
/// Everything here is built once at startup and read-only afterwards, so
/// handlers share it through plain `Arc`s with no locking.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<MovieCatalog>,
    pub index: Arc<SimilarityIndex>,
    pub metadata: Arc<dyn MetadataProvider>,
    pub posters: Arc<PosterResolver>,
    /// Result count used when a request does not name one
    pub default_k: usize,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub mod session;

/// One catalog entry: a movie's stable external id and its display title.
///
/// The entry's position in the catalog sequence is its row index into the
/// embedding matrix; the artifact stores entries in row order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogMovie {
    /// Externally assigned id (TMDB)
    pub id: u64,
    pub title: String,
}

/// A single recommendation returned to the client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendedMovie {
    pub id: u64,
    pub title: String,
    /// Cosine similarity to the query movie
    pub score: f32,
    /// Displayable poster reference (`data:` URI; placeholder when
    /// metadata or image fetch failed)
    pub poster: String,
}

// ============================================================================
// TMDB API Types
// ============================================================================

/// Raw movie details response from GET /movie/{id}
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbMovieDetails {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,
}

/// Metadata kept for a movie after a successful lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovieMetadata {
    pub id: u64,
    pub title: String,
    pub poster_path: Option<String>,
    pub overview: Option<String>,
    pub fetched_at: DateTime<Utc>,
}

impl From<TmdbMovieDetails> for MovieMetadata {
    fn from(details: TmdbMovieDetails) -> Self {
        MovieMetadata {
            id: details.id,
            title: details.title,
            poster_path: details.poster_path,
            overview: details.overview,
            fetched_at: Utc::now(),
        }
    }
}

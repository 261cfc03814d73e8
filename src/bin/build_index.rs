//! Offline index builder.
//!
//! Reads the embedding matrix artifact, builds the similarity index, and
//! writes the index artifact next to it. Run once whenever the catalog or
//! embeddings change; the server only ever loads the prebuilt result.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use cinematch_api::{catalog, config::Config, index::SimilarityIndex};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let movies = catalog::artifacts::load_movies(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog from {}", config.catalog_path))?;
    let matrix = catalog::artifacts::load_embeddings(&config.embeddings_path)
        .with_context(|| format!("Failed to load embeddings from {}", config.embeddings_path))?;

    if movies.len() != matrix.rows() {
        anyhow::bail!(
            "catalog has {} movies but embedding matrix has {} rows",
            movies.len(),
            matrix.rows()
        );
    }

    let index = SimilarityIndex::build(&matrix);
    catalog::artifacts::save_index(&config.index_path, &index)
        .with_context(|| format!("Failed to write index to {}", config.index_path))?;

    tracing::info!(
        movies = movies.len(),
        dimensions = matrix.dim(),
        path = %config.index_path,
        "Similarity index built"
    );
    Ok(())
}

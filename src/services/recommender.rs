/// Recommendation assembly
///
/// Orchestrates title resolution, the similarity query, self-exclusion, and
/// per-result metadata/poster lookups. Ranking is a pure read over shared
/// immutable state; only the poster step suspends on I/O.
use crate::{
    catalog::MovieCatalog,
    error::{AppError, AppResult},
    index::SimilarityIndex,
    models::RecommendedMovie,
    services::{metadata::MetadataProvider, posters::PosterResolver},
};
use std::sync::Arc;

/// Recommend the `k` movies most similar to `title`.
///
/// Returns exactly `min(k, N-1)` results ordered by descending similarity,
/// never including the query movie itself. An unknown title is an error; a
/// metadata or poster failure for an individual result degrades that entry
/// to the placeholder poster without disturbing its rank.
pub async fn recommend(
    catalog: Arc<MovieCatalog>,
    index: Arc<SimilarityIndex>,
    metadata: Arc<dyn MetadataProvider>,
    posters: Arc<PosterResolver>,
    title: &str,
    k: usize,
) -> AppResult<Vec<RecommendedMovie>> {
    if k == 0 {
        return Err(AppError::InvalidInput(
            "Recommendation count must be at least 1".to_string(),
        ));
    }

    let query_row = catalog.resolve(title)?;
    let query_vector = catalog.vector(query_row)?;

    // The query movie is itself an index row, so ask for one extra neighbor
    // and drop its own row from the hits. Only the exact row is excluded;
    // other movies with identical vectors stay eligible.
    let query_k = (k + 1).min(index.len());
    let neighbors = index.query(query_vector, query_k)?;

    let ranked: Vec<_> = neighbors
        .into_iter()
        .filter(|n| n.row != query_row)
        .take(k)
        .collect();

    // One lookup task per result, collected in rank order so parallel I/O
    // cannot reorder the sequence.
    let mut tasks = Vec::with_capacity(ranked.len());
    for neighbor in &ranked {
        let movie = catalog.movie(neighbor.row)?.clone();
        let score = neighbor.score;
        let metadata = Arc::clone(&metadata);
        let posters = Arc::clone(&posters);

        tasks.push(tokio::spawn(async move {
            let poster_path = match metadata.movie_details(movie.id).await {
                Ok(details) => details.poster_path,
                Err(e) => {
                    tracing::warn!(
                        movie_id = movie.id,
                        error = %e,
                        "Metadata lookup failed, degrading to placeholder"
                    );
                    None
                }
            };
            let poster = posters.data_uri(poster_path.as_deref()).await;

            RecommendedMovie {
                id: movie.id,
                title: movie.title,
                score,
                poster,
            }
        }));
    }

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        match task.await {
            Ok(movie) => results.push(movie),
            Err(e) => {
                tracing::error!(error = %e, "Task join error");
                return Err(AppError::Internal(e.to_string()));
            }
        }
    }

    tracing::info!(
        title = %title,
        requested = k,
        returned = results.len(),
        "Recommendations assembled"
    );

    Ok(results)
}

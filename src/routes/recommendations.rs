use axum::{
    extract::{Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult, middleware::RequestId, models::RecommendedMovie, services::recommender,
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct RecommendationQuery {
    pub title: String,
    pub k: Option<usize>,
}

/// Handler for the recommendations endpoint
pub async fn recommend(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(params): Query<RecommendationQuery>,
) -> AppResult<Json<Vec<RecommendedMovie>>> {
    let k = params.k.unwrap_or(state.default_k);

    tracing::info!(
        request_id = %request_id,
        title = %params.title,
        k,
        "Recommendation request"
    );

    let results = recommender::recommend(
        Arc::clone(&state.catalog),
        Arc::clone(&state.index),
        Arc::clone(&state.metadata),
        Arc::clone(&state.posters),
        &params.title,
        k,
    )
    .await?;

    Ok(Json(results))
}

use axum::{extract::State, Json};

use crate::models::CatalogMovie;

use super::AppState;

/// Handler for the catalog listing endpoint
///
/// Returns every movie in row order; clients populate their title pickers
/// from this.
pub async fn list(State(state): State<AppState>) -> Json<Vec<CatalogMovie>> {
    Json(state.catalog.movies().to_vec())
}

use axum::{extract::State, Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::{
    error::AppResult,
    middleware::RequestId,
    models::session::{BrowseAction, BrowseSession},
    services::session::{self, InteractionOutcome},
};

use super::AppState;

#[derive(Debug, Deserialize)]
pub struct InteractionRequest {
    /// Current session state; a missing value means a fresh session
    #[serde(default)]
    pub session: BrowseSession,
    pub action: BrowseAction,
}

/// Handler for the interactions endpoint
///
/// Applies one user action to the client-owned session and returns the
/// updated session together with any new recommendations to render.
pub async fn interact(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(request): Json<InteractionRequest>,
) -> AppResult<Json<InteractionOutcome>> {
    tracing::info!(
        request_id = %request_id,
        action = ?request.action,
        depth = request.session.history.len(),
        "Interaction request"
    );

    let outcome = session::apply(
        Arc::clone(&state.catalog),
        Arc::clone(&state.index),
        Arc::clone(&state.metadata),
        Arc::clone(&state.posters),
        state.default_k,
        request.session,
        request.action,
    )
    .await?;

    Ok(Json(outcome))
}

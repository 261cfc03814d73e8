/// Browse-session state machine
///
/// The interactive client's navigation bookkeeping (history stack, click
/// lock, duplicate-click guard) expressed as a pure transition over a
/// client-owned `BrowseSession`. The server holds nothing between calls:
/// every outcome carries the updated session back to the client, which
/// returns it with its next action.
use crate::{
    catalog::MovieCatalog,
    error::{AppError, AppResult},
    index::SimilarityIndex,
    models::{
        session::{BrowseAction, BrowseSession},
        RecommendedMovie,
    },
    services::{metadata::MetadataProvider, posters::PosterResolver, recommender},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Result of applying one action to a session.
///
/// `recommendations` is `None` when the view is unchanged (an ignored click,
/// a settle) and `Some` when the client should re-render — including the
/// empty list that means "back at home, show nothing".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InteractionOutcome {
    pub session: BrowseSession,
    pub recommendations: Option<Vec<RecommendedMovie>>,
}

/// Apply one user action to a browse session.
///
/// Recommendation errors (unknown title, bad input) propagate before the
/// session is touched, so a failed action leaves the client's state exactly
/// as it was.
pub async fn apply(
    catalog: Arc<MovieCatalog>,
    index: Arc<SimilarityIndex>,
    metadata: Arc<dyn MetadataProvider>,
    posters: Arc<PosterResolver>,
    k: usize,
    mut session: BrowseSession,
    action: BrowseAction,
) -> AppResult<InteractionOutcome> {
    match action {
        BrowseAction::Select { title } => {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::InvalidInput(
                    "Select a movie before asking for recommendations".to_string(),
                ));
            }

            let results = recommender::recommend(catalog, index, metadata, posters, &title, k)
                .await?;

            session.history.push(title.clone());
            session.last_selected = Some(title);
            session.last_opened = None;
            session.locked = false;

            Ok(InteractionOutcome {
                session,
                recommendations: Some(results),
            })
        }

        BrowseAction::Open { title } => {
            // Ignore clicks while a previous one is still rendering, and
            // repeat clicks on the poster that is already open.
            if session.locked || session.last_opened.as_deref() == Some(title.as_str()) {
                tracing::debug!(title = %title, "Poster click ignored");
                return Ok(InteractionOutcome {
                    session,
                    recommendations: None,
                });
            }

            let results = recommender::recommend(catalog, index, metadata, posters, &title, k)
                .await?;

            session.locked = true;
            session.last_opened = Some(title.clone());
            session.history.push(title.clone());
            session.last_selected = Some(title);

            Ok(InteractionOutcome {
                session,
                recommendations: Some(results),
            })
        }

        BrowseAction::Back => {
            if session.history.len() > 1 {
                session.history.pop();
                // History is non-empty here, the pop left at least one entry.
                let previous = session
                    .history
                    .last()
                    .cloned()
                    .ok_or_else(|| AppError::Internal("history underflow".to_string()))?;

                let results =
                    recommender::recommend(catalog, index, metadata, posters, &previous, k)
                        .await?;

                session.last_selected = Some(previous);
                session.last_opened = None;
                session.locked = false;

                Ok(InteractionOutcome {
                    session,
                    recommendations: Some(results),
                })
            } else {
                // Nothing left to go back to: reset to a clean home view.
                Ok(InteractionOutcome {
                    session: BrowseSession::default(),
                    recommendations: Some(Vec::new()),
                })
            }
        }

        BrowseAction::Settle => {
            session.locked = false;
            Ok(InteractionOutcome {
                session,
                recommendations: None,
            })
        }
    }
}

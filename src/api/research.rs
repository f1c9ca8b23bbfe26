use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::server::AppState;
use crate::workflow::types::ResearchQuery;

use super::{ErrorResponse, ResearchRequest, ResearchResponse};

/// Starts a research workflow and waits for it to finish.
///
/// The same progress is streamed to the session in parallel; this response
/// is the authoritative copy.
pub async fn start_research(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ResearchRequest>,
) -> Result<Json<ResearchResponse>, (StatusCode, Json<ErrorResponse>)> {
    let ResearchRequest {
        query,
        session_id,
        repository,
    } = request;

    // Rejecting here means the workflow never starts, so no events are
    // owed to the session.
    if query.trim().is_empty() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new("query must not be empty")),
        ));
    }

    let session_id = session_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    let research_query = ResearchQuery::with_session(query, session_id.clone());

    match state
        .orchestrator
        .run(&research_query, repository.as_deref())
        .await
    {
        Ok(output) => Ok(Json(ResearchResponse {
            success: true,
            session_id,
            research: output.research,
            actions: output.actions,
            summary: output.summary,
        })),
        Err(e) => {
            let status = if e.is_client_error() {
                StatusCode::BAD_REQUEST
            } else {
                StatusCode::INTERNAL_SERVER_ERROR
            };
            Err((
                status,
                Json(ErrorResponse::with_details("Workflow failed", e.to_string())),
            ))
        }
    }
}

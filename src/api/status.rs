use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::server::AppState;

/// Connectivity probe for the research collaborator.
pub async fn research_status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    probe_response("research", state.researcher.probe().await)
}

/// Connectivity probe for the action collaborator.
pub async fn github_status(State(state): State<Arc<AppState>>) -> (StatusCode, Json<Value>) {
    probe_response("github", state.platform.probe().await)
}

fn probe_response(collaborator: &str, probe: crate::error::Result<()>) -> (StatusCode, Json<Value>) {
    match probe {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({"status": "ok", "collaborator": collaborator})),
        ),
        Err(e) => {
            tracing::warn!(collaborator, error = %e, "collaborator probe failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "unavailable",
                    "collaborator": collaborator,
                    "error": e.to_string(),
                })),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RepositoriesParams {
    pub owner: Option<String>,
}

/// Pass-through listing of repositories for an owner. Falls back to the
/// owner of the configured default repository.
pub async fn list_repositories(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RepositoriesParams>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let owner = params
        .owner
        .or_else(|| default_owner(&state.config.workflow.default_repository));
    let Some(owner) = owner else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "owner query parameter is required"})),
        ));
    };

    match state.platform.list_repositories(&owner).await {
        Ok(repositories) => Ok(Json(json!({
            "owner": owner,
            "repositories": repositories,
        }))),
        Err(e) => {
            tracing::warn!(owner = %owner, error = %e, "repository listing failed");
            Err((
                StatusCode::BAD_GATEWAY,
                Json(json!({"error": e.to_string()})),
            ))
        }
    }
}

fn default_owner(descriptor: &str) -> Option<String> {
    descriptor
        .split_once('/')
        .map(|(owner, _)| owner.to_string())
}

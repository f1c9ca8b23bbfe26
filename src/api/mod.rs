pub mod research;
pub mod status;
pub mod stream;

use serde::{Deserialize, Serialize};

use crate::workflow::types::{ActionResult, ResearchResult, WorkflowSummary};

/// Body of the start-workflow command.
#[derive(Debug, Deserialize)]
pub struct ResearchRequest {
    pub query: String,
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
}

/// Successful synchronous response. Mirrors the terminal `complete` event.
#[derive(Debug, Serialize)]
pub struct ResearchResponse {
    pub success: bool,
    pub session_id: String,
    pub research: ResearchResult,
    pub actions: Vec<ActionResult>,
    pub summary: WorkflowSummary,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

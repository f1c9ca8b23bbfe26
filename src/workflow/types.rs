use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A research request as the orchestrator sees it. Immutable once built.
#[derive(Debug, Clone)]
pub struct ResearchQuery {
    query: String,
    session_id: Option<String>,
}

impl ResearchQuery {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: None,
        }
    }

    pub fn with_session(query: impl Into<String>, session_id: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            session_id: Some(session_id.into()),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResearchStatus {
    Pending,
    Completed,
    Failed,
}

/// What the research collaborator produced for a query.
///
/// A `failed` status carries the failure description in `findings`;
/// callers must check `status` before treating `findings` as content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchResult {
    pub id: String,
    pub query: String,
    pub findings: String,
    pub status: ResearchStatus,
    pub timestamp: DateTime<Utc>,
}

impl ResearchResult {
    pub fn completed(query: impl Into<String>, findings: impl Into<String>) -> Self {
        Self::with_status(query, findings, ResearchStatus::Completed)
    }

    pub fn failed(query: impl Into<String>, description: impl Into<String>) -> Self {
        Self::with_status(query, description, ResearchStatus::Failed)
    }

    fn with_status(
        query: impl Into<String>,
        findings: impl Into<String>,
        status: ResearchStatus,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            query: query.into(),
            findings: findings.into(),
            status,
            timestamp: Utc::now(),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.status == ResearchStatus::Failed
    }
}

/// Title and body for an issue, as formatted by the research collaborator.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IssueContent {
    pub title: String,
    pub body: String,
}

/// Outcome of one action taken by the action collaborator.
///
/// Exactly one of `result` and `error` is populated, gated by `success`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub action: String,
    pub platform: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub timestamp: DateTime<Utc>,
}

impl ActionResult {
    pub fn succeeded(action: impl Into<String>, platform: impl Into<String>, result: Value) -> Self {
        Self {
            action: action.into(),
            platform: platform.into(),
            success: true,
            result: Some(result),
            error: None,
            timestamp: Utc::now(),
        }
    }

    pub fn failed(
        action: impl Into<String>,
        platform: impl Into<String>,
        error: impl Into<String>,
    ) -> Self {
        Self {
            action: action.into(),
            platform: platform.into(),
            success: false,
            result: None,
            error: Some(error.into()),
            timestamp: Utc::now(),
        }
    }
}

/// Everything a finished workflow hands back to the request handler.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowOutput {
    pub research: ResearchResult,
    pub actions: Vec<ActionResult>,
    pub summary: WorkflowSummary,
}

impl WorkflowOutput {
    pub fn new(research: ResearchResult, actions: Vec<ActionResult>) -> Self {
        let summary = WorkflowSummary::from_actions(&actions);
        Self {
            research,
            actions,
            summary,
        }
    }
}

/// Counts derived from the action list, plus the created issue URL if any.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowSummary {
    pub actions_executed: usize,
    pub actions_succeeded: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_url: Option<String>,
}

impl WorkflowSummary {
    pub fn from_actions(actions: &[ActionResult]) -> Self {
        let issue_url = actions
            .iter()
            .filter(|a| a.success)
            .find_map(|a| a.result.as_ref())
            .and_then(|r| r.get("url"))
            .and_then(|u| u.as_str())
            .map(String::from);

        Self {
            actions_executed: actions.len(),
            actions_succeeded: actions.iter().filter(|a| a.success).count(),
            issue_url,
        }
    }
}

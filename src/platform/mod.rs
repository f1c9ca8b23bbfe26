pub mod github;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;
use crate::workflow::types::ActionResult;
use types::{CreateIssue, RepoSummary};

/// The action collaborator: executes actions decided by the workflow.
#[async_trait]
pub trait ActionPlatform: Send + Sync {
    /// Create an issue. Failures are encoded in the returned
    /// [`ActionResult`], never raised past this boundary.
    async fn create_issue(&self, request: &CreateIssue) -> ActionResult;

    /// List repositories belonging to `owner`.
    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepoSummary>>;

    /// Cheap connectivity check for the status surface.
    async fn probe(&self) -> Result<()>;
}

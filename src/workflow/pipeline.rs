use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::config::WorkflowConfig;
use crate::error::{AppError, Result};
use crate::platform::github::{ACTION_CREATE_ISSUE, PLATFORM_NAME};
use crate::platform::types::CreateIssue;
use crate::platform::ActionPlatform;
use crate::research::Researcher;
use crate::session::{ProgressEvent, Publisher, Stage};
use crate::workflow::types::{ActionResult, ResearchQuery, WorkflowOutput};

/// Owner used when a repository descriptor carries no `owner/` part.
/// A placeholder on purpose; issue creation against it fails until the
/// caller supplies a full descriptor.
const FALLBACK_OWNER: &str = "owner";

/// Drives the fixed research pipeline for one query at a time:
/// analyze, research, plan, execute. Each stage boundary is published to
/// the query's session; collaborators do the actual work.
pub struct Orchestrator {
    researcher: Arc<dyn Researcher>,
    platform: Arc<dyn ActionPlatform>,
    publisher: Arc<dyn Publisher>,
    default_repository: String,
    call_timeout: Duration,
    shutdown: CancellationToken,
}

impl Orchestrator {
    pub fn new(
        researcher: Arc<dyn Researcher>,
        platform: Arc<dyn ActionPlatform>,
        publisher: Arc<dyn Publisher>,
        config: &WorkflowConfig,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            researcher,
            platform,
            publisher,
            default_repository: config.default_repository.clone(),
            call_timeout: Duration::from_secs(config.call_timeout_secs),
            shutdown,
        }
    }

    /// Runs the pipeline to completion and publishes the terminal event.
    ///
    /// Exactly one `complete` or `error` event reaches the session, no
    /// matter where the pipeline stopped. The returned value mirrors the
    /// terminal event and is the authoritative result.
    pub async fn run(
        &self,
        query: &ResearchQuery,
        repository: Option<&str>,
    ) -> Result<WorkflowOutput> {
        tracing::info!(session_id = ?query.session_id(), "research workflow started");

        match self.drive(query, repository).await {
            Ok(output) => {
                self.publish(
                    query.session_id(),
                    ProgressEvent::complete(output.research.clone(), output.actions.clone()),
                );
                tracing::info!(
                    session_id = ?query.session_id(),
                    actions_succeeded = output.summary.actions_succeeded,
                    "research workflow complete"
                );
                Ok(output)
            }
            Err(e) => {
                self.publish(query.session_id(), ProgressEvent::error(e.to_string()));
                tracing::warn!(
                    session_id = ?query.session_id(),
                    error = %e,
                    "research workflow failed"
                );
                Err(e)
            }
        }
    }

    /// The stage sequence itself. Emits only `status` events; terminal
    /// events belong to [`run`](Self::run).
    async fn drive(
        &self,
        query: &ResearchQuery,
        repository: Option<&str>,
    ) -> Result<WorkflowOutput> {
        let session = query.session_id();

        // Validation happens before the first publish, so an empty query
        // produces a single terminal error and nothing else.
        let text = query.query().trim();
        if text.is_empty() {
            return Err(AppError::Validation("query must not be empty".to_string()));
        }
        self.publish(
            session,
            ProgressEvent::status(Stage::Analyzing, "Analyzing research query..."),
        );

        self.checkpoint()?;
        self.publish(
            session,
            ProgressEvent::status(Stage::Researching, "Gathering research findings..."),
        );
        let research = self
            .with_deadline("research", self.researcher.generate_research(text))
            .await?;
        if research.is_failed() {
            // The failure description lives in the findings field.
            return Err(AppError::ResearchFailed(research.findings));
        }

        self.checkpoint()?;
        self.publish(
            session,
            ProgressEvent::status(Stage::Planning, "Formatting findings into an issue..."),
        );
        let issue = self
            .with_deadline(
                "issue formatting",
                self.researcher.generate_issue_content(&research.findings, text),
            )
            .await?;

        self.checkpoint()?;
        self.publish(
            session,
            ProgressEvent::status(Stage::Executing, "Creating the GitHub issue..."),
        );
        let descriptor = repository
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .unwrap_or(&self.default_repository);
        let (owner, repo) = split_repo_descriptor(descriptor);
        let request = CreateIssue {
            owner: owner.to_string(),
            repo: repo.to_string(),
            title: issue.title,
            body: issue.body,
        };

        // Action failures, deadline overruns included, are encoded in the
        // result rather than escalated.
        let action = match tokio::time::timeout(
            self.call_timeout,
            self.platform.create_issue(&request),
        )
        .await
        {
            Ok(action) => action,
            Err(_) => ActionResult::failed(
                ACTION_CREATE_ISSUE,
                PLATFORM_NAME,
                format!(
                    "issue creation exceeded {}s deadline",
                    self.call_timeout.as_secs()
                ),
            ),
        };

        Ok(WorkflowOutput::new(research, vec![action]))
    }

    fn publish(&self, session_id: Option<&str>, event: ProgressEvent) {
        if let Some(id) = session_id {
            self.publisher.publish(id, event);
        }
    }

    fn checkpoint(&self) -> Result<()> {
        if self.shutdown.is_cancelled() {
            return Err(AppError::Cancelled);
        }
        Ok(())
    }

    async fn with_deadline<T, F>(&self, what: &str, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(AppError::Timeout(format!(
                "{what} call exceeded {}s deadline",
                self.call_timeout.as_secs()
            ))),
        }
    }
}

fn split_repo_descriptor(descriptor: &str) -> (&str, &str) {
    match descriptor.split_once('/') {
        Some((owner, repo)) => (owner, repo),
        None => (FALLBACK_OWNER, descriptor),
    }
}

pub mod client;
pub mod prompt;

pub use client::PerplexityClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::workflow::types::{IssueContent, ResearchResult};

/// The research collaborator: turns a query into findings, and findings
/// into issue content.
///
/// Implementations may fail by returning `Err`, or in-band by returning a
/// `failed`-status [`ResearchResult`] whose findings describe the problem.
#[async_trait]
pub trait Researcher: Send + Sync {
    async fn generate_research(&self, query: &str) -> Result<ResearchResult>;

    async fn generate_issue_content(
        &self,
        findings: &str,
        original_query: &str,
    ) -> Result<IssueContent>;

    /// Cheap connectivity check for the status surface.
    async fn probe(&self) -> Result<()>;
}

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;

use crate::config::GitHubConfig;
use crate::error::{AppError, Result};
use crate::platform::types::{CreateIssue, RepoSummary};
use crate::platform::ActionPlatform;
use crate::workflow::types::ActionResult;

pub const ACTION_CREATE_ISSUE: &str = "github_issue";
pub const PLATFORM_NAME: &str = "github";

/// Action collaborator backed by the GitHub REST API.
pub struct GitHubPlatform {
    client: Octocrab,
}

impl GitHubPlatform {
    pub fn new(config: &GitHubConfig) -> Result<Self> {
        let client = Octocrab::builder()
            .personal_token(config.token.clone())
            .build()
            .map_err(|e| AppError::GitHubApi(format!("Failed to build octocrab client: {e}")))?;

        Ok(Self { client })
    }

    async fn try_create_issue(&self, request: &CreateIssue) -> Result<serde_json::Value> {
        let issue = self
            .client
            .issues(request.owner.as_str(), request.repo.as_str())
            .create(&request.title)
            .body(&request.body)
            .send()
            .await?;

        Ok(json!({
            "issue_number": issue.number,
            "title": issue.title,
            "url": issue.html_url.to_string(),
            "repository": request.full_repo(),
        }))
    }
}

#[async_trait]
impl ActionPlatform for GitHubPlatform {
    async fn create_issue(&self, request: &CreateIssue) -> ActionResult {
        match self.try_create_issue(request).await {
            Ok(result) => {
                tracing::info!(repository = %request.full_repo(), "created issue");
                ActionResult::succeeded(ACTION_CREATE_ISSUE, PLATFORM_NAME, result)
            }
            Err(e) => {
                tracing::warn!(
                    repository = %request.full_repo(),
                    error = %e,
                    "issue creation failed"
                );
                ActionResult::failed(ACTION_CREATE_ISSUE, PLATFORM_NAME, e.to_string())
            }
        }
    }

    async fn list_repositories(&self, owner: &str) -> Result<Vec<RepoSummary>> {
        let url = format!("/users/{owner}/repos");
        let repos: Vec<serde_json::Value> = self
            .client
            .get(&url, None::<&()>)
            .await
            .map_err(|e| AppError::GitHubApi(format!("Failed to list repositories: {e}")))?;

        Ok(repos.iter().map(map_repo_summary).collect())
    }

    async fn probe(&self) -> Result<()> {
        let _: serde_json::Value = self
            .client
            .get("/rate_limit", None::<&()>)
            .await
            .map_err(|e| AppError::GitHubApi(format!("GitHub connectivity check failed: {e}")))?;

        Ok(())
    }
}

fn map_repo_summary(value: &serde_json::Value) -> RepoSummary {
    RepoSummary {
        name: value["name"].as_str().unwrap_or("").to_string(),
        full_name: value["full_name"].as_str().unwrap_or("").to_string(),
        description: value["description"].as_str().map(String::from),
        private: value["private"].as_bool().unwrap_or(false),
        url: value["html_url"].as_str().unwrap_or("").to_string(),
    }
}

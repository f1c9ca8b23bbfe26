use serde::Serialize;

/// Inputs for the issue-creation action.
#[derive(Debug, Clone)]
pub struct CreateIssue {
    pub owner: String,
    pub repo: String,
    pub title: String,
    pub body: String,
}

impl CreateIssue {
    pub fn full_repo(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

/// A repository as reported by the listing pass-through.
#[derive(Debug, Clone, Serialize)]
pub struct RepoSummary {
    pub name: String,
    pub full_name: String,
    pub description: Option<String>,
    pub private: bool,
    pub url: String,
}

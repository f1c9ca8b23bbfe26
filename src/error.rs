use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    Validation(String),

    #[error("Research API error: {0}")]
    ResearchApi(String),

    /// The research collaborator reported failure in-band (`failed` status).
    /// Display is the bare findings text so the streamed error message is
    /// the collaborator's own words.
    #[error("{0}")]
    ResearchFailed(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Timed out: {0}")]
    Timeout(String),

    #[error("Workflow cancelled: shutdown in progress")]
    Cancelled,

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

impl From<octocrab::Error> for AppError {
    fn from(e: octocrab::Error) -> Self {
        AppError::GitHubApi(e.to_string())
    }
}

impl AppError {
    /// Whether this error belongs to the client-error class (bad input)
    /// rather than the server-error class (collaborator/internal failure).
    pub fn is_client_error(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

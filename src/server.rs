use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::config::AppConfig;
use crate::platform::github::GitHubPlatform;
use crate::platform::ActionPlatform;
use crate::research::{PerplexityClient, Researcher};
use crate::session::{ChannelPublisher, SessionRegistry};
use crate::workflow::Orchestrator;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: Arc<SessionRegistry>,
    pub researcher: Arc<dyn Researcher>,
    pub platform: Arc<dyn ActionPlatform>,
    pub orchestrator: Orchestrator,
    pub shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: AppConfig, shutdown: CancellationToken) -> crate::error::Result<Self> {
        let sessions = Arc::new(SessionRegistry::new());
        let publisher = Arc::new(ChannelPublisher::new(Arc::clone(&sessions)));

        let researcher: Arc<dyn Researcher> = Arc::new(PerplexityClient::new(
            config.research_api_key(),
            &config.research.model,
            config.research.max_tokens,
        ));
        let platform: Arc<dyn ActionPlatform> = Arc::new(GitHubPlatform::new(&config.github)?);

        let orchestrator = Orchestrator::new(
            Arc::clone(&researcher),
            Arc::clone(&platform),
            publisher,
            &config.workflow,
            shutdown.clone(),
        );

        Ok(Self {
            config,
            sessions,
            researcher,
            platform,
            orchestrator,
            shutdown,
        })
    }
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/api/research", post(api::research::start_research))
        .route("/api/events/:session_id", get(api::stream::subscribe))
        .route("/api/status/research", get(api::status::research_status))
        .route("/api/status/github", get(api::status::github_status))
        .route("/api/repositories", get(api::status::list_repositories))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "ok"
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{GitHubConfig, ResearchConfig, ServerConfig, WorkflowConfig};

    fn test_config() -> AppConfig {
        AppConfig {
            server: ServerConfig::default(),
            research: ResearchConfig {
                api_key: "pplx-test".to_string(),
                model: "sonar-pro".to_string(),
                max_tokens: 64,
            },
            github: GitHubConfig {
                token: "ghp_test".to_string(),
            },
            workflow: WorkflowConfig::default(),
        }
    }

    #[tokio::test]
    async fn state_and_router_wire_up() {
        let state = AppState::new(test_config(), CancellationToken::new()).unwrap();
        let _router = create_router(Arc::new(state));
    }
}

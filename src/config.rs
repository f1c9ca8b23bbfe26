use serde::Deserialize;

use crate::error::{AppError, Result};

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub research: ResearchConfig,
    pub github: GitHubConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Deserialize, Clone)]
pub struct ResearchConfig {
    pub api_key: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

// Manual Debug impl to avoid leaking the API key
impl std::fmt::Debug for ResearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResearchConfig")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

#[derive(Deserialize, Clone)]
pub struct GitHubConfig {
    pub token: String,
}

// Manual Debug impl to avoid leaking the token
impl std::fmt::Debug for GitHubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubConfig")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkflowConfig {
    /// `owner/name` used when a request names no repository.
    #[serde(default = "default_repository")]
    pub default_repository: String,
    /// Budget for a single collaborator call, in seconds.
    #[serde(default = "default_call_timeout")]
    pub call_timeout_secs: u64,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            default_repository: default_repository(),
            call_timeout_secs: default_call_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "sonar-pro".to_string()
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_repository() -> String {
    "forager/research".to_string()
}

fn default_call_timeout() -> u64 {
    120
}

impl AppConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut builder = config::Config::builder();

        // Load from file if specified
        if let Some(path) = config_path {
            builder = builder.add_source(config::File::with_name(path));
        } else {
            // Try default paths
            builder = builder.add_source(
                config::File::with_name("forager")
                    .required(false),
            );
        }

        // Environment variable overrides with FORAGER_ prefix
        builder = builder.add_source(
            config::Environment::with_prefix("FORAGER")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| AppError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| AppError::Config(e.to_string()))
    }

    pub fn research_api_key(&self) -> &str {
        &self.research.api_key
    }

    pub fn github_token(&self) -> &str {
        &self.github.token
    }

    pub fn call_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.workflow.call_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, contents: &str) -> String {
        let path = dir.path().join("forager.toml");
        std::fs::write(&path, contents).unwrap();
        path.to_str().unwrap().to_string()
    }

    #[test]
    fn minimal_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [research]
            api_key = "pplx-test"

            [github]
            token = "ghp_test"
            "#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.research.model, "sonar-pro");
        assert_eq!(config.research.max_tokens, 4096);
        assert_eq!(config.workflow.default_repository, "forager/research");
        assert_eq!(config.workflow.call_timeout_secs, 120);
        assert_eq!(config.research_api_key(), "pplx-test");
        assert_eq!(config.github_token(), "ghp_test");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [research]
            api_key = "pplx-test"
            model = "sonar"
            max_tokens = 1024

            [github]
            token = "ghp_test"

            [workflow]
            default_repository = "acme/widgets"
            call_timeout_secs = 30
            "#,
        );

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.research.model, "sonar");
        assert_eq!(config.research.max_tokens, 1024);
        assert_eq!(config.workflow.default_repository, "acme/widgets");
        assert_eq!(config.call_timeout(), std::time::Duration::from_secs(30));
    }

    #[test]
    fn missing_required_section_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            &dir,
            r#"
            [research]
            api_key = "pplx-test"
            "#,
        );

        let err = AppConfig::load(Some(&path)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn secrets_are_redacted_in_debug_output() {
        let config = ResearchConfig {
            api_key: "pplx-secret".to_string(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        };
        let rendered = format!("{config:?}");
        assert!(!rendered.contains("pplx-secret"));
        assert!(rendered.contains("REDACTED"));

        let github = GitHubConfig {
            token: "ghp_secret".to_string(),
        };
        let rendered = format!("{github:?}");
        assert!(!rendered.contains("ghp_secret"));
    }
}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::workflow::types::{IssueContent, ResearchResult};

use super::prompt;
use super::Researcher;

const PERPLEXITY_API_URL: &str = "https://api.perplexity.ai/chat/completions";

/// Research collaborator backed by the Perplexity chat-completions API.
pub struct PerplexityClient {
    client: Client,
    api_key: String,
    model: String,
    max_tokens: u32,
}

impl PerplexityClient {
    pub fn new(api_key: &str, model: &str, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            max_tokens,
        }
    }

    fn chat_request(&self, system: &'static str, user: String) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
        }
    }

    async fn send_chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let response = self
            .client
            .post(PERPLEXITY_API_URL)
            .bearer_auth(&self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ResearchApi(format!(
                "API returned {status}: {body}"
            )));
        }

        let body = response.json::<ChatResponse>().await?;
        Ok(body)
    }
}

#[async_trait]
impl Researcher for PerplexityClient {
    async fn generate_research(&self, query: &str) -> Result<ResearchResult> {
        let request = self.chat_request(
            prompt::RESEARCH_SYSTEM_PROMPT,
            prompt::research_prompt(query),
        );
        let response = self.send_chat(&request).await?;

        match response.into_first_content() {
            Some(findings) if !findings.trim().is_empty() => {
                Ok(ResearchResult::completed(query, findings))
            }
            // No usable content is an in-band failure, not a transport error.
            _ => Ok(ResearchResult::failed(
                query,
                "research API returned no content",
            )),
        }
    }

    async fn generate_issue_content(
        &self,
        findings: &str,
        original_query: &str,
    ) -> Result<IssueContent> {
        let request = self.chat_request(
            prompt::ISSUE_SYSTEM_PROMPT,
            prompt::issue_content_prompt(findings, original_query),
        );
        let response = self.send_chat(&request).await?;

        let raw = response.into_first_content().ok_or_else(|| {
            AppError::ResearchApi("issue formatting returned no content".to_string())
        })?;

        Ok(prompt::extract_issue_content(&raw, original_query))
    }

    async fn probe(&self) -> Result<()> {
        let request = ChatRequest {
            model: self.model.clone(),
            max_tokens: 1,
            messages: vec![ChatMessage {
                role: "user",
                content: "ping".to_string(),
            }],
        };
        self.send_chat(&request).await.map(|_| ())
    }
}

// --- Request types ---

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

// --- Response types ---

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

impl ChatResponse {
    fn into_first_content(self) -> Option<String> {
        self.choices.into_iter().next().map(|c| c.message.content)
    }
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: AssistantMessage,
}

#[derive(Debug, Deserialize)]
struct AssistantMessage {
    content: String,
}

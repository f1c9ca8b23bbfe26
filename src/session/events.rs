use serde::{Deserialize, Serialize};

use crate::workflow::types::{ActionResult, ResearchResult};

/// One step of the fixed research pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Analyzing,
    Researching,
    Planning,
    Executing,
    Complete,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Stage::Analyzing => "analyzing",
            Stage::Researching => "researching",
            Stage::Planning => "planning",
            Stage::Executing => "executing",
            Stage::Complete => "complete",
        };
        f.write_str(name)
    }
}

/// A single unit pushed over a session's progress stream.
///
/// Serialized with a `type` tag so browser clients can switch on it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProgressEvent {
    Connected {
        session_id: String,
    },
    Status {
        stage: Stage,
        message: String,
    },
    Complete {
        research: ResearchResult,
        actions: Vec<ActionResult>,
    },
    Error {
        message: String,
    },
}

impl ProgressEvent {
    pub fn connected(session_id: impl Into<String>) -> Self {
        ProgressEvent::Connected {
            session_id: session_id.into(),
        }
    }

    pub fn status(stage: Stage, message: impl Into<String>) -> Self {
        ProgressEvent::Status {
            stage,
            message: message.into(),
        }
    }

    pub fn complete(research: ResearchResult, actions: Vec<ActionResult>) -> Self {
        ProgressEvent::Complete { research, actions }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ProgressEvent::Error {
            message: message.into(),
        }
    }

    /// `complete` and `error` end a session's stream; nothing follows them.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            ProgressEvent::Complete { .. } | ProgressEvent::Error { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_event_serializes_with_type_and_stage_tags() {
        let event = ProgressEvent::status(Stage::Researching, "Gathering information...");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "status");
        assert_eq!(value["stage"], "researching");
        assert_eq!(value["message"], "Gathering information...");
    }

    #[test]
    fn connected_event_carries_session_id() {
        let event = ProgressEvent::connected("s1");
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "connected");
        assert_eq!(value["session_id"], "s1");
    }

    #[test]
    fn complete_event_embeds_research_and_actions() {
        let research = ResearchResult::completed("q", "findings");
        let event = ProgressEvent::complete(research, vec![]);
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "complete");
        assert_eq!(value["research"]["status"], "completed");
        assert!(value["actions"].as_array().unwrap().is_empty());
    }

    #[test]
    fn only_complete_and_error_are_terminal() {
        assert!(ProgressEvent::error("boom").is_terminal());
        let research = ResearchResult::completed("q", "f");
        assert!(ProgressEvent::complete(research, vec![]).is_terminal());
        assert!(!ProgressEvent::connected("s1").is_terminal());
        assert!(!ProgressEvent::status(Stage::Analyzing, "m").is_terminal());
    }

    #[test]
    fn stage_display_matches_wire_tags() {
        assert_eq!(Stage::Executing.to_string(), "executing");
        assert_eq!(Stage::Complete.to_string(), "complete");
    }
}

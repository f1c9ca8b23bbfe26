use crate::workflow::types::IssueContent;

/// Longest title we derive ourselves when the model's output is unusable.
const FALLBACK_TITLE_LIMIT: usize = 80;

pub const RESEARCH_SYSTEM_PROMPT: &str = "You are a meticulous research assistant. Investigate the user's query and report concrete findings: key facts, the current state of the art, notable trade-offs, and actionable recommendations. Cite sources inline where you can.";

pub const ISSUE_SYSTEM_PROMPT: &str = r#"You turn research findings into actionable GitHub issues. Respond with a single JSON object containing exactly two string fields, "title" and "body". The title is one line of at most 80 characters. The body is GitHub-flavored Markdown that summarizes the findings and ends with a short task list. Output nothing besides the JSON object."#;

pub fn research_prompt(query: &str) -> String {
    format!("Research the following topic and summarize your findings:\n\n{query}")
}

pub fn issue_content_prompt(findings: &str, original_query: &str) -> String {
    format!(
        r#"Original query: {original_query}

Research findings:
{findings}

Produce the issue JSON now."#
    )
}

/// Pulls a `{title, body}` pair out of a model response.
///
/// Accepts a ```json fenced block or a bare JSON object. Anything else is
/// kept verbatim as the issue body under a title derived from the query,
/// so a sloppy model response still produces a usable issue.
pub fn extract_issue_content(raw: &str, original_query: &str) -> IssueContent {
    let candidate = extract_json_block(raw).unwrap_or_else(|| raw.trim());

    if let Ok(content) = serde_json::from_str::<IssueContent>(candidate) {
        if !content.title.trim().is_empty() {
            return content;
        }
    }

    IssueContent {
        title: derived_title(original_query),
        body: raw.trim().to_string(),
    }
}

fn extract_json_block(raw: &str) -> Option<&str> {
    let start = raw.find("```json")? + "```json".len();
    let rest = &raw[start..];
    let end = rest.find("```")?;
    Some(rest[..end].trim())
}

fn derived_title(original_query: &str) -> String {
    let title = format!("Research: {}", original_query.trim());
    title.chars().take(FALLBACK_TITLE_LIMIT).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_content_from_fenced_block() {
        let raw = "Here is the issue:\n```json\n{\"title\": \"Adopt Rust\", \"body\": \"Because.\"}\n```\nDone.";
        let content = extract_issue_content(raw, "should we adopt rust");
        assert_eq!(content.title, "Adopt Rust");
        assert_eq!(content.body, "Because.");
    }

    #[test]
    fn accepts_bare_json_object() {
        let raw = r#"{"title": "Adopt Rust", "body": "Because."}"#;
        let content = extract_issue_content(raw, "q");
        assert_eq!(content.title, "Adopt Rust");
    }

    #[test]
    fn falls_back_to_derived_title_for_prose() {
        let raw = "The model ignored the format and wrote prose instead.";
        let content = extract_issue_content(raw, "evaluate caching layers");
        assert_eq!(content.title, "Research: evaluate caching layers");
        assert_eq!(content.body, raw);
    }

    #[test]
    fn empty_title_in_json_triggers_fallback() {
        let raw = r#"{"title": "  ", "body": "text"}"#;
        let content = extract_issue_content(raw, "q");
        assert_eq!(content.title, "Research: q");
    }

    #[test]
    fn derived_title_is_truncated() {
        let long_query = "x".repeat(200);
        let content = extract_issue_content("prose", &long_query);
        assert_eq!(content.title.chars().count(), FALLBACK_TITLE_LIMIT);
    }

    #[test]
    fn prompts_embed_their_inputs() {
        assert!(research_prompt("topic").contains("topic"));
        let prompt = issue_content_prompt("findings text", "original");
        assert!(prompt.contains("findings text"));
        assert!(prompt.contains("original"));
    }
}

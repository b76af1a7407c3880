use serde::Deserialize;

use crate::backend::usage::{AnalysisOutcome, TokenUsage};
use crate::error::Result;

// Every field is optional: a JSON body without the expected shape yields
// empty text rather than an error.

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionChoice {
    #[serde(default)]
    pub message: Option<ResponseMessage>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UsageInfo {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Option<Vec<ChatCompletionChoice>>,
    #[serde(default)]
    pub usage: Option<UsageInfo>,
    #[serde(default)]
    pub model: Option<String>,
}

impl ChatCompletionResponse {
    /// `choices[0].message.content`, or empty when any step is missing.
    pub fn first_content(&self) -> String {
        self.choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.message.as_ref())
            .and_then(|message| message.content.clone())
            .unwrap_or_default()
    }

    pub fn finish_reason(&self) -> Option<&str> {
        self.choices
            .as_ref()
            .and_then(|choices| choices.first())
            .and_then(|choice| choice.finish_reason.as_deref())
    }

    pub fn token_usage(&self, requested_model: &str) -> Option<TokenUsage> {
        self.usage.as_ref().map(|usage| {
            TokenUsage::new(
                self.model.as_deref().unwrap_or(requested_model),
                usage.prompt_tokens,
                usage.completion_tokens,
            )
        })
    }

    pub fn into_outcome(self, requested_model: &str) -> AnalysisOutcome {
        let usage = self.token_usage(requested_model);
        AnalysisOutcome::new(self.first_content(), usage)
    }
}

/// Parse a response body. Only non-JSON (or non-object) bodies are errors.
pub(crate) fn parse_response(body: &str) -> Result<ChatCompletionResponse> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalyzerError;

    fn content_of(body: &str) -> String {
        parse_response(body)
            .expect("body should parse")
            .first_content()
    }

    #[test]
    fn test_extracts_first_choice_content() {
        assert_eq!(
            content_of(r#"{"choices":[{"message":{"content":"X"}},{"message":{"content":"Y"}}]}"#),
            "X"
        );
    }

    #[test]
    fn test_missing_pieces_give_empty_text() {
        assert_eq!(content_of(r#"{"choices":[]}"#), "");
        assert_eq!(content_of(r#"{}"#), "");
        assert_eq!(content_of(r#"{"choices":null}"#), "");
        assert_eq!(content_of(r#"{"choices":[{}]}"#), "");
        assert_eq!(content_of(r#"{"choices":[{"message":{}}]}"#), "");
        assert_eq!(content_of(r#"{"choices":[{"message":{"content":null}}]}"#), "");
    }

    #[test]
    fn test_usage_prefers_reported_model() {
        let response = parse_response(
            r#"{"model":"gpt-4.1-mini-2025-04-14","choices":[],"usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
        )
        .unwrap();
        let usage = response.token_usage("gpt-4.1-mini").expect("usage present");
        assert_eq!(usage.model, "gpt-4.1-mini-2025-04-14");
        assert_eq!(usage.total_tokens(), 15);
    }

    #[test]
    fn test_usage_absent() {
        let outcome = parse_response(r#"{"choices":[{"message":{"content":"hi"}}]}"#)
            .unwrap()
            .into_outcome("m");
        assert_eq!(outcome.text, "hi");
        assert_eq!(outcome.usage, None);
    }

    #[test]
    fn test_non_json_body_is_error() {
        assert!(matches!(
            parse_response("<html>bad gateway</html>"),
            Err(AnalyzerError::Json(_))
        ));
    }
}

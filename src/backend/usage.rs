/// Token usage reported by the endpoint for one analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenUsage {
    /// The model that served the request
    pub model: String,
    /// Number of tokens in the input/prompt
    pub input_tokens: u64,
    /// Number of tokens in the output/completion
    pub output_tokens: u64,
}

impl TokenUsage {
    pub fn new(model: impl Into<String>, input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            model: model.into(),
            input_tokens,
            output_tokens,
        }
    }

    /// Total tokens used (input + output)
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens + self.output_tokens
    }
}

/// Result of an analysis: the Markdown text plus usage when the endpoint reports it.
///
/// ```no_run
/// use design_lens::{AnalysisClient, AnalysisConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let client = AnalysisClient::new(AnalysisConfig::from_env()?)?;
/// let outcome = client.analyze_with_metadata("page.png").await?;
///
/// println!("{}", outcome.text);
/// if let Some(usage) = outcome.usage {
///     println!("Used {} total tokens", usage.total_tokens());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOutcome {
    /// The analysis; empty when the response carried no content
    pub text: String,
    /// Token usage information (if available from the provider)
    pub usage: Option<TokenUsage>,
}

impl AnalysisOutcome {
    pub fn new(text: String, usage: Option<TokenUsage>) -> Self {
        Self { text, usage }
    }
}

//! Endpoint configuration, loaded once at startup.

use std::fmt;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::backend::media::MimePolicy;
use crate::error::{AnalyzerError, Result};

/// Chat-completions endpoint, e.g. `https://api.openai.com/v1/chat/completions`.
pub const API_URL_ENV: &str = "OPENAI_API_URL";
/// Bearer secret for the endpoint.
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
/// Model identifier; falls back to [`DEFAULT_MODEL`].
pub const MODEL_ENV: &str = "OPENAI_MODEL";
/// `png` (default) or `detect`.
pub const IMAGE_MIME_ENV: &str = "OPENAI_IMAGE_MIME";
/// Optional whole-request timeout in seconds.
pub const TIMEOUT_ENV: &str = "OPENAI_TIMEOUT_SECS";

/// Model used when `OPENAI_MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Configuration for the analysis client.
///
/// Construction fails unless both the endpoint URL and the API key are
/// non-empty, so a value of this type is always usable.
///
/// ```
/// use design_lens::{AnalysisConfig, MimePolicy};
///
/// let config = AnalysisConfig::new("https://example.com/v1/chat/completions", "sk-test")?
///     .model("gpt-4o")
///     .mime_policy(MimePolicy::Detect);
/// assert_eq!(config.model_name(), "gpt-4o");
/// # Ok::<(), design_lens::AnalyzerError>(())
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    endpoint_url: String,
    api_key: String,
    model: String,
    mime_policy: MimePolicy,
    timeout: Option<Duration>,
}

impl AnalysisConfig {
    /// Create a configuration with the default model and MIME policy.
    #[instrument(name = "analysis_config_new", skip(endpoint_url, api_key))]
    pub fn new(endpoint_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint_url = endpoint_url.into().trim().to_string();
        let api_key = api_key.into().trim().to_string();

        if endpoint_url.is_empty() || api_key.is_empty() {
            return Err(AnalyzerError::Config(format!(
                "请设置环境变量 {} 和 {}",
                API_URL_ENV, API_KEY_ENV
            )));
        }

        debug!(endpoint = %endpoint_url, "Analysis configuration created");
        Ok(Self {
            endpoint_url,
            api_key,
            model: DEFAULT_MODEL.to_string(),
            mime_policy: MimePolicy::default(),
            timeout: None,
        })
    }

    /// Load configuration from the process environment.
    ///
    /// A `.env` file in the working directory (or a parent) is read first;
    /// variables already set in the environment win over the file.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => warn!(error = %e, "Ignoring unreadable .env file"),
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint_url = lookup(API_URL_ENV).unwrap_or_default();
        let api_key = lookup(API_KEY_ENV).unwrap_or_default();
        let mut config = Self::new(endpoint_url, api_key)?;

        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            config = config.model(model.trim());
        }

        if let Some(raw) = lookup(IMAGE_MIME_ENV).filter(|v| !v.trim().is_empty()) {
            config = config.mime_policy(raw.parse()?);
        }

        if let Some(raw) = lookup(TIMEOUT_ENV).filter(|v| !v.trim().is_empty()) {
            let secs: f64 = raw.trim().parse().map_err(|_| {
                AnalyzerError::Config(format!("{} must be a number of seconds, got {:?}", TIMEOUT_ENV, raw))
            })?;
            if !secs.is_finite() || secs <= 0.0 {
                return Err(AnalyzerError::Config(format!(
                    "{} must be positive, got {}",
                    TIMEOUT_ENV, secs
                )));
            }
            let timeout = Duration::try_from_secs_f64(secs).map_err(|e| {
                AnalyzerError::Config(format!("{} out of range ({}): {}", TIMEOUT_ENV, secs, e))
            })?;
            config = config.timeout(timeout);
        }

        info!(
            model = %config.model,
            mime_policy = ?config.mime_policy,
            timeout = ?config.timeout,
            "Analysis configuration loaded"
        );
        Ok(config)
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set how the image MIME type is chosen
    pub fn mime_policy(mut self, policy: MimePolicy) -> Self {
        self.mime_policy = policy;
        self
    }

    /// Set the timeout for the HTTP request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint_url(&self) -> &str {
        &self.endpoint_url
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn model_name(&self) -> &str {
        &self.model
    }

    pub fn image_mime_policy(&self) -> MimePolicy {
        self.mime_policy
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("endpoint_url", &self.endpoint_url)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("mime_policy", &self.mime_policy)
            .field("timeout", &self.timeout)
            .finish()
    }
}

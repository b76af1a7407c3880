use std::path::Path;

use async_trait::async_trait;
use tracing::{debug, info, instrument, trace, warn};

use crate::backend::media::EncodedImage;
use crate::backend::request::{build_headers, build_request};
use crate::backend::response::parse_response;
use crate::backend::usage::AnalysisOutcome;
use crate::backend::utils::{check_response_status, handle_http_error};
use crate::config::AnalysisConfig;
use crate::error::{IMAGE_READ_FAILURE_MESSAGE, Result};

/// Something that can turn a design screenshot into a Markdown analysis.
///
/// [`AnalysisClient`] is the real implementation; the invocation surfaces
/// take any `ImageAnalyzer` so they can run against a stub.
///
/// ```no_run
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// use design_lens::{AnalysisClient, AnalysisConfig, ImageAnalyzer};
///
/// let client = AnalysisClient::new(AnalysisConfig::from_env()?)?;
/// let markdown = client.analyze("designs/home.png".as_ref()).await?;
/// println!("{}", markdown);
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ImageAnalyzer: Send + Sync {
    /// Analyze the image at `path`.
    ///
    /// Image-read failures come back as the matching typed error, before
    /// any network call is made.
    async fn analyze(&self, path: &Path) -> Result<String>;

    /// Like [`analyze`](Self::analyze), but image-read failures become the
    /// fixed user-facing message instead of an error.
    ///
    /// Transport and API errors still propagate.
    async fn analyze_or_message(&self, path: &Path) -> Result<String> {
        match self.analyze(path).await {
            Err(e) if e.is_image_read_error() => {
                warn!(path = %path.display(), error = %e, "Image could not be read");
                Ok(IMAGE_READ_FAILURE_MESSAGE.to_string())
            }
            other => other,
        }
    }
}

/// Client for an OpenAI-compatible chat-completions endpoint.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    config: AnalysisConfig,
    client: reqwest::Client,
}

impl AnalysisClient {
    /// Create a client. The reqwest client honours the configured timeout.
    #[instrument(name = "analysis_client_new", skip(config), fields(model = %config.model_name()))]
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        info!(
            endpoint = %config.endpoint_url(),
            timeout = ?config.request_timeout(),
            "Analysis client ready"
        );
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze an image and return the text together with token usage.
    #[instrument(
        name = "analyze_image",
        skip(self, path),
        fields(
            path = %path.as_ref().display(),
            model = %self.config.model_name()
        )
    )]
    pub async fn analyze_with_metadata(&self, path: impl AsRef<Path>) -> Result<AnalysisOutcome> {
        let image = EncodedImage::load(path.as_ref(), self.config.image_mime_policy()).await?;
        debug!(mime = %image.mime_type, encoded_len = image.data.len(), "Building analysis request");

        let headers = build_headers(&self.config)?;
        let request = build_request(&image, &self.config);

        debug!("Sending request to analysis endpoint");
        let response = self
            .client
            .post(self.config.endpoint_url())
            .headers(headers)
            .json(&request)
            .send()
            .await
            .map_err(|e| handle_http_error(e, self.config.endpoint_url()))?;

        let response = check_response_status(response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| handle_http_error(e, self.config.endpoint_url()))?;
        trace!(body_len = body.len(), "Received response body");

        let completion = parse_response(&body)?;
        if let Some(reason) = completion.finish_reason() {
            trace!(finish_reason = reason, "Completion finish reason");
        }

        let outcome = completion.into_outcome(self.config.model_name());
        if outcome.text.is_empty() {
            warn!("Response contained no analysis content");
        }
        if let Some(usage) = &outcome.usage {
            debug!(
                model = %usage.model,
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "Token usage"
            );
        }

        info!(content_len = outcome.text.len(), "Image analysis complete");
        Ok(outcome)
    }
}

#[async_trait]
impl ImageAnalyzer for AnalysisClient {
    async fn analyze(&self, path: &Path) -> Result<String> {
        Ok(self.analyze_with_metadata(path).await?.text)
    }
}

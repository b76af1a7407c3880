use reqwest::Response;
use tracing::error;

use crate::error::{AnalyzerError, Result};

/// Convert a reqwest error, handling timeout errors specially.
pub fn handle_http_error(e: reqwest::Error, endpoint: &str) -> AnalyzerError {
    error!(error = %e, endpoint, "HTTP request failed");
    if e.is_timeout() {
        AnalyzerError::Timeout
    } else {
        AnalyzerError::Http(e)
    }
}

/// Check HTTP response status and capture the body if unsuccessful.
pub async fn check_response_status(response: Response) -> Result<Response> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = %status, error = %body, "Endpoint returned error response");
        return Err(AnalyzerError::Api {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

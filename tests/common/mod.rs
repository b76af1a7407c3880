use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use design_lens::{AnalysisClient, AnalysisConfig, MimePolicy};
use serde_json::Value;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

pub const TEST_API_KEY: &str = "sk-test-key";
pub const TEST_MODEL: &str = "vision-test-model";

/// One request captured by [`MockEndpoint`].
#[derive(Debug, Clone)]
#[allow(dead_code)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    /// Header names are lowercased.
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl RecordedRequest {
    #[allow(dead_code)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k == &name.to_ascii_lowercase())
            .map(|(_, v)| v.as_str())
    }
}

/// A chat-completions endpoint on localhost that answers every request
/// with the same status and body.
pub struct MockEndpoint {
    pub url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockEndpoint {
    #[allow(dead_code)]
    pub async fn start(status: u16, body: impl Into<String>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind mock endpoint");
        let addr = listener.local_addr().expect("mock endpoint has no address");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let body = body.into();

        let recorded = Arc::clone(&requests);
        tokio::spawn(async move {
            loop {
                let Ok((stream, _)) = listener.accept().await else {
                    break;
                };
                let recorded = Arc::clone(&recorded);
                let body = body.clone();
                tokio::spawn(async move {
                    serve_one(stream, status, &body, &recorded).await;
                });
            }
        });

        Self {
            url: format!("http://{}/v1/chat/completions", addr),
            requests,
        }
    }

    pub async fn with_content(content: &str) -> Self {
        let body = serde_json::json!({
            "id": "chatcmpl-test",
            "object": "chat.completion",
            "model": TEST_MODEL,
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 812, "completion_tokens": 64, "total_tokens": 876 }
        });
        Self::start(200, body.to_string()).await
    }

    #[allow(dead_code)]
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn config(&self) -> AnalysisConfig {
        AnalysisConfig::new(&self.url, TEST_API_KEY)
            .expect("mock config should build")
            .model(TEST_MODEL)
    }

    pub fn client(&self) -> AnalysisClient {
        AnalysisClient::new(self.config()).expect("client should build")
    }

    #[allow(dead_code)]
    pub fn client_with_policy(&self, policy: MimePolicy) -> AnalysisClient {
        AnalysisClient::new(self.config().mime_policy(policy)).expect("client should build")
    }
}

// The request is recorded before the response is written so a caller that
// has its answer always sees its request in the log.
async fn serve_one(
    mut stream: TcpStream,
    status: u16,
    body: &str,
    recorded: &Mutex<Vec<RecordedRequest>>,
) -> Option<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 8192];

    let header_end = loop {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
    };

    let head = String::from_utf8_lossy(&buf[..header_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();

    let content_length = headers
        .iter()
        .find(|(k, _)| k == "content-length")
        .and_then(|(_, v)| v.parse::<usize>().ok())
        .unwrap_or(0);

    let body_start = header_end + 4;
    while buf.len() < body_start + content_length {
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let request_body = serde_json::from_slice(&buf[body_start..]).unwrap_or(Value::Null);
    recorded.lock().unwrap().push(RecordedRequest {
        method,
        path,
        headers,
        body: request_body,
    });

    let reason = if status == 200 { "OK" } else { "Error" };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        reason,
        body.len(),
        body
    );
    stream.write_all(response.as_bytes()).await.ok()?;
    stream.shutdown().await.ok();
    Some(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

/// Write a small real image; the format follows the extension.
#[allow(dead_code)]
pub fn write_image(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    image::RgbImage::from_fn(8, 6, |x, y| image::Rgb([x as u8 * 30, y as u8 * 40, 128]))
        .save(&path)
        .expect("Failed to write image fixture");
    path
}

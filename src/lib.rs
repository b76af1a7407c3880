//! design-lens: Markdown design documents from front-end screenshots
//!
//! # Overview
//!
//! design-lens sends a page design image to an OpenAI-compatible
//! chat-completions endpoint together with a fixed "front-end engineer"
//! prompt and returns the model's Markdown analysis (layout, content and
//! function, common styles).
//!
//! Two surfaces share one client:
//! - the `design-lens` CLI writes `<image>.md` next to the input
//! - the `design-lens-mcp` server exposes `analyze_image_tool` over stdio
//!
//! # Quick Start
//!
//! ```no_run
//! use design_lens::{AnalysisClient, AnalysisConfig, ImageAnalyzer};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // OPENAI_API_URL and OPENAI_API_KEY are required
//!     let config = AnalysisConfig::from_env()?;
//!     let client = AnalysisClient::new(config)?;
//!
//!     let markdown = client.analyze("designs/landing.png".as_ref()).await?;
//!     println!("{}", markdown);
//!
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod cli;
pub mod config;
mod error;
#[cfg(feature = "logging")]
pub mod logging;
pub mod server;

// Re-exports for convenience
pub use backend::{
    AnalysisClient, AnalysisOutcome, AnalysisRequest, EncodedImage, FRONTEND_EXPERT_PROMPT,
    ImageAnalyzer, MimePolicy, TokenUsage, USER_INSTRUCTION, build_headers, build_request,
    encode_image,
};
pub use config::{AnalysisConfig, DEFAULT_MODEL};
pub use error::{AnalyzerError, IMAGE_READ_FAILURE_MESSAGE, Result};
pub use server::ToolServer;

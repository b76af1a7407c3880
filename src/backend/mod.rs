pub mod client;
pub mod media;
pub mod request;
pub(crate) mod response;
pub mod usage;
pub(crate) mod utils;

pub use client::{AnalysisClient, ImageAnalyzer};
pub use media::{EncodedImage, MimePolicy, encode_image};
pub use request::{AnalysisRequest, FRONTEND_EXPERT_PROMPT, USER_INSTRUCTION, build_headers, build_request};
pub use usage::{AnalysisOutcome, TokenUsage};

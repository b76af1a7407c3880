//! Chat-completions payload for a design screenshot.
//!
//! This is the only place the prompts live; the CLI and the tool server both
//! build their requests here.

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};

use crate::backend::media::EncodedImage;
use crate::config::AnalysisConfig;
use crate::error::{AnalyzerError, Result};

/// System prompt: act as a front-end engineer and write a Markdown design
/// document with Layout, Content & Function, and Common Styles (as a table).
pub const FRONTEND_EXPERT_PROMPT: &str = "
        你是一个专业的前端开发工程师，你的工作是仔细观察提供的前端页面设计图，分析其内容细节、样式布局等关键信息，输出设计文档。以下是设计要求：
        1.应用要与设计图内容、布局上保持一致；
        2.关注背景颜色、字号字色、margin、padding等样式；
        3.标题、正文与设计图中的完全一致；
        使用 Markdown 语法输出，不要包含在代码块中，符合以下结构：
        1. 布局：将页面分块并总结每个分块的功能
        2. 内容与功能：对于每个分块，描述其内容和功能细节
        3. 公共样式：以表格形式列出公共样式，包括字体、颜色、间距等
        ";

/// Instruction sent next to the image.
pub const USER_INSTRUCTION: &str = "根据这张前端页面设计图，分析页面内容、布局与样式。";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<MessagePart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MessagePart {
    ImageUrl { image_url: ImageUrl },
    Text { text: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

/// Request body posted to the chat-completions endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
}

/// Authorization, content-type and accept headers for the endpoint.
pub fn build_headers(config: &AnalysisConfig) -> Result<HeaderMap> {
    let mut bearer = HeaderValue::from_str(&format!("Bearer {}", config.api_key()))
        .map_err(|_| AnalyzerError::Config("API key is not a valid header value".to_string()))?;
    bearer.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    Ok(headers)
}

/// Body with exactly two messages: the system prompt, then the image and instruction.
pub fn build_request(image: &EncodedImage, config: &AnalysisConfig) -> AnalysisRequest {
    AnalysisRequest {
        model: config.model_name().to_string(),
        messages: vec![
            ChatMessage {
                role: Role::System,
                content: MessageContent::Text(FRONTEND_EXPERT_PROMPT.to_string()),
            },
            ChatMessage {
                role: Role::User,
                content: MessageContent::Parts(vec![
                    MessagePart::ImageUrl {
                        image_url: ImageUrl {
                            url: image.data_uri(),
                        },
                    },
                    MessagePart::Text {
                        text: USER_INSTRUCTION.to_string(),
                    },
                ]),
            },
        ],
    }
}

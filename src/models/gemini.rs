//! Gemini generateContent 请求 / 响应

use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::SummarizeError;

/// 总结提示词，文字记录原样拼接在末尾
pub const SUMMARY_PROMPT: &str = "Please summarize the following YouTube video transcript in a very beginner-friendly and easy-to-understand way. Assume the reader has no prior knowledge of the topic. Break down complex ideas simply, use analogies if helpful, and keep the language clear and concise. Focus on the main points and key takeaways.";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub parts: Vec<Part>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_k: u32,
    pub top_p: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

impl GenerateContentRequest {
    /// 构建总结请求
    pub fn summarize(transcript: &str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part {
                    text: build_prompt(transcript),
                }],
            }],
            generation_config: GenerationConfig::default(),
        }
    }
}

/// 构建总结提示词
pub fn build_prompt(transcript: &str) -> String {
    format!("{}\n\nTranscript:\n{}", SUMMARY_PROMPT, transcript)
}

/// 错误响应中的 `error` 字段
#[derive(Debug, Clone, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

/// 从响应 JSON 中取出 `candidates[0].content.parts[0].text`
///
/// 路径上任意一环缺失时返回 `MalformedResponse`，
/// 若响应中带有 `error.message` 则使用它作为提示
pub fn extract_summary(result: &JsonValue) -> Result<String, SummarizeError> {
    let text = result
        .get("candidates")
        .and_then(|v| v.as_array())
        .and_then(|candidates| candidates.first())
        .and_then(|candidate| candidate.get("content"))
        .and_then(|content| content.get("parts"))
        .and_then(|v| v.as_array())
        .and_then(|parts| parts.first())
        .and_then(|part| part.get("text"))
        .and_then(|v| v.as_str());

    match text {
        Some(text) => Ok(text.to_string()),
        None => {
            let api_message = result
                .get("error")
                .cloned()
                .and_then(|v| serde_json::from_value::<ApiErrorBody>(v).ok())
                .and_then(|e| e.message)
                .filter(|m| !m.is_empty());
            Err(SummarizeError::MalformedResponse { api_message })
        }
    }
}

//! 跨上下文消息定义
//!
//! 面板、后台编排、页面提取三者之间只通过这些消息通信，
//! JSON 格式与浏览器扩展的 `action` 约定保持一致。

use serde::{Deserialize, Serialize};

use crate::models::transcript::ExtractionResult;

/// 面板发出的请求
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PanelRequest {
    /// 请求页面提取文字记录
    GetTranscript,
    /// 请求总结
    SummarizeVideo {
        #[serde(default)]
        transcript: Option<String>,
        #[serde(default, rename = "apiKey")]
        api_key: Option<String>,
    },
    /// 保存 API Key
    SaveApiKey {
        #[serde(rename = "apiKey")]
        api_key: String,
    },
}

/// 发往面板的事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum PanelEvent {
    ShowLoading,
    ShowSummary { summary: String },
    ShowError { message: String },
    ApiKeySaved,
}

impl PanelEvent {
    /// 总结流程的终止事件
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            PanelEvent::ShowSummary { .. } | PanelEvent::ShowError { .. }
        )
    }
}

/// 页面提取对 `getTranscript` 的回复
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranscriptReply {
    Transcript { transcript: String },
    Error { error: String },
}

pub const NO_TRANSCRIPT_FOUND: &str = "No transcript found on the page or unable to extract.";

impl From<ExtractionResult> for TranscriptReply {
    fn from(result: ExtractionResult) -> Self {
        match result {
            ExtractionResult::Found(transcript) if !transcript.is_empty() => {
                TranscriptReply::Transcript {
                    transcript: transcript.into_inner(),
                }
            }
            ExtractionResult::Found(_) | ExtractionResult::NotFound => TranscriptReply::Error {
                error: NO_TRANSCRIPT_FOUND.to_string(),
            },
            ExtractionResult::Error(detail) => TranscriptReply::Error {
                error: format!("Error during transcript extraction: {}", detail),
            },
        }
    }
}

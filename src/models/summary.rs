//! 总结请求与结果

use crate::error::SummarizeError;
use crate::models::messages::PanelEvent;

/// 一次总结请求
///
/// 只能通过 [`SummaryRequest::new`] 构造，两个字段都保证非空
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRequest {
    transcript: String,
    credential: String,
}

impl SummaryRequest {
    /// 校验顺序：先文字记录，再凭据
    pub fn new(
        transcript: Option<String>,
        credential: Option<String>,
    ) -> Result<Self, SummarizeError> {
        let transcript = transcript
            .filter(|t| !t.trim().is_empty())
            .ok_or(SummarizeError::MissingTranscript)?;
        let credential = credential
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty())
            .ok_or(SummarizeError::MissingCredential)?;
        Ok(Self {
            transcript,
            credential,
        })
    }

    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }
}

/// 总结流程的最终输出
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryResult {
    Summary(String),
    Error(String),
}

impl SummaryResult {
    pub fn is_summary(&self) -> bool {
        matches!(self, SummaryResult::Summary(_))
    }

    /// 转换为发往面板的终止事件
    pub fn to_event(&self) -> PanelEvent {
        match self {
            SummaryResult::Summary(summary) => PanelEvent::ShowSummary {
                summary: summary.clone(),
            },
            SummaryResult::Error(message) => PanelEvent::ShowError {
                message: message.clone(),
            },
        }
    }
}

impl From<Result<String, SummarizeError>> for SummaryResult {
    fn from(result: Result<String, SummarizeError>) -> Self {
        match result {
            Ok(summary) => SummaryResult::Summary(summary),
            Err(e) => SummaryResult::Error(e.to_string()),
        }
    }
}

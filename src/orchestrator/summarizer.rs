//! 总结编排 - 编排层
//!
//! 文字记录 + 凭据 → Gemini 请求 → 解析响应 → 面板事件
//!
//! 事件顺序：输入校验通过后先发 `ShowLoading`，最后恰好发一次终止事件
//! （`ShowSummary` 或 `ShowError`）。输入校验失败时只发终止事件。

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use serde_json::Value as JsonValue;
use tokio::time::timeout;
use tracing::{debug, error, info};

use crate::config::Config;
use crate::error::SummarizeError;
use crate::infrastructure::HttpTransport;
use crate::models::gemini::{extract_summary, GenerateContentRequest};
use crate::models::{PanelEvent, SummaryRequest, SummaryResult};
use crate::orchestrator::events::EventSink;
use crate::services::{CredentialStore, ResilientCaller};
use crate::utils::{redact_key, truncate_text};

/// Gemini 接口地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    base_url: String,
    model: String,
}

impl Endpoint {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.gemini_api_base_url, &config.gemini_model_name)
    }

    /// 凭据通过 `key` 查询参数传递（按查询参数编码，`&`、`#` 等字符原样送达）
    pub fn generate_content_url(&self, credential: &str) -> Result<String, SummarizeError> {
        let base = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );
        let url = Url::parse_with_params(&base, &[("key", credential)])
            .map_err(|e| SummarizeError::InvalidEndpoint(format!("{}: {}", base, e)))?;
        Ok(url.into())
    }
}

/// 总结编排器
pub struct Orchestrator<T> {
    caller: ResilientCaller<T>,
    endpoint: Endpoint,
    credentials: Arc<dyn CredentialStore>,
    deadline: Option<Duration>,
}

impl<T: HttpTransport> Orchestrator<T> {
    pub fn new(
        caller: ResilientCaller<T>,
        endpoint: Endpoint,
        credentials: Arc<dyn CredentialStore>,
    ) -> Self {
        Self {
            caller,
            endpoint,
            credentials,
            deadline: None,
        }
    }

    /// 整体截止时间（包含所有重试和退避等待）
    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    /// 生成总结
    ///
    /// # 参数
    /// - `transcript`: 文字记录（面板提取或用户粘贴）
    /// - `credential`: 消息中携带的 API Key，为空时从凭据存储读取
    /// - `sink`: 面板事件出口
    pub async fn summarize(
        &self,
        transcript: Option<String>,
        credential: Option<String>,
        sink: &dyn EventSink,
    ) -> SummaryResult {
        let result = self.run(transcript, credential, sink).await;

        match &result {
            Ok(summary) => info!("✓ 总结生成成功: {}", truncate_text(summary, 60)),
            Err(e) if e.is_missing_input() => info!("⚠️ 输入不完整: {}", e),
            Err(e) => error!("❌ 总结失败: {}", e),
        }

        let summary = SummaryResult::from(result);
        sink.emit(summary.to_event());
        summary
    }

    async fn run(
        &self,
        transcript: Option<String>,
        credential: Option<String>,
        sink: &dyn EventSink,
    ) -> Result<String, SummarizeError> {
        let transcript = transcript
            .filter(|t| !t.trim().is_empty())
            .ok_or(SummarizeError::MissingTranscript)?;
        let credential = self.resolve_credential(credential).await?;
        let request = SummaryRequest::new(Some(transcript), credential)?;

        sink.emit(PanelEvent::ShowLoading);
        info!(
            "🤖 请求总结，文字记录 {} 字符",
            request.transcript().chars().count()
        );

        match self.deadline {
            Some(deadline) => timeout(deadline, self.request_summary(&request))
                .await
                .map_err(|_| SummarizeError::DeadlineExceeded(deadline))?,
            None => self.request_summary(&request).await,
        }
    }

    /// 消息中的凭据优先，否则读取存储
    async fn resolve_credential(
        &self,
        credential: Option<String>,
    ) -> Result<Option<String>, SummarizeError> {
        match credential.filter(|c| !c.trim().is_empty()) {
            Some(credential) => Ok(Some(credential)),
            None => {
                debug!("消息中没有 API Key，读取凭据存储");
                Ok(self.credentials.get().await?)
            }
        }
    }

    async fn request_summary(&self, request: &SummaryRequest) -> Result<String, SummarizeError> {
        let url = self.endpoint.generate_content_url(request.credential())?;
        let body = serde_json::to_value(GenerateContentRequest::summarize(request.transcript()))?;

        debug!("调用 Gemini: {}", redact_key(&url));
        let response = self.caller.call(&url, &body).await?;
        let result: JsonValue = response.json()?;

        extract_summary(&result)
    }
}

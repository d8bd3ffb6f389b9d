//! 消息路由
//!
//! 每个上下文只处理自己负责的请求，其余的直接忽略：
//!
//! - [`BackgroundContext`]：`summarizeVideo`、`saveApiKey`
//! - [`PageContext`]：`getTranscript`

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::infrastructure::HttpTransport;
use crate::models::{PanelEvent, PanelRequest, TranscriptReply};
use crate::orchestrator::events::EventSink;
use crate::orchestrator::summarizer::Orchestrator;
use crate::services::{CredentialStore, PageAdapter};
use crate::workflow::ExtractionFlow;

/// 保存空 Key 时的提示
pub const EMPTY_API_KEY_MESSAGE: &str = "Please enter an API key.";

/// 后台上下文
pub struct BackgroundContext<T> {
    orchestrator: Orchestrator<T>,
    credentials: Arc<dyn CredentialStore>,
}

impl<T: HttpTransport> BackgroundContext<T> {
    pub fn new(orchestrator: Orchestrator<T>, credentials: Arc<dyn CredentialStore>) -> Self {
        Self {
            orchestrator,
            credentials,
        }
    }

    /// 处理面板请求，结果通过 `sink` 发出
    pub async fn handle(&self, request: PanelRequest, sink: &dyn EventSink) {
        match request {
            PanelRequest::SummarizeVideo {
                transcript,
                api_key,
            } => {
                self.orchestrator.summarize(transcript, api_key, sink).await;
            }
            PanelRequest::SaveApiKey { api_key } => self.save_api_key(api_key, sink).await,
            PanelRequest::GetTranscript => debug!("后台不处理 getTranscript，忽略"),
        }
    }

    async fn save_api_key(&self, api_key: String, sink: &dyn EventSink) {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            sink.emit(PanelEvent::ShowError {
                message: EMPTY_API_KEY_MESSAGE.to_string(),
            });
            return;
        }

        match self.credentials.set(api_key.to_string()).await {
            Ok(()) => {
                info!("🔑 API Key 已保存");
                sink.emit(PanelEvent::ApiKeySaved);
            }
            Err(e) => {
                warn!("⚠️ API Key 保存失败: {}", e);
                sink.emit(PanelEvent::ShowError {
                    message: format!("Failed to save API key: {}", e),
                });
            }
        }
    }
}

/// 页面上下文
///
/// 持有每种页面布局的适配器，按顺序尝试
pub struct PageContext {
    adapters: Vec<Box<dyn PageAdapter>>,
    flow: ExtractionFlow,
}

impl PageContext {
    pub fn new(adapters: Vec<Box<dyn PageAdapter>>, flow: ExtractionFlow) -> Self {
        Self { adapters, flow }
    }

    /// 只回复 `getTranscript`，其他请求返回 `None`
    pub async fn handle(&self, request: &PanelRequest) -> Option<TranscriptReply> {
        match request {
            PanelRequest::GetTranscript => {
                let layouts: Vec<&dyn PageAdapter> =
                    self.adapters.iter().map(|a| a.as_ref()).collect();
                let result = self.flow.run_layouts(&layouts).await;
                Some(TranscriptReply::from(result))
            }
            _ => None,
        }
    }
}

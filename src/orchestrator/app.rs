//! 应用入口 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：启动日志、连接浏览器、创建 JsExecutor、凭据存储和 HTTP 传输层
//! 2. **页面上下文**：对当前视频页执行 `getTranscript`
//! 3. **手动粘贴**：提取失败时从 `TRANSCRIPT_FILE` 读取文字记录
//! 4. **后台上下文**：执行 `summarizeVideo`
//! 5. **面板投影**：把回复和事件折叠进 `PanelState` 并输出
//!
//! 只有本模块持有 Browser，其余层只拿到 JsExecutor 或 trait 对象。

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chromiumoxide::Browser;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::browser;
use crate::config::Config;
use crate::error::CredentialError;
use crate::infrastructure::{JsExecutor, ReqwestTransport};
use crate::models::{PanelEvent, PanelRequest};
use crate::orchestrator::router::{BackgroundContext, PageContext};
use crate::orchestrator::summarizer::{Endpoint, Orchestrator};
use crate::panel::{NoticeLevel, PanelState};
use crate::services::{
    ChromiumPageAdapter, CredentialStore, FileCredentialStore, PageAdapter, ResilientCaller,
};
use crate::utils::logging::log_startup;
use crate::workflow::ExtractionFlow;

/// 应用主结构
pub struct App {
    config: Config,
    _browser: Browser,
    executor: JsExecutor,
    credentials: Arc<dyn CredentialStore>,
    background: BackgroundContext<ReqwestTransport>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        // 连接浏览器
        let (browser, page) =
            browser::connect_to_browser_and_page(config.browser_debug_port, Some(&config.target_url))
                .await?;

        // 创建 JsExecutor（持有 page）
        let executor = JsExecutor::new(page);

        let credentials: Arc<dyn CredentialStore> =
            Arc::new(FileCredentialStore::new(&config.credential_file));
        let transport = ReqwestTransport::new(Duration::from_secs(config.http_timeout_secs))?;
        let orchestrator = Orchestrator::new(
            ResilientCaller::new(transport, config.retry_policy()),
            Endpoint::from_config(&config),
            credentials.clone(),
        )
        .with_deadline(config.request_deadline());
        let background = BackgroundContext::new(orchestrator, credentials.clone());

        Ok(Self {
            config,
            _browser: browser,
            executor,
            credentials,
            background,
        })
    }

    /// 运行一次完整的"提取 → 总结"流程
    pub async fn run(&self) -> Result<()> {
        let mut panel = PanelState::new();

        let url = self.executor.current_url().await?.unwrap_or_default();
        if !browser::is_watch_page(&url) {
            panel.not_watch_page();
            print_panel(&panel);
            return Ok(());
        }
        if let Some(id) = browser::video_id(&url)? {
            info!("🎬 当前视频: {}", id);
        }

        // 页面上下文：提取文字记录
        let page_context = self.page_context();
        let reply = page_context.handle(&PanelRequest::GetTranscript).await;
        panel.apply_transcript_reply(reply);

        if let Some(path) = &self.config.transcript_file {
            if let Err(e) = apply_pasted_transcript(&mut panel, path).await {
                warn!("⚠️ 读取粘贴的文字记录失败: {:#}", e);
            }
        }

        let request = summarize_request(
            &mut panel,
            self.config.gemini_api_key.as_deref(),
            self.credentials.as_ref(),
        )
        .await?;
        let Some(request) = request else {
            print_panel(&panel);
            return Ok(());
        };

        self.dispatch(request, &mut panel).await;

        print_panel(&panel);
        Ok(())
    }

    fn page_context(&self) -> PageContext {
        let adapters = ChromiumPageAdapter::for_all_layouts(&self.executor)
            .into_iter()
            .map(|adapter| Box::new(adapter) as Box<dyn PageAdapter>)
            .collect();
        PageContext::new(adapters, ExtractionFlow::new(self.config.settle_timings()))
    }

    /// 发送请求到后台上下文，并把产生的事件应用到面板
    async fn dispatch(&self, request: PanelRequest, panel: &mut PanelState) {
        let (tx, mut rx) = mpsc::unbounded_channel::<PanelEvent>();
        self.background.handle(request, &tx).await;
        drop(tx);

        while let Some(event) = rx.recv().await {
            panel.apply(&event);
        }
    }
}

/// 输入框为空时，用文件内容充当手动粘贴的文字记录
async fn apply_pasted_transcript(panel: &mut PanelState, path: &str) -> Result<()> {
    if !panel.transcript_input.trim().is_empty() {
        return Ok(());
    }
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("无法读取文字记录文件: {}", path))?;
    if panel.paste_transcript(&text) {
        info!("📋 使用粘贴的文字记录: {}", path);
    }
    Ok(())
}

/// 组装 `summarizeVideo` 请求
///
/// 环境变量中的 Key 只随消息发送，不写入凭据存储；没有时读取已保存的 Key
async fn summarize_request(
    panel: &mut PanelState,
    env_api_key: Option<&str>,
    credentials: &dyn CredentialStore,
) -> Result<Option<PanelRequest>, CredentialError> {
    let api_key = match env_api_key {
        Some(key) => Some(key.to_string()),
        None => credentials.get().await?,
    };
    Ok(panel
        .begin_summarize(api_key.as_deref())
        .map(|transcript| PanelRequest::SummarizeVideo {
            transcript: Some(transcript),
            api_key,
        }))
}

// ========== 输出辅助函数 ==========

fn print_panel(panel: &PanelState) {
    info!("\n{}", "=".repeat(60));
    if let Some(notice) = &panel.notice {
        match notice.level {
            NoticeLevel::Error | NoticeLevel::Warning => warn!("⚠️ {}", notice.text),
            NoticeLevel::Info | NoticeLevel::Success => info!("✓ {}", notice.text),
        }
    }
    info!("{}", "=".repeat(60));
    if !panel.output.is_empty() {
        println!("{}", panel.output);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TranscriptReply;
    use crate::services::MemoryCredentialStore;

    fn temp_transcript(name: &str, content: &str) -> String {
        let path = std::env::temp_dir().join(format!(
            "transcript_summarizer_{}_{}.txt",
            std::process::id(),
            name
        ));
        std::fs::write(&path, content).unwrap();
        path.display().to_string()
    }

    #[tokio::test]
    async fn test_pasted_transcript_reaches_summarize_request() {
        let path = temp_transcript("pasted", "  pasted transcript text \n");
        let store = MemoryCredentialStore::with_value("SAVED");
        let mut panel = PanelState::new();
        panel.apply_transcript_reply(None);

        apply_pasted_transcript(&mut panel, &path).await.unwrap();
        let request = summarize_request(&mut panel, None, &store).await.unwrap();

        assert_eq!(
            request,
            Some(PanelRequest::SummarizeVideo {
                transcript: Some("pasted transcript text".to_string()),
                api_key: Some("SAVED".to_string()),
            })
        );
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_extracted_transcript_wins_over_pasted_file() {
        let path = temp_transcript("ignored", "pasted");
        let mut panel = PanelState::new();
        panel.apply_transcript_reply(Some(TranscriptReply::Transcript {
            transcript: "from video".to_string(),
        }));

        apply_pasted_transcript(&mut panel, &path).await.unwrap();

        assert_eq!(panel.transcript_input, "from video");
        let _ = std::fs::remove_file(&path);
    }

    #[tokio::test]
    async fn test_missing_transcript_file_is_error() {
        let mut panel = PanelState::new();

        let result = apply_pasted_transcript(&mut panel, "/nonexistent/transcript.txt").await;

        assert!(result.is_err());
        assert!(panel.transcript_input.is_empty());
    }

    #[tokio::test]
    async fn test_env_key_sent_with_message_without_saving() {
        let store = MemoryCredentialStore::with_value("SAVED");
        let mut panel = PanelState::new();
        panel.transcript_input = "text".to_string();

        let request = summarize_request(&mut panel, Some("ENV_KEY"), &store)
            .await
            .unwrap();

        assert_eq!(
            request,
            Some(PanelRequest::SummarizeVideo {
                transcript: Some("text".to_string()),
                api_key: Some("ENV_KEY".to_string()),
            })
        );
        assert_eq!(store.get().await.unwrap(), Some("SAVED".to_string()));
    }

    #[tokio::test]
    async fn test_no_key_anywhere_stops_before_request() {
        let store = MemoryCredentialStore::new();
        let mut panel = PanelState::new();
        panel.transcript_input = "text".to_string();

        let request = summarize_request(&mut panel, None, &store).await.unwrap();

        assert_eq!(request, None);
        assert_eq!(
            panel.notice.unwrap().text,
            crate::panel::state::MISSING_KEY_MESSAGE
        );
    }
}

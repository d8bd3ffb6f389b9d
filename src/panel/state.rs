//! 面板状态
//!
//! 把文字记录回复和后台事件折叠成面板上能看到的内容：
//! 输出区、文字记录输入框、提示条、加载状态。

use crate::models::{PanelEvent, TranscriptReply};

pub const SUMMARIZING_TEXT: &str = "Summarizing...";
pub const NOT_WATCH_PAGE_MESSAGE: &str = "Navigate to a YouTube video page to use the summarizer.";
pub const MISSING_KEY_MESSAGE: &str = "Please save your Gemini API Key first.";
pub const MISSING_TRANSCRIPT_MESSAGE: &str = "No transcript found or pasted. Please ensure you are on a YouTube video page with an available transcript, or paste it manually.";
pub const TRANSCRIPT_LOADED_MESSAGE: &str = "Transcript loaded from video. Click Summarize.";
pub const NO_REPLY_MESSAGE: &str = "Could not automatically get transcript. Please open the YouTube transcript panel or paste manually.";
pub const SUMMARY_READY_MESSAGE: &str = "Summary generated!";
pub const API_KEY_SAVED_MESSAGE: &str = "API Key saved!";
pub const PASTED_TRANSCRIPT_MESSAGE: &str = "Using pasted transcript. Click Summarize.";

/// 提示级别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// 提示条
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    fn new(level: NoticeLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// 面板状态
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelState {
    pub loading: bool,
    pub output: String,
    pub transcript_input: String,
    pub notice: Option<Notice>,
    awaiting_result: bool,
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// 是否正在等待总结结果
    pub fn is_awaiting_result(&self) -> bool {
        self.awaiting_result
    }

    /// 当前标签页不是视频页
    pub fn not_watch_page(&mut self) {
        self.notice = Some(Notice::new(NoticeLevel::Warning, NOT_WATCH_PAGE_MESSAGE));
    }

    /// 应用页面对 `getTranscript` 的回复
    ///
    /// `None` 表示页面没有回复（内容脚本未注入或已卸载）
    pub fn apply_transcript_reply(&mut self, reply: Option<TranscriptReply>) {
        self.notice = Some(match reply {
            Some(TranscriptReply::Transcript { transcript }) => {
                self.transcript_input = transcript;
                Notice::new(NoticeLevel::Success, TRANSCRIPT_LOADED_MESSAGE)
            }
            Some(TranscriptReply::Error { error }) => Notice::new(
                NoticeLevel::Error,
                format!("Failed to get transcript: {}. Please paste manually.", error),
            ),
            None => Notice::new(NoticeLevel::Warning, NO_REPLY_MESSAGE),
        });
    }

    /// 手动粘贴文字记录
    ///
    /// 只在输入框为空时生效，空白内容忽略
    pub fn paste_transcript(&mut self, text: &str) -> bool {
        if !self.transcript_input.trim().is_empty() || text.trim().is_empty() {
            return false;
        }
        self.transcript_input = text.trim().to_string();
        self.notice = Some(Notice::new(NoticeLevel::Info, PASTED_TRANSCRIPT_MESSAGE));
        true
    }

    /// 点击"总结"前的本地校验
    ///
    /// 通过后返回要发送的文字记录；不通过时设置提示并返回 `None`
    pub fn begin_summarize(&mut self, api_key: Option<&str>) -> Option<String> {
        if api_key.map_or(true, |k| k.trim().is_empty()) {
            self.notice = Some(Notice::new(NoticeLevel::Error, MISSING_KEY_MESSAGE));
            return None;
        }
        let transcript = self.transcript_input.trim();
        if transcript.is_empty() {
            self.notice = Some(Notice::new(NoticeLevel::Error, MISSING_TRANSCRIPT_MESSAGE));
            return None;
        }
        Some(transcript.to_string())
    }

    /// 应用后台事件
    ///
    /// 终止事件只在等待结果时生效，迟到或重复的事件被忽略
    pub fn apply(&mut self, event: &PanelEvent) {
        match event {
            PanelEvent::ShowLoading => {
                self.loading = true;
                self.awaiting_result = true;
                self.output = SUMMARIZING_TEXT.to_string();
                self.notice = None;
            }
            PanelEvent::ShowSummary { .. } | PanelEvent::ShowError { .. }
                if !self.awaiting_result =>
            {
                if let PanelEvent::ShowError { message } = event {
                    // 输入校验失败时没有 ShowLoading，仍需提示
                    self.notice = Some(Notice::new(NoticeLevel::Error, message.clone()));
                }
            }
            PanelEvent::ShowSummary { summary } => {
                self.finish();
                self.output = summary.clone();
                self.notice = Some(Notice::new(NoticeLevel::Success, SUMMARY_READY_MESSAGE));
            }
            PanelEvent::ShowError { message } => {
                self.finish();
                self.output = format!("Error: {}", message);
                self.notice = Some(Notice::new(NoticeLevel::Error, message.clone()));
            }
            PanelEvent::ApiKeySaved => {
                self.notice = Some(Notice::new(NoticeLevel::Success, API_KEY_SAVED_MESSAGE));
            }
        }
    }

    fn finish(&mut self) {
        self.loading = false;
        self.awaiting_result = false;
    }
}

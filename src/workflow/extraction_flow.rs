//! 文字记录提取流程 - 流程层
//!
//! 核心职责：定义"从一个视频页拿到文字记录"的完整步骤
//!
//! 状态流转：
//! ```text
//! Idle ──(面板已打开)──────────────────────────────┐
//!  │                                               ↓
//!  └→ SeekingDirectButton ──(点击)──→ PanelWait → Harvesting → Done
//!          │                            ↑    │
//!          ↓                            │    └→ NotAvailable
//!      SeekingMenu ──(点击)→ MenuOpened ┘
//!          │                   │
//!          └→ NotAvailable ←───┘ (没有匹配的菜单项)
//! ```
//!
//! 任何 DOM 异常都会被捕获并转换为 `ExtractionResult::Error`，不会向外抛出。

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::SettleTimings;
use crate::error::DomError;
use crate::models::{ExtractionResult, Transcript};
use crate::services::{ContainerKind, Control, MenuLabelMatcher, PageAdapter};

/// 提取状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionState {
    Idle,
    SeekingDirectButton,
    SeekingMenu,
    MenuOpened,
    PanelWait,
    Harvesting(ContainerKind),
    Done(Transcript),
    NotAvailable,
}

impl ExtractionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ExtractionState::Done(_) | ExtractionState::NotAvailable)
    }
}

/// 文字记录提取流程
///
/// - 每次 `run` 都是全新的一轮，不保留状态
/// - 只依赖 `PageAdapter`，不直接操作 DOM
pub struct ExtractionFlow {
    timings: SettleTimings,
    matcher: MenuLabelMatcher,
}

impl ExtractionFlow {
    pub fn new(timings: SettleTimings) -> Self {
        Self {
            timings,
            matcher: MenuLabelMatcher::transcript(),
        }
    }

    pub fn with_matcher(mut self, matcher: MenuLabelMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// 在一个页面布局上执行提取
    pub async fn run<P: PageAdapter + ?Sized>(&self, page: &P) -> ExtractionResult {
        match self.drive(page).await {
            Ok(ExtractionState::Done(transcript)) => {
                info!(
                    "[{}] ✓ 已读取文字记录，共 {} 字符",
                    page.layout_name(),
                    transcript.char_count()
                );
                ExtractionResult::Found(transcript)
            }
            Ok(_) => {
                info!("[{}] 未找到文字记录面板", page.layout_name());
                ExtractionResult::NotFound
            }
            Err(e) => {
                warn!("[{}] ⚠️ 提取文字记录时出错: {}", page.layout_name(), e);
                ExtractionResult::Error(e.to_string())
            }
        }
    }

    /// 依次尝试多个页面布局，返回第一个非空结果
    ///
    /// 全部未找到时：若有布局出错则返回最后一个错误，否则返回 `NotFound`
    pub async fn run_layouts(&self, pages: &[&dyn PageAdapter]) -> ExtractionResult {
        let mut last_error = None;

        for page in pages {
            debug!("尝试页面布局: {}", page.layout_name());
            match self.run(*page).await {
                result if result.is_found() => return result,
                ExtractionResult::Error(detail) => last_error = Some(detail),
                _ => {}
            }
        }

        last_error
            .map(ExtractionResult::Error)
            .unwrap_or(ExtractionResult::NotFound)
    }

    async fn drive<P: PageAdapter + ?Sized>(&self, page: &P) -> Result<ExtractionState, DomError> {
        let mut state = ExtractionState::Idle;
        while !state.is_terminal() {
            debug!("[{}] 状态: {:?}", page.layout_name(), state);
            state = self.step(page, state).await?;
        }
        Ok(state)
    }

    async fn step<P: PageAdapter + ?Sized>(
        &self,
        page: &P,
        state: ExtractionState,
    ) -> Result<ExtractionState, DomError> {
        let next = match state {
            ExtractionState::Idle => match self.find_container(page).await? {
                Some(kind) => {
                    debug!("[{}] 文字记录面板已打开，直接读取", page.layout_name());
                    ExtractionState::Harvesting(kind)
                }
                None => ExtractionState::SeekingDirectButton,
            },

            ExtractionState::SeekingDirectButton => {
                if page.is_present(Control::DirectTranscriptButton).await? {
                    info!("[{}] 🖱️ 点击\"显示文字记录\"按钮", page.layout_name());
                    page.click(Control::DirectTranscriptButton).await?;
                    settle(self.timings.panel).await;
                    ExtractionState::PanelWait
                } else {
                    ExtractionState::SeekingMenu
                }
            }

            ExtractionState::SeekingMenu => {
                if page.is_present(Control::OverflowMenu).await? {
                    debug!("[{}] 打开\"更多操作\"菜单", page.layout_name());
                    page.click(Control::OverflowMenu).await?;
                    settle(self.timings.menu).await;
                    ExtractionState::MenuOpened
                } else {
                    ExtractionState::NotAvailable
                }
            }

            ExtractionState::MenuOpened => {
                let labels = page.menu_item_labels().await?;
                match self.matcher.find(&labels) {
                    Some(index) => {
                        info!(
                            "[{}] 🖱️ 点击菜单项: {}",
                            page.layout_name(),
                            labels[index].trim()
                        );
                        page.click_menu_item(index).await?;
                        settle(self.timings.panel).await;
                        ExtractionState::PanelWait
                    }
                    None => {
                        debug!(
                            "[{}] 菜单中没有文字记录入口: {:?}",
                            page.layout_name(),
                            labels
                        );
                        // 关闭菜单，失败不影响结果
                        if let Err(e) = page.click(Control::OverflowMenu).await {
                            debug!("[{}] 关闭菜单失败: {}", page.layout_name(), e);
                        }
                        ExtractionState::NotAvailable
                    }
                }
            }

            ExtractionState::PanelWait => match self.find_container(page).await? {
                Some(kind) => ExtractionState::Harvesting(kind),
                None => ExtractionState::NotAvailable,
            },

            ExtractionState::Harvesting(kind) => {
                let segments = page.segment_texts(kind).await?;
                debug!(
                    "[{}] {:?} 中找到 {} 个片段",
                    page.layout_name(),
                    kind,
                    segments.len()
                );
                ExtractionState::Done(Transcript::from_segments(segments))
            }

            terminal @ (ExtractionState::Done(_) | ExtractionState::NotAvailable) => terminal,
        };
        Ok(next)
    }

    async fn find_container<P: PageAdapter + ?Sized>(
        &self,
        page: &P,
    ) -> Result<Option<ContainerKind>, DomError> {
        for kind in ContainerKind::PRIORITY {
            if page.has_container(kind).await? {
                return Ok(Some(kind));
            }
        }
        Ok(None)
    }
}

impl Default for ExtractionFlow {
    fn default() -> Self {
        Self::new(SettleTimings::default())
    }
}

async fn settle(duration: Duration) {
    if !duration.is_zero() {
        sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    fn flow() -> ExtractionFlow {
        ExtractionFlow::new(SettleTimings::none())
    }

    #[tokio::test]
    async fn test_direct_button_is_clicked_and_segments_joined() {
        let page = FakePage::new()
            .with_direct_button()
            .revealing(ContainerKind::EngagementPanel)
            .with_segments(&["Hello", "world", "test"]);

        let result = flow().run(&page).await;

        assert_eq!(
            result,
            ExtractionResult::Found(Transcript::from_segments(["Hello", "world", "test"]))
        );
        assert_eq!(result.transcript_text(), Some("Hello world test"));
        assert_eq!(page.clicks(), vec!["DirectTranscriptButton"]);
    }

    #[tokio::test]
    async fn test_nothing_on_page_is_not_available() {
        let page = FakePage::new();

        let result = flow().run(&page).await;

        assert_eq!(result, ExtractionResult::NotFound);
        assert!(page.clicks().is_empty());
    }

    #[tokio::test]
    async fn test_menu_item_used_when_no_direct_button() {
        let page = FakePage::new()
            .with_menu(&["Report", "Show transcript"])
            .revealing(ContainerKind::SegmentList)
            .with_segments(&[" first ", "second"]);

        let result = flow().run(&page).await;

        assert_eq!(result.transcript_text(), Some("first second"));
        assert_eq!(
            page.clicks(),
            vec!["OverflowMenu", "MenuItem(Show transcript)"]
        );
    }

    #[tokio::test]
    async fn test_menu_label_variant_is_tolerated() {
        let page = FakePage::new()
            .with_menu(&["Save", "Open Transcript"])
            .revealing(ContainerKind::SegmentList)
            .with_segments(&["ok"]);

        let result = flow().run(&page).await;

        assert_eq!(result.transcript_text(), Some("ok"));
    }

    #[tokio::test]
    async fn test_custom_matcher_for_localized_menu() {
        let page = FakePage::new()
            .with_menu(&["举报", "内容转文字"])
            .revealing(ContainerKind::EngagementPanel)
            .with_segments(&["你好"]);

        let result = flow()
            .with_matcher(MenuLabelMatcher::new("内容转文字", "文字"))
            .run(&page)
            .await;

        assert_eq!(result.transcript_text(), Some("你好"));
        assert_eq!(page.clicks(), vec!["OverflowMenu", "MenuItem(内容转文字)"]);
    }

    #[tokio::test]
    async fn test_menu_without_transcript_is_closed() {
        let page = FakePage::new().with_menu(&["Report", "Save to playlist"]);

        let result = flow().run(&page).await;

        assert_eq!(result, ExtractionResult::NotFound);
        assert_eq!(page.clicks(), vec!["OverflowMenu", "OverflowMenu"]);
    }

    #[tokio::test]
    async fn test_menu_close_failure_is_ignored() {
        let page = FakePage::new()
            .with_menu(&["Report"])
            .failing_on_close();

        let result = flow().run(&page).await;

        assert_eq!(result, ExtractionResult::NotFound);
    }

    #[tokio::test]
    async fn test_clicked_but_no_container_is_not_available() {
        let page = FakePage::new().with_direct_button();

        let result = flow().run(&page).await;

        assert_eq!(result, ExtractionResult::NotFound);
        assert_eq!(page.clicks(), vec!["DirectTranscriptButton"]);
    }

    #[tokio::test]
    async fn test_open_panel_is_not_toggled_again() {
        let page = FakePage::new()
            .with_direct_button()
            .already_open(ContainerKind::SegmentList)
            .with_segments(&["already", "open"]);

        let result = flow().run(&page).await;

        assert_eq!(result.transcript_text(), Some("already open"));
        assert!(page.clicks().is_empty());
    }

    #[tokio::test]
    async fn test_engagement_panel_has_priority() {
        let page = FakePage::new()
            .already_open(ContainerKind::SegmentList)
            .already_open(ContainerKind::EngagementPanel);

        let kind = flow().find_container(&page).await.unwrap();

        assert_eq!(kind, Some(ContainerKind::EngagementPanel));
    }

    #[tokio::test]
    async fn test_dom_error_is_captured() {
        let page = FakePage::new()
            .with_direct_button()
            .revealing(ContainerKind::EngagementPanel)
            .failing_on_segments();

        let result = flow().run(&page).await;

        match result {
            ExtractionResult::Error(detail) => assert!(detail.contains("textContent")),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_empty_panel_is_found_but_empty() {
        let page = FakePage::new()
            .with_direct_button()
            .revealing(ContainerKind::EngagementPanel);

        let result = flow().run(&page).await;

        assert_eq!(result, ExtractionResult::Found(Transcript::default()));
        assert!(!result.is_found());
    }

    #[tokio::test]
    async fn test_layouts_tried_in_order() {
        let first = FakePage::new().named("first");
        let second = FakePage::new()
            .named("second")
            .with_direct_button()
            .revealing(ContainerKind::EngagementPanel)
            .with_segments(&["from", "second"]);

        let result = flow().run_layouts(&[&first, &second]).await;

        assert_eq!(result.transcript_text(), Some("from second"));
    }

    #[tokio::test]
    async fn test_layouts_report_error_when_nothing_found() {
        let broken = FakePage::new()
            .with_direct_button()
            .revealing(ContainerKind::EngagementPanel)
            .failing_on_segments();
        let empty = FakePage::new();

        let result = flow().run_layouts(&[&broken, &empty]).await;

        assert!(matches!(result, ExtractionResult::Error(_)));
        assert_eq!(
            flow().run_layouts(&[&empty]).await,
            ExtractionResult::NotFound
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_settle_intervals_are_waited() {
        let page = FakePage::new()
            .with_menu(&["Show transcript"])
            .revealing(ContainerKind::SegmentList)
            .with_segments(&["x"]);
        let start = tokio::time::Instant::now();

        ExtractionFlow::default().run(&page).await;

        assert_eq!(start.elapsed(), Duration::from_millis(500 + 1000));
    }
}

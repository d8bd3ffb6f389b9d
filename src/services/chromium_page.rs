//! 基于 Chromium 的页面适配 - 业务能力层
//!
//! 通过 `JsExecutor` 在视频页中执行脚本，每种页面布局对应一组选择器

use async_trait::async_trait;
use tracing::debug;

use crate::error::DomError;
use crate::infrastructure::JsExecutor;
use crate::services::page_adapter::{ContainerKind, Control, PageAdapter};

/// 一种页面布局的选择器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutProfile {
    pub name: &'static str,
    pub direct_button: &'static str,
    pub overflow_button: &'static str,
    pub menu_items: &'static str,
    pub engagement_panel: &'static str,
    pub segment_list: &'static str,
    pub segment_text: &'static str,
}

impl LayoutProfile {
    /// 视频简介中带"显示文字记录"区块的新版布局
    pub fn description_section() -> Self {
        Self {
            name: "description-section",
            direct_button: "ytd-video-description-transcript-section-renderer button",
            overflow_button: "ytd-watch-metadata button[aria-label=\"More actions\"]",
            menu_items: "tp-yt-iron-dropdown ytd-menu-service-item-renderer yt-formatted-string",
            engagement_panel: "ytd-engagement-panel-section-list-renderer[target-id=\"engagement-panel-searchable-transcript\"] #segments-container",
            segment_list: "ytd-transcript-segment-list-renderer #segments-container",
            segment_text: ".segment-text",
        }
    }

    /// 旧版布局：菜单渲染器上的按钮 / "更多操作"菜单
    pub fn legacy() -> Self {
        Self {
            name: "legacy-menu",
            direct_button: "tp-yt-paper-button.ytd-menu-renderer[aria-label=\"Show transcript\"]",
            overflow_button: "button[aria-label=\"More actions\"]",
            menu_items: "ytd-menu-service-item-renderer #text",
            engagement_panel: "ytd-engagement-panel-section-list-renderer[target-id=\"engagement-panel-transcript\"] #transcript-content",
            segment_list: "#segments-container",
            segment_text: ".segment-text",
        }
    }

    /// 默认按顺序尝试的全部布局
    pub fn all() -> Vec<Self> {
        vec![Self::description_section(), Self::legacy()]
    }

    fn control_selector(&self, control: Control) -> &'static str {
        match control {
            Control::DirectTranscriptButton => self.direct_button,
            Control::OverflowMenu => self.overflow_button,
        }
    }

    fn container_selector(&self, kind: ContainerKind) -> &'static str {
        match kind {
            ContainerKind::EngagementPanel => self.engagement_panel,
            ContainerKind::SegmentList => self.segment_list,
        }
    }
}

/// Chromium 页面适配器
pub struct ChromiumPageAdapter {
    executor: JsExecutor,
    layout: LayoutProfile,
}

impl ChromiumPageAdapter {
    pub fn new(executor: JsExecutor, layout: LayoutProfile) -> Self {
        Self { executor, layout }
    }

    /// 为每种布局创建一个适配器（共享同一个 page）
    pub fn for_all_layouts(executor: &JsExecutor) -> Vec<Self> {
        LayoutProfile::all()
            .into_iter()
            .map(|layout| Self::new(executor.clone(), layout))
            .collect()
    }

    async fn query_exists(&self, selector: &str) -> Result<bool, DomError> {
        let js_code = format!(
            "(() => document.querySelector({}) !== null)()",
            js_string(selector)?
        );
        Ok(self.executor.eval_as::<bool>(js_code).await?)
    }

    async fn click_selector(&self, selector: &str, index: usize) -> Result<(), DomError> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelectorAll({})[{}];
                if (!el) {{
                    return false;
                }}
                el.click();
                return true;
            }})()
            "#,
            js_string(selector)?,
            index
        );
        debug!("[{}] 点击 {} [{}]", self.layout.name, selector, index);

        if self.executor.eval_as::<bool>(js_code).await? {
            Ok(())
        } else {
            Err(DomError::new(format!("元素不存在: {} [{}]", selector, index)))
        }
    }
}

#[async_trait]
impl PageAdapter for ChromiumPageAdapter {
    fn layout_name(&self) -> &str {
        self.layout.name
    }

    async fn is_present(&self, control: Control) -> Result<bool, DomError> {
        self.query_exists(self.layout.control_selector(control)).await
    }

    async fn click(&self, control: Control) -> Result<(), DomError> {
        self.click_selector(self.layout.control_selector(control), 0)
            .await
    }

    async fn menu_item_labels(&self) -> Result<Vec<String>, DomError> {
        let js_code = format!(
            "(() => Array.from(document.querySelectorAll({})).map(el => (el.textContent || '').trim()))()",
            js_string(self.layout.menu_items)?
        );
        Ok(self.executor.eval_as::<Vec<String>>(js_code).await?)
    }

    async fn click_menu_item(&self, index: usize) -> Result<(), DomError> {
        self.click_selector(self.layout.menu_items, index).await
    }

    async fn has_container(&self, kind: ContainerKind) -> Result<bool, DomError> {
        self.query_exists(self.layout.container_selector(kind)).await
    }

    async fn segment_texts(&self, kind: ContainerKind) -> Result<Vec<String>, DomError> {
        let container = self.layout.container_selector(kind);
        let js_code = format!(
            r#"
            (() => {{
                const container = document.querySelector({});
                if (!container) {{
                    return null;
                }}
                return Array.from(container.querySelectorAll({})).map(el => el.textContent || '');
            }})()
            "#,
            js_string(container)?,
            js_string(self.layout.segment_text)?
        );

        self.executor
            .eval_as::<Option<Vec<String>>>(js_code)
            .await?
            .ok_or_else(|| DomError::new(format!("文字记录容器已消失: {}", container)))
    }
}

/// 把选择器编码成 JS 字符串字面量
fn js_string(value: &str) -> Result<String, DomError> {
    serde_json::to_string(value).map_err(|e| DomError::new(e.to_string()))
}

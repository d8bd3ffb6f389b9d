//! 页面适配接口 - 业务能力层
//!
//! 提取流程只依赖这个接口，不直接接触 DOM。
//! 每种页面布局一个实现；单元测试使用内存中的假页面。

use async_trait::async_trait;

use crate::error::DomError;

/// 页面上的可点击控件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Control {
    /// 直接的"显示文字记录"按钮
    DirectTranscriptButton,
    /// "更多操作"菜单按钮
    OverflowMenu,
}

/// 文字记录容器的两种形态，按优先级排列
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// 互动面板中的文字记录
    EngagementPanel,
    /// 通用的片段容器
    SegmentList,
}

impl ContainerKind {
    /// 查找顺序
    pub const PRIORITY: [ContainerKind; 2] =
        [ContainerKind::EngagementPanel, ContainerKind::SegmentList];
}

/// 页面适配接口
///
/// 所有方法都可能因 DOM 异常失败，由提取流程统一捕获
#[async_trait]
pub trait PageAdapter: Send + Sync {
    /// 布局名称（仅用于日志）
    fn layout_name(&self) -> &str;

    async fn is_present(&self, control: Control) -> Result<bool, DomError>;

    async fn click(&self, control: Control) -> Result<(), DomError>;

    /// 已打开菜单中所有菜单项的文字（按文档顺序）
    async fn menu_item_labels(&self) -> Result<Vec<String>, DomError>;

    /// 点击第 `index` 个菜单项（与 `menu_item_labels` 的顺序一致）
    async fn click_menu_item(&self, index: usize) -> Result<(), DomError>;

    async fn has_container(&self, kind: ContainerKind) -> Result<bool, DomError>;

    /// 容器内所有文字片段的原始文本（按文档顺序）
    async fn segment_texts(&self, kind: ContainerKind) -> Result<Vec<String>, DomError>;
}

/// 菜单项匹配
///
/// 先找完全一致的文字，再找包含关键字的（不区分大小写）
#[derive(Debug, Clone)]
pub struct MenuLabelMatcher {
    exact: String,
    keyword: String,
}

impl MenuLabelMatcher {
    pub fn new(exact: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            exact: exact.into(),
            keyword: keyword.into().to_lowercase(),
        }
    }

    /// "Show transcript" / 包含 "transcript"
    pub fn transcript() -> Self {
        Self::new("Show transcript", "transcript")
    }

    /// 返回匹配的菜单项下标
    pub fn find(&self, labels: &[String]) -> Option<usize> {
        labels
            .iter()
            .position(|label| label.trim() == self.exact)
            .or_else(|| {
                labels
                    .iter()
                    .position(|label| label.to_lowercase().contains(&self.keyword))
            })
    }
}

impl Default for MenuLabelMatcher {
    fn default() -> Self {
        Self::transcript()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_exact_label_preferred() {
        let matcher = MenuLabelMatcher::transcript();
        let items = labels(&["Open transcript settings", "Save", "  Show transcript  "]);
        assert_eq!(matcher.find(&items), Some(2));
    }

    #[test]
    fn test_keyword_match_is_case_insensitive() {
        let matcher = MenuLabelMatcher::transcript();
        assert_eq!(matcher.find(&labels(&["Report", "TRANSCRIPT"])), Some(1));
        assert_eq!(matcher.find(&labels(&["Report", "Open Transcript"])), Some(1));
    }

    #[test]
    fn test_no_match() {
        let matcher = MenuLabelMatcher::transcript();
        assert_eq!(matcher.find(&labels(&["Report", "Save to playlist"])), None);
        assert_eq!(matcher.find(&[]), None);
    }
}

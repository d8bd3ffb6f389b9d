//! 面板事件出口
//!
//! 后台只负责"发出"事件，不关心面板是否还在

use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

use crate::models::PanelEvent;

/// 事件出口
pub trait EventSink: Send + Sync {
    fn emit(&self, event: PanelEvent);
}

impl EventSink for UnboundedSender<PanelEvent> {
    fn emit(&self, event: PanelEvent) {
        if let Err(e) = self.send(event) {
            debug!("面板已关闭，丢弃事件: {:?}", e.0);
        }
    }
}

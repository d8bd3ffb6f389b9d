//! 单元测试共用的假实现

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::{DomError, TransportError};
use crate::infrastructure::{HttpResponse, HttpTransport};
use crate::models::PanelEvent;
use crate::orchestrator::EventSink;
use crate::services::{ContainerKind, Control, PageAdapter};

/// 按脚本依次返回结果的传输层，同时记录调用次数和最后一次请求
pub struct ScriptedTransport {
    script: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    calls: AtomicU32,
    last_request: Mutex<Option<(String, JsonValue)>>,
}

impl ScriptedTransport {
    pub fn new(script: Vec<Result<HttpResponse, TransportError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<(String, JsonValue)> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn post_json(&self, url: &str, body: &JsonValue) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some((url.to_string(), body.clone()));
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::new("script exhausted")))
    }
}

/// 记录所有事件
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<PanelEvent>>,
}

impl RecordingSink {
    pub fn events(&self) -> Vec<PanelEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: PanelEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// 内存中的假页面
///
/// 点击直接按钮或匹配的菜单项后，`reveals` 指定的容器出现
#[derive(Default)]
pub struct FakePage {
    name: &'static str,
    direct_button: bool,
    overflow_menu: bool,
    menu_labels: Vec<String>,
    reveals: Option<ContainerKind>,
    segments: Vec<String>,
    fail_on_segments: bool,
    fail_on_close: bool,
    visible: Mutex<HashSet<ContainerKind>>,
    menu_open: Mutex<bool>,
    clicks: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            name: "fake",
            ..Default::default()
        }
    }

    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn with_direct_button(mut self) -> Self {
        self.direct_button = true;
        self
    }

    pub fn with_menu(mut self, labels: &[&str]) -> Self {
        self.overflow_menu = true;
        self.menu_labels = labels.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn revealing(mut self, kind: ContainerKind) -> Self {
        self.reveals = Some(kind);
        self
    }

    pub fn already_open(self, kind: ContainerKind) -> Self {
        self.visible.lock().unwrap().insert(kind);
        self
    }

    pub fn with_segments(mut self, segments: &[&str]) -> Self {
        self.segments = segments.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn failing_on_segments(mut self) -> Self {
        self.fail_on_segments = true;
        self
    }

    pub fn failing_on_close(mut self) -> Self {
        self.fail_on_close = true;
        self
    }

    pub fn clicks(&self) -> Vec<String> {
        self.clicks.lock().unwrap().clone()
    }

    fn reveal(&self) {
        if let Some(kind) = self.reveals {
            self.visible.lock().unwrap().insert(kind);
        }
    }
}

#[async_trait]
impl PageAdapter for FakePage {
    fn layout_name(&self) -> &str {
        self.name
    }

    async fn is_present(&self, control: Control) -> Result<bool, DomError> {
        Ok(match control {
            Control::DirectTranscriptButton => self.direct_button,
            Control::OverflowMenu => self.overflow_menu,
        })
    }

    async fn click(&self, control: Control) -> Result<(), DomError> {
        self.clicks.lock().unwrap().push(format!("{:?}", control));
        match control {
            Control::DirectTranscriptButton if self.direct_button => {
                self.reveal();
                Ok(())
            }
            Control::OverflowMenu if self.overflow_menu => {
                let mut open = self.menu_open.lock().unwrap();
                if *open && self.fail_on_close {
                    return Err(DomError::new("menu button detached"));
                }
                *open = !*open;
                Ok(())
            }
            _ => Err(DomError::new(format!("{:?} not found", control))),
        }
    }

    async fn menu_item_labels(&self) -> Result<Vec<String>, DomError> {
        if *self.menu_open.lock().unwrap() {
            Ok(self.menu_labels.clone())
        } else {
            Ok(Vec::new())
        }
    }

    async fn click_menu_item(&self, index: usize) -> Result<(), DomError> {
        let label = self
            .menu_labels
            .get(index)
            .cloned()
            .ok_or_else(|| DomError::new("menu item not found"))?;
        self.clicks.lock().unwrap().push(format!("MenuItem({})", label));
        *self.menu_open.lock().unwrap() = false;
        self.reveal();
        Ok(())
    }

    async fn has_container(&self, kind: ContainerKind) -> Result<bool, DomError> {
        Ok(self.visible.lock().unwrap().contains(&kind))
    }

    async fn segment_texts(&self, _kind: ContainerKind) -> Result<Vec<String>, DomError> {
        if self.fail_on_segments {
            return Err(DomError::new("Cannot read properties of null (reading 'textContent')"));
        }
        Ok(self.segments.clone())
    }
}

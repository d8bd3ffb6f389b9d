//! # Transcript Summarizer
//!
//! 从视频页提取文字记录，并调用 Gemini 生成结构化总结
//!
//! ## 架构设计
//!
//! 本系统采用四层架构，外加一个面板投影：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Page、HTTP 连接），只暴露能力
//! - `JsExecutor` - 唯一的 page owner，提供 eval() 能力
//! - `HttpTransport` - 发送 JSON POST，不做重试
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `PageAdapter` - 某一种页面布局下的按钮、菜单、容器操作
//! - `ResilientCaller` - 429 / 网络错误的指数退避重试
//! - `CredentialStore` - API Key 的读写
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一次提取"的完整状态机
//! - `ExtractionFlow` - 直接按钮 → 更多操作菜单 → 面板等待 → 收集片段
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/summarizer` - 总结编排，保证事件顺序
//! - `orchestrator/router` - 页面上下文与后台上下文的消息路由
//! - `orchestrator/app` - 应用入口，管理浏览器资源
//!
//! ### 面板（Panel）
//! - `panel/` - 把回复和事件折叠成面板状态
//!
//! ## 模块结构

pub mod browser;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod panel;
pub mod services;
pub mod utils;
pub mod workflow;

#[cfg(test)]
mod testing;

// 重新导出常用类型
pub use browser::connect_to_browser_and_page;
pub use config::{Config, RetryPolicy, SettleTimings};
pub use error::{CallError, SummarizeError, TransportError};
pub use infrastructure::{HttpResponse, HttpTransport, JsExecutor, ReqwestTransport};
pub use models::{
    ExtractionResult, PanelEvent, PanelRequest, SummaryResult, Transcript, TranscriptReply,
};
pub use orchestrator::{App, BackgroundContext, Endpoint, EventSink, Orchestrator, PageContext};
pub use panel::PanelState;
pub use services::{CredentialStore, PageAdapter, ResilientCaller};
pub use workflow::{ExtractionFlow, ExtractionState};

//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `app` - 应用入口
//! - 管理应用生命周期（初始化、运行）
//! - 管理浏览器资源（Browser、JsExecutor）
//! - 把回复和事件投影到面板状态
//!
//! ### `router` - 消息路由
//! - `PageContext` 处理 `getTranscript`
//! - `BackgroundContext` 处理 `summarizeVideo` 和 `saveApiKey`
//!
//! ### `summarizer` - 总结编排
//! - 校验输入、解析凭据、调用 Gemini、解析响应
//! - 保证"先 Loading，后恰好一个终止事件"
//!
//! ### `events` - 面板事件出口
//!
//! ## 层次关系
//!
//! ```text
//! app
//!     ↓
//! router (PageContext / BackgroundContext)
//!     ↓                      ↓
//! workflow::ExtractionFlow   summarizer::Orchestrator
//!     ↓                      ↓
//! services (PageAdapter / ResilientCaller / CredentialStore)
//!     ↓
//! infrastructure (JsExecutor / HttpTransport)
//! ```

pub mod app;
pub mod events;
pub mod router;
pub mod summarizer;

// 重新导出主要类型
pub use app::App;
pub use events::EventSink;
pub use router::{BackgroundContext, PageContext};
pub use summarizer::{Endpoint, Orchestrator};

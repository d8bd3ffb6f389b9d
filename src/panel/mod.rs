//! 面板层
//!
//! 面板本身只是状态的投影，所有交互都折叠进 [`PanelState`]

pub mod state;

pub use state::{Notice, NoticeLevel, PanelState};

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 目标页面（找不到已打开的视频页时导航到这里）
    pub target_url: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    // --- Gemini 配置 ---
    pub gemini_api_base_url: String,
    pub gemini_model_name: String,
    /// 环境变量中的 API Key，优先于凭据文件
    pub gemini_api_key: Option<String>,
    /// 凭据文件路径
    pub credential_file: String,
    /// 手动粘贴的文字记录文件（自动提取失败时使用）
    pub transcript_file: Option<String>,
    // --- 重试与等待 ---
    /// 最多尝试次数
    pub max_retries: u32,
    /// 首次退避等待（毫秒），之后每次翻倍
    pub initial_delay_ms: u64,
    /// 打开"更多操作"菜单后的等待（毫秒）
    pub menu_settle_ms: u64,
    /// 点击"显示文字记录"后的等待（毫秒）
    pub panel_settle_ms: u64,
    /// 单次总结请求的整体截止时间（秒），0 表示不限制
    pub request_deadline_secs: u64,
    /// 单次 HTTP 请求超时（秒）
    pub http_timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            target_url: "https://www.youtube.com/".to_string(),
            verbose_logging: false,
            gemini_api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            gemini_model_name: "gemini-2.5-flash-preview-05-20".to_string(),
            gemini_api_key: None,
            credential_file: "credentials.toml".to_string(),
            transcript_file: None,
            max_retries: 3,
            initial_delay_ms: 1000,
            menu_settle_ms: 500,
            panel_settle_ms: 1000,
            request_deadline_secs: 120,
            http_timeout_secs: 60,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let default = Self::default();
        Ok(Self {
            browser_debug_port: parse_env("BROWSER_DEBUG_PORT", default.browser_debug_port)?,
            target_url: std::env::var("TARGET_URL").unwrap_or(default.target_url),
            verbose_logging: parse_env("VERBOSE_LOGGING", default.verbose_logging)?,
            gemini_api_base_url: std::env::var("GEMINI_API_BASE_URL").unwrap_or(default.gemini_api_base_url),
            gemini_model_name: std::env::var("GEMINI_MODEL_NAME").unwrap_or(default.gemini_model_name),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.trim().is_empty()),
            credential_file: std::env::var("CREDENTIAL_FILE").unwrap_or(default.credential_file),
            transcript_file: std::env::var("TRANSCRIPT_FILE").ok().filter(|v| !v.trim().is_empty()),
            max_retries: parse_env("MAX_RETRIES", default.max_retries)?,
            initial_delay_ms: parse_env("INITIAL_DELAY_MS", default.initial_delay_ms)?,
            menu_settle_ms: parse_env("MENU_SETTLE_MS", default.menu_settle_ms)?,
            panel_settle_ms: parse_env("PANEL_SETTLE_MS", default.panel_settle_ms)?,
            request_deadline_secs: parse_env("REQUEST_DEADLINE_SECS", default.request_deadline_secs)?,
            http_timeout_secs: parse_env("HTTP_TIMEOUT_SECS", default.http_timeout_secs)?,
        })
    }

    /// 重试策略
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.max_retries, Duration::from_millis(self.initial_delay_ms))
    }

    /// 页面等待时间
    pub fn settle_timings(&self) -> SettleTimings {
        SettleTimings {
            menu: Duration::from_millis(self.menu_settle_ms),
            panel: Duration::from_millis(self.panel_settle_ms),
        }
    }

    /// 整体截止时间
    pub fn request_deadline(&self) -> Option<Duration> {
        (self.request_deadline_secs > 0).then(|| Duration::from_secs(self.request_deadline_secs))
    }
}

/// 指数退避重试策略
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_retries: u32,
    initial_delay: Duration,
}

impl RetryPolicy {
    /// `max_retries` 至少为 1，否则一次请求都不会发出
    pub fn new(max_retries: u32, initial_delay: Duration) -> Self {
        Self {
            max_retries: max_retries.max(1),
            initial_delay,
        }
    }

    pub fn max_retries(&self) -> u32 {
        self.max_retries
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_millis(1000))
    }
}

/// 页面操作后的等待时间
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SettleTimings {
    /// 菜单渲染
    pub menu: Duration,
    /// 文字记录面板渲染
    pub panel: Duration,
}

impl SettleTimings {
    /// 不等待（测试用 fake 页面时使用）
    pub fn none() -> Self {
        Self {
            menu: Duration::ZERO,
            panel: Duration::ZERO,
        }
    }
}

impl Default for SettleTimings {
    fn default() -> Self {
        Self {
            menu: Duration::from_millis(500),
            panel: Duration::from_millis(1000),
        }
    }
}

fn parse_env<T: FromStr>(var_name: &str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse().map_err(|_| ConfigError::EnvVarParseFailed {
            var_name: var_name.to_string(),
            value,
            expected_type: std::any::type_name::<T>().to_string(),
        }),
        Err(_) => Ok(default),
    }
}

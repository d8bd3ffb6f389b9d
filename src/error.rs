//! 错误类型定义
//!
//! 按关注点划分：传输层、重试调用、页面操作、总结编排、凭据存储、配置。
//! 会展示给用户的错误（调用失败、总结失败）使用英文文案，与面板提示保持一致。

use std::time::Duration;

use thiserror::Error;

/// 默认的"响应结构异常"提示
pub const UNEXPECTED_RESPONSE_MESSAGE: &str =
    "Could not generate summary. Unexpected API response.";

/// 传输层错误（连接失败、超时、读取响应体失败等）
///
/// 只保留原始错误信息，重试耗尽时原样抛出
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// 带重试的网络调用错误
#[derive(Debug, Error)]
pub enum CallError {
    /// 所有尝试都返回 429
    #[error("API rate limit still exceeded after {attempts} attempts")]
    RateLimitExhausted { attempts: u32 },

    /// 非 2xx / 非 429 响应，不重试
    #[error("API request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// 传输层错误，重试耗尽后原样抛出
    #[error(transparent)]
    Network(#[from] TransportError),
}

impl CallError {
    /// HTTP 状态码（仅 `Http` 变体有）
    pub fn status(&self) -> Option<u16> {
        match self {
            CallError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// 页面 DOM 操作错误
///
/// 只在提取流程内部流转，最终会被转换成 `ExtractionResult::Error`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct DomError(pub String);

impl DomError {
    pub fn new(detail: impl Into<String>) -> Self {
        Self(detail.into())
    }
}

impl From<anyhow::Error> for DomError {
    fn from(err: anyhow::Error) -> Self {
        Self(format!("{:#}", err))
    }
}

/// 总结流程错误
///
/// `Display` 即为最终展示在面板上的文案
#[derive(Debug, Error)]
pub enum SummarizeError {
    #[error("No transcript provided for summarization.")]
    MissingTranscript,

    #[error("Gemini API Key is missing. Please set it in the extension popup.")]
    MissingCredential,

    /// 响应中缺少 `candidates[0].content.parts[0].text`
    #[error("{}", malformed_message(.api_message))]
    MalformedResponse { api_message: Option<String> },

    #[error("Failed to summarize: {0}")]
    Call(#[from] CallError),

    #[error("Failed to summarize: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Failed to summarize: invalid API endpoint {0}")]
    InvalidEndpoint(String),

    #[error("Failed to summarize: request deadline of {}s exceeded", .0.as_secs())]
    DeadlineExceeded(Duration),

    #[error("Failed to read the stored API key: {0}")]
    Credential(#[from] CredentialError),
}

fn malformed_message(api_message: &Option<String>) -> String {
    api_message
        .clone()
        .unwrap_or_else(|| UNEXPECTED_RESPONSE_MESSAGE.to_string())
}

impl SummarizeError {
    /// 是否为输入缺失（未发起任何网络请求）
    pub fn is_missing_input(&self) -> bool {
        matches!(
            self,
            SummarizeError::MissingTranscript | SummarizeError::MissingCredential
        )
    }
}

/// 凭据存储错误
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("读取凭据文件失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("写入凭据文件失败 ({path}): {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("凭据文件解析失败 ({path}): {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("凭据序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
}

//! 带指数退避的网络调用 - 业务能力层
//!
//! 只负责"把一次请求可靠地发出去"，不关心请求内容
//!
//! ## 重试规则
//! - 2xx：立即返回
//! - 429：等待后重试，等待时间翻倍
//! - 其他状态码：读取响应体后立即失败，不重试
//! - 传输层错误：等待后重试；最后一次仍失败则原样抛出
//!
//! 429 与传输层错误共用同一个等待计数器。

use std::fmt::Display;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::RetryPolicy;
use crate::error::{CallError, TransportError};
use crate::infrastructure::{HttpResponse, HttpTransport};
use crate::utils::redact_key;

/// 单次尝试的结果分类
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(HttpResponse),
    RetriableFailure(RetryCause),
    FatalFailure(CallError),
}

/// 可重试的原因
#[derive(Debug)]
pub enum RetryCause {
    RateLimited,
    Transport(TransportError),
}

impl Display for RetryCause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RetryCause::RateLimited => write!(f, "API 请求频率限制 (429)"),
            RetryCause::Transport(e) => write!(f, "网络错误: {}", e),
        }
    }
}

/// 一次尝试（只存在于单次 `call` 内部）
#[derive(Debug)]
pub struct CallAttempt {
    /// 从 0 开始
    pub index: u32,
    /// 本次失败后将要等待的时间
    pub delay: Duration,
    pub outcome: AttemptOutcome,
}

impl CallAttempt {
    fn classify(index: u32, delay: Duration, result: Result<HttpResponse, TransportError>) -> Self {
        let outcome = match result {
            Ok(response) if response.is_success() => AttemptOutcome::Success(response),
            Ok(response) if response.is_rate_limited() => {
                AttemptOutcome::RetriableFailure(RetryCause::RateLimited)
            }
            Ok(response) => AttemptOutcome::FatalFailure(CallError::Http {
                status: response.status,
                body: response.body,
            }),
            Err(e) => AttemptOutcome::RetriableFailure(RetryCause::Transport(e)),
        };
        Self {
            index,
            delay,
            outcome,
        }
    }
}

/// 带重试的调用器
///
/// 职责：
/// - 按策略重试 429 和传输层错误
/// - 区分可重试 / 致命失败
/// - 调用之间不保留任何状态
pub struct ResilientCaller<T> {
    transport: T,
    policy: RetryPolicy,
}

impl<T: HttpTransport> ResilientCaller<T> {
    pub fn new(transport: T, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// 发送 JSON POST 请求
    ///
    /// # 返回
    /// 2xx 响应；或 `RateLimitExhausted` / `Http` / `Network` 之一
    pub async fn call(&self, url: &str, body: &JsonValue) -> Result<HttpResponse, CallError> {
        let max_retries = self.policy.max_retries();
        let mut delay = self.policy.initial_delay();

        for index in 0..max_retries {
            let result = self.transport.post_json(url, body).await;
            let attempt = CallAttempt::classify(index, delay, result);
            let is_last = attempt.index + 1 == max_retries;

            match attempt.outcome {
                AttemptOutcome::Success(response) => {
                    debug!(
                        "✓ 请求成功 (尝试 {}/{}): {}",
                        attempt.index + 1,
                        max_retries,
                        redact_key(url)
                    );
                    return Ok(response);
                }
                AttemptOutcome::FatalFailure(e) => {
                    warn!("❌ 请求失败，不再重试: {}", e);
                    return Err(e);
                }
                AttemptOutcome::RetriableFailure(RetryCause::Transport(e)) if is_last => {
                    warn!("❌ 网络错误，已尝试 {} 次: {}", max_retries, e);
                    return Err(CallError::Network(e));
                }
                AttemptOutcome::RetriableFailure(RetryCause::RateLimited) if is_last => {
                    break;
                }
                AttemptOutcome::RetriableFailure(cause) => {
                    warn!(
                        "{} (尝试 {}/{}), 等待 {:.1} 秒后重试...",
                        cause,
                        attempt.index + 1,
                        max_retries,
                        attempt.delay.as_secs_f64()
                    );
                    sleep(attempt.delay).await;
                    delay = attempt.delay.saturating_mul(2);
                }
            }
        }

        warn!("❌ API 请求频率限制，已尝试 {} 次", max_retries);
        Err(CallError::RateLimitExhausted {
            attempts: max_retries,
        })
    }
}

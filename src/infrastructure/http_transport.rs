//! HTTP 传输 - 基础设施层
//!
//! 只负责"发一次 POST、拿回状态码和响应体"，不做重试、不解析业务字段

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::error::TransportError;
use crate::utils::redact_key;

/// 一次 HTTP 调用的原始响应
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// 429 Too Many Requests
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }

    pub fn json<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::from_str(&self.body)
    }
}

/// HTTP 传输接口
///
/// 只在传输层失败（连不上、超时、读响应体失败）时返回 `Err`，
/// 任何状态码都作为 `Ok(HttpResponse)` 返回，由调用方决定是否重试
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn post_json(&self, url: &str, body: &JsonValue) -> Result<HttpResponse, TransportError>;
}

#[async_trait]
impl<T: HttpTransport + ?Sized> HttpTransport for Arc<T> {
    async fn post_json(&self, url: &str, body: &JsonValue) -> Result<HttpResponse, TransportError> {
        (**self).post_json(url, body).await
    }
}

/// 基于 reqwest 的传输实现
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// 创建传输实例
    ///
    /// # 参数
    /// - `timeout`: 单次请求超时
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(timeout)
            .build()
            .context("无法创建 HTTP 客户端")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn post_json(&self, url: &str, body: &JsonValue) -> Result<HttpResponse, TransportError> {
        debug!("POST {}", redact_key(url));

        let response = self.client.post(url).json(body).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;

        debug!("响应状态: {}, 响应体长度: {} 字节", status, body.len());
        Ok(HttpResponse { status, body })
    }
}

//! 凭据存储 - 业务能力层
//!
//! 只保存一个字符串（Gemini API Key），核心流程通过接口注入使用

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::RwLock;
use tracing::debug;

use crate::error::CredentialError;

/// 凭据存储接口
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn get(&self) -> Result<Option<String>, CredentialError>;

    async fn set(&self, credential: String) -> Result<(), CredentialError>;
}

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(value.into())),
        }
    }
}

#[async_trait]
impl CredentialStore for MemoryCredentialStore {
    async fn get(&self) -> Result<Option<String>, CredentialError> {
        Ok(self.value.read().await.clone())
    }

    async fn set(&self, credential: String) -> Result<(), CredentialError> {
        *self.value.write().await = Some(credential);
        Ok(())
    }
}

/// 凭据文件内容
#[derive(Debug, Default, Serialize, Deserialize)]
struct CredentialFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    gemini_api_key: Option<String>,
}

/// TOML 文件存储
///
/// 文件不存在时视为没有凭据
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn display_path(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>, CredentialError> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("凭据文件不存在: {}", self.display_path());
                return Ok(None);
            }
            Err(source) => {
                return Err(CredentialError::Read {
                    path: self.display_path(),
                    source,
                })
            }
        };

        let file: CredentialFile =
            toml::from_str(&content).map_err(|source| CredentialError::Parse {
                path: self.display_path(),
                source,
            })?;

        Ok(file.gemini_api_key.filter(|key| !key.trim().is_empty()))
    }

    async fn set(&self, credential: String) -> Result<(), CredentialError> {
        let content = toml::to_string(&CredentialFile {
            gemini_api_key: Some(credential),
        })?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| CredentialError::Write {
                    path: self.display_path(),
                    source,
                })?;
        }

        fs::write(&self.path, content)
            .await
            .map_err(|source| CredentialError::Write {
                path: self.display_path(),
                source,
            })?;

        debug!("凭据已写入: {}", self.display_path());
        Ok(())
    }
}

//! 文字记录与提取结果

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// 视频文字记录
///
/// 各片段去除首尾空白后以单个空格拼接，整体再去除首尾空白。
/// 可能为空字符串，由调用方视为"没有内容"。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript(String);

impl Transcript {
    /// 由页面上的文字片段（按文档顺序）拼接
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = segments
            .into_iter()
            .filter_map(|segment| {
                let trimmed = segment.as_ref().trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            })
            .collect::<Vec<_>>()
            .join(" ");
        Self(joined.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 字符数（用于日志）
    pub fn char_count(&self) -> usize {
        self.0.chars().count()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for Transcript {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 一次提取的结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    /// 找到面板并读取了文字（可能为空）
    Found(Transcript),
    /// 页面上没有文字记录入口或面板
    NotFound,
    /// 操作页面时出错（已被捕获）
    Error(String),
}

impl ExtractionResult {
    /// 非空文字记录
    pub fn transcript_text(&self) -> Option<&str> {
        match self {
            ExtractionResult::Found(transcript) if !transcript.is_empty() => {
                Some(transcript.as_str())
            }
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.transcript_text().is_some()
    }
}

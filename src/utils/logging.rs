/// 日志工具模块
///
/// 提供日志初始化和输出的辅助函数
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// 初始化日志
///
/// 优先使用 `RUST_LOG`，否则根据 `verbose` 选择 debug / info
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    // 测试中可能被多次调用，忽略重复初始化
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 视频文字记录总结 - 启动");
    info!(
        "启动时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 浏览器调试端口: {}", config.browser_debug_port);
    info!("🤖 模型: {}", config.gemini_model_name);
    info!(
        "🔁 最多尝试 {} 次，首次退避 {}ms",
        config.max_retries, config.initial_delay_ms
    );
    info!("{}", "=".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}

/// 隐藏 URL 中的 `key` 查询参数，避免 API Key 出现在日志里
///
/// 只匹配完整的参数名（`?key=` / `&key=`），`monkey=` 之类不受影响
pub fn redact_key(url: &str) -> String {
    let Some(start) = ["?key=", "&key="]
        .iter()
        .filter_map(|marker| url.find(marker).map(|i| i + marker.len()))
        .min()
    else {
        return url.to_string();
    };
    let end = url[start..]
        .find('&')
        .map(|i| start + i)
        .unwrap_or(url.len());
    format!("{}***{}", &url[..start], &url[end..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("你好世界", 2), "你好...");
        assert_eq!(truncate_text("short", 10), "short");
    }

    #[test]
    fn test_redact_key() {
        assert_eq!(
            redact_key("https://x/models/m:generateContent?key=SECRET"),
            "https://x/models/m:generateContent?key=***"
        );
        assert_eq!(
            redact_key("https://x/path?key=SECRET&alt=sse"),
            "https://x/path?key=***&alt=sse"
        );
        assert_eq!(redact_key("https://x/path"), "https://x/path");
    }

    #[test]
    fn test_redact_key_ignores_similar_names() {
        assert_eq!(
            redact_key("https://x/path?monkey=banana&key=SECRET"),
            "https://x/path?monkey=banana&key=***"
        );
        assert_eq!(
            redact_key("https://x/path?monkey=banana"),
            "https://x/path?monkey=banana"
        );
        assert_eq!(
            redact_key("https://x/m:generateContent?key=ab%26c%23d"),
            "https://x/m:generateContent?key=***"
        );
    }
}

use anyhow::{Context, Result};
use chromiumoxide::{Browser, Page};
use futures::StreamExt;
use regex::Regex;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 视频页 URL 特征
pub const WATCH_PAGE_MARKER: &str = "youtube.com/watch";

/// 连接到浏览器并获取视频页
///
/// 优先复用已打开的视频页；找不到时新建页面并导航到 `target_url`
pub async fn connect_to_browser_and_page(
    port: u16,
    target_url: Option<&str>,
) -> Result<(Browser, Page)> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);
    debug!("目标 URL: {:?}", target_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        e
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser.pages().await?;
    debug!("获取到 {} 个页面", pages.len());

    for p in pages.iter() {
        if let Ok(Some(url)) = p.url().await {
            debug!("检查页面: {}", url);
            if is_watch_page(&url) {
                info!("✓ 找到视频页: {}", url);
                return Ok((browser, p.clone()));
            }
        }
    }

    let new_page = match target_url {
        Some(url) => {
            debug!("没有打开的视频页，新建页面并导航到: {}", url);
            let page = browser.new_page("about:blank").await.map_err(|e| {
                error!("创建新页面失败: {}", e);
                e
            })?;
            page.goto(url)
                .await
                .with_context(|| format!("导航到 {} 失败", url))?;
            info!("已导航到: {}", url);
            page
        }
        None => {
            debug!("创建空白页面");
            browser.new_page("about:blank").await.map_err(|e| {
                error!("创建空白页面失败: {}", e);
                e
            })?
        }
    };

    Ok((browser, new_page))
}

/// 是否为视频观看页
pub fn is_watch_page(url: &str) -> bool {
    url.contains(WATCH_PAGE_MARKER)
}

/// 从观看页 URL 中提取视频 ID（`v` 参数）
pub fn video_id(url: &str) -> Result<Option<String>> {
    let re = Regex::new(r"[?&]v=([A-Za-z0-9_-]{6,})").context("视频 ID 正则无效")?;
    Ok(re
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_watch_page() {
        assert!(is_watch_page("https://www.youtube.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_watch_page("https://www.youtube.com/feed/subscriptions"));
        assert!(!is_watch_page("about:blank"));
    }

    #[test]
    fn test_video_id() {
        assert_eq!(
            video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s").unwrap(),
            Some("dQw4w9WgXcQ".to_string())
        );
        assert_eq!(
            video_id("https://www.youtube.com/watch?list=PL1&v=abc_DEF-12").unwrap(),
            Some("abc_DEF-12".to_string())
        );
        assert_eq!(video_id("https://www.youtube.com/").unwrap(), None);
    }
}

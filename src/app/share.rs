use crate::utils::error::{FortuneError, Result};
use url::Url;

pub const TWITTER_SHARE_URL: &str = "https://twitter.com/intent/tweet";
pub const LINE_SHARE_URL: &str = "https://social-plugins.line.me/lineit/share";

/// 分享文字最多取前 100 個字元
pub const SHARE_TEXT_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLinks {
    pub twitter: String,
    pub line: String,
}

pub fn share_snippet(text: &str) -> String {
    text.chars().take(SHARE_TEXT_LIMIT).collect()
}

fn link(base: &str, text: &str) -> Result<String> {
    // 經過 URL 編碼，換行與 & 之類的字元不會破壞連結
    Url::parse_with_params(base, &[("text", text)])
        .map(|url| url.to_string())
        .map_err(|e| FortuneError::InvalidConfigValueError {
            field: "share_url".to_string(),
            value: base.to_string(),
            reason: e.to_string(),
        })
}

pub fn share_links(text: &str) -> Result<ShareLinks> {
    let snippet = share_snippet(text);
    Ok(ShareLinks {
        twitter: link(TWITTER_SHARE_URL, &snippet)?,
        line: link(LINE_SHARE_URL, &snippet)?,
    })
}

use crate::domain::model::{FortuneReading, FortuneText};
use regex::Regex;
use std::sync::LazyLock;

/// 不允許出現在結果中的裝飾符號，提示詞也會列出同一組
pub const FORBIDDEN_SYMBOLS: [char; 12] =
    ['*', '#', '★', '☆', '◆', '◇', '■', '□', '●', '○', '♪', '※'];

/// 主文與建議段落的分隔標記
pub const ADVICE_MARKER: &str = "【アドバイス】";

static FORBIDDEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let class: String = FORBIDDEN_SYMBOLS
        .iter()
        .map(|c| regex::escape(&c.to_string()))
        .collect();
    Regex::new(&format!("[{}]", class)).expect("forbidden symbol class is a valid pattern")
});

/// 移除所有禁用符號。重複套用結果不變。
pub fn clean(text: &str) -> String {
    FORBIDDEN_PATTERN.replace_all(text, "").into_owned()
}

/// 在第一個 [`ADVICE_MARKER`] 處切成主文與建議。
///
/// - 標記存在：`main` 為標記前的文字、`advice` 為標記後的文字，兩者皆去除前後空白；
///   之後再出現的標記原樣留在 `advice` 內。
/// - 標記不存在：`advice` 為空字串，`main` 為整段文字（去除前後空白）。
pub fn split_advice(text: &str) -> FortuneReading {
    match text.split_once(ADVICE_MARKER) {
        Some((main, advice)) => FortuneReading {
            main: main.trim().to_string(),
            advice: advice.trim().to_string(),
        },
        None => FortuneReading {
            main: text.trim().to_string(),
            advice: String::new(),
        },
    }
}

pub fn post_process(raw: &FortuneText) -> FortuneReading {
    let cleaned = clean(raw.as_str());
    let reading = split_advice(&cleaned);
    if !reading.has_advice() {
        tracing::debug!("No advice marker in model output, showing main text only");
    }
    reading
}

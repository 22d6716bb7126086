use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::is_valid_birth_date;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// `YYYYMMDD` 格式的生日。只保證是 8 位數字，不保證是實際存在的日期。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BirthDate {
    raw: String,
    year: i32,
    month: u32,
    day: u32,
}

impl BirthDate {
    pub fn parse(input: &str) -> Result<Self> {
        if !is_valid_birth_date(input) {
            return Err(FortuneError::InvalidBirthDate {
                input: input.to_string(),
            });
        }

        // 已確認全為 ASCII 數字，以下切片與轉換不會失敗
        let number = |range: std::ops::Range<usize>| -> u32 {
            input.as_bytes()[range]
                .iter()
                .fold(0, |acc, b| acc * 10 + u32::from(b - b'0'))
        };

        Ok(Self {
            raw: input.to_string(),
            year: number(0..4) as i32,
            month: number(4..6),
            day: number(6..8),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }
}

impl TryFrom<String> for BirthDate {
    type Error = FortuneError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<BirthDate> for String {
    fn from(date: BirthDate) -> Self {
        date.raw
    }
}

impl fmt::Display for BirthDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    pub fn label(&self) -> &'static str {
        match self {
            Gender::Male => "男性",
            Gender::Female => "女性",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Gender {
    type Err = FortuneError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "男性" => Ok(Gender::Male),
            "女性" => Ok(Gender::Female),
            other if other.eq_ignore_ascii_case("male") => Ok(Gender::Male),
            other if other.eq_ignore_ascii_case("female") => Ok(Gender::Female),
            other => Err(FortuneError::InvalidGender {
                input: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NumerologyProfile {
    pub zodiac_element: &'static str,
    pub destiny_star: &'static str,
    pub type_label: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FortuneMode {
    Daily,
    /// 從 `start` 起算的 7 天
    Weekly { start: NaiveDate },
}

#[derive(Debug, Clone)]
pub struct FortuneRequest {
    pub birth_date: BirthDate,
    pub gender: Gender,
    pub extra_question: Option<String>,
    pub mode: FortuneMode,
    pub include_profile: bool,
}

impl FortuneRequest {
    pub fn daily(birth_date: BirthDate, gender: Gender) -> Self {
        Self {
            birth_date,
            gender,
            extra_question: None,
            mode: FortuneMode::Daily,
            include_profile: true,
        }
    }

    /// 空白的追加質問視為沒有
    pub fn question(&self) -> Option<&str> {
        self.extra_question
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
    }
}

/// 模型回傳的原始文字
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneText(pub String);

impl FortuneText {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// 清理並切分後的占卜結果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FortuneReading {
    pub main: String,
    pub advice: String,
}

impl FortuneReading {
    pub fn has_advice(&self) -> bool {
        !self.advice.is_empty()
    }

    /// 圖片與分享連結使用的純文字
    pub fn full_text(&self) -> String {
        if self.has_advice() {
            format!("{}\n\n{}", self.main, self.advice)
        } else {
            self.main.clone()
        }
    }
}

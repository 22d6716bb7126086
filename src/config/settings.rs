use crate::config::toml_config::TomlConfig;
use crate::config::Overrides;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::fmt;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-1.5-pro-latest";
pub const DEFAULT_FONT_SIZE: f32 = 22.0;
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// 啟動時組好一次，之後不再變動
#[derive(Clone)]
pub struct Settings {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub font_path: Option<String>,
    pub font_size: f32,
    pub include_profile: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout_seconds: None,
            font_path: None,
            font_size: DEFAULT_FONT_SIZE,
            include_profile: true,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Settings {
    /// 優先順序：命令列 > TOML > 環境變數 > 預設值
    pub fn resolve(overrides: Overrides, toml: Option<&TomlConfig>, env_key: Option<String>) -> Self {
        let defaults = Self::default();
        let service = toml.map(|t| &t.service);
        let image = toml.map(|t| &t.image);

        let api_key = non_blank(overrides.api_key)
            .or_else(|| toml.and_then(|t| t.api_key()).map(str::to_string))
            .or_else(|| non_blank(env_key));

        Self {
            endpoint: overrides
                .endpoint
                .or_else(|| service.and_then(|s| s.endpoint.clone()))
                .unwrap_or(defaults.endpoint),
            model: overrides
                .model
                .or_else(|| service.and_then(|s| s.model.clone()))
                .unwrap_or(defaults.model),
            api_key,
            timeout_seconds: service.and_then(|s| s.timeout_seconds),
            font_path: overrides
                .font
                .or_else(|| image.and_then(|i| i.font_path.clone())),
            font_size: image
                .and_then(|i| i.font_size)
                .unwrap_or(defaults.font_size),
            include_profile: toml
                .and_then(|t| t.fortune.include_profile)
                .unwrap_or(defaults.include_profile),
        }
    }

    /// 讀取一次 `GEMINI_API_KEY`
    pub fn env_api_key() -> Option<String> {
        std::env::var(API_KEY_ENV).ok()
    }
}

// API key 不能出現在日誌裡
impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout_seconds", &self.timeout_seconds)
            .field("font_path", &self.font_path)
            .field("font_size", &self.font_size)
            .field("include_profile", &self.include_profile)
            .finish()
    }
}

impl ConfigProvider for Settings {
    fn service_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    fn request_timeout_seconds(&self) -> Option<u64> {
        self.timeout_seconds
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("model", &self.model)?;
        if let Some(font_path) = &self.font_path {
            validation::validate_path("font", font_path)?;
        }
        validation::validate_range("font_size", self.font_size, 8.0, 96.0)?;
        Ok(())
    }
}

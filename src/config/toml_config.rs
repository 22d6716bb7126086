use crate::utils::error::{FortuneError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex")
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub image: ImageConfig,
    #[serde(default)]
    pub fortune: FortuneConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageConfig {
    pub font_path: Option<String>,
    pub font_size: Option<f32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FortuneConfig {
    pub include_profile: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(FortuneError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| FortuneError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})；未設定的變數保留原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    /// 仍是 `${...}` 佔位字串的 key 視為未設定
    pub fn api_key(&self) -> Option<&str> {
        self.service
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !ENV_VAR_PATTERN.is_match(key))
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.service.endpoint {
            crate::utils::validation::validate_url("service.endpoint", endpoint)?;
        }
        if let Some(model) = &self.service.model {
            crate::utils::validation::validate_non_empty_string("service.model", model)?;
        }
        if let Some(timeout) = self.service.timeout_seconds {
            crate::utils::validation::validate_range("service.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(font_path) = &self.image.font_path {
            crate::utils::validation::validate_path("image.font_path", font_path)?;
        }
        if let Some(font_size) = self.image.font_size {
            crate::utils::validation::validate_range("image.font_size", font_size, 8.0, 96.0)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[service]
endpoint = "https://generativelanguage.googleapis.com"
model = "gemini-1.5-pro-latest"
api_key = "abc"
timeout_seconds = 30

[image]
font_path = "/usr/share/fonts/NotoSansCJK-Regular.ttc"
font_size = 20.0

[fortune]
include_profile = false
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.service.model.as_deref(), Some("gemini-1.5-pro-latest"));
        assert_eq!(config.api_key(), Some("abc"));
        assert_eq!(config.service.timeout_seconds, Some(30));
        assert_eq!(config.image.font_size, Some(20.0));
        assert_eq!(config.fortune.include_profile, Some(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_config_is_valid() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert!(config.service.endpoint.is_none());
        assert_eq!(config.api_key(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("URANAI_TEST_KEY", "from-env");

        let config = TomlConfig::from_toml_str(
            r#"
[service]
api_key = "${URANAI_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), Some("from-env"));

        std::env::remove_var("URANAI_TEST_KEY");
    }

    #[test]
    fn test_unset_env_var_means_no_key() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
api_key = "${URANAI_SURELY_UNSET_VARIABLE}"
"#,
        )
        .unwrap();
        assert_eq!(config.api_key(), None);
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str(
            r#"
[service]
endpoint = "invalid-url"
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[image]
font_size = 2.0
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str(
            r#"
[image]
font_size = nan
"#,
        )
        .unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let err = TomlConfig::from_toml_str("[service\nmodel = 1").unwrap_err();
        assert!(matches!(err, FortuneError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[service]\nmodel = \"gemini-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.service.model.as_deref(), Some("gemini-file"));
    }
}

use thiserror::Error;

/// 失敗訊息中固定出現的標記，讓使用者一眼辨識這不是占卜結果
pub const FAILURE_INDICATOR: &str = "占いに失敗しました";

#[derive(Error, Debug)]
pub enum FortuneError {
    #[error("Invalid birth date: {input:?} (expected 8 digits, YYYYMMDD)")]
    InvalidBirthDate { input: String },

    #[error("Invalid gender: {input:?}")]
    InvalidGender { input: String },

    #[error("No API key configured for the generation service")]
    MissingCredential,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Generation service returned HTTP {status}: {message}")]
    ServiceError { status: u16, message: String },

    #[error("Malformed response from generation service: {message}")]
    MalformedResponse { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: {value:?} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Image rendering error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Credential,
    Network,
    Api,
    Response,
    Config,
    Io,
    Render,
}

impl FortuneError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            FortuneError::InvalidBirthDate { .. } | FortuneError::InvalidGender { .. } => {
                ErrorCategory::Validation
            }
            FortuneError::MissingCredential => ErrorCategory::Credential,
            FortuneError::ApiError(_) => ErrorCategory::Network,
            FortuneError::ServiceError { .. } => ErrorCategory::Api,
            FortuneError::MalformedResponse { .. } => ErrorCategory::Response,
            FortuneError::ConfigValidationError { .. }
            | FortuneError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            FortuneError::IoError(_) => ErrorCategory::Io,
            FortuneError::RenderError { .. } => ErrorCategory::Render,
        }
    }

    /// 遠端呼叫失敗的種類；非遠端錯誤回傳 None
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            FortuneError::ApiError(e) if e.is_timeout() => Some(FailureKind::Timeout),
            FortuneError::ApiError(_) => Some(FailureKind::Transport),
            FortuneError::ServiceError { status: 401 | 403, .. } => {
                Some(FailureKind::Authentication)
            }
            FortuneError::ServiceError { status: 429, .. } => Some(FailureKind::Quota),
            FortuneError::ServiceError { .. } => Some(FailureKind::Service),
            FortuneError::MalformedResponse { .. } => Some(FailureKind::MalformedResponse),
            _ => None,
        }
    }

    /// 顯示在畫面上的訊息，和占卜結果走同一個輸出管道
    pub fn user_friendly_message(&self) -> String {
        match self {
            FortuneError::InvalidBirthDate { .. } => {
                "⚠ 8桁の数字で入力してください (例: 19900515)".to_string()
            }
            FortuneError::InvalidGender { input } => {
                format!("⚠ 性別は「男性」か「女性」を選択してください (入力: {})", input)
            }
            FortuneError::MissingCredential => {
                "🔑 APIキーが設定されていません。環境変数 GEMINI_API_KEY か設定ファイルの [service].api_key を設定してください。"
                    .to_string()
            }
            FortuneError::ApiError(_)
            | FortuneError::ServiceError { .. }
            | FortuneError::MalformedResponse { .. } => {
                format!("{}: {}", FAILURE_INDICATOR, self)
            }
            FortuneError::ConfigValidationError { .. }
            | FortuneError::InvalidConfigValueError { .. } => {
                format!("設定エラー: {}", self)
            }
            FortuneError::IoError(e) => format!("ファイル操作に失敗しました: {}", e),
            FortuneError::RenderError { message } => {
                format!("画像の生成に失敗しました: {}", message)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Validation => "Enter the birth date as 8 digits, e.g. 19900515",
            ErrorCategory::Credential => {
                "Set GEMINI_API_KEY or [service].api_key in the config file"
            }
            ErrorCategory::Network => "Check network connectivity and the service endpoint",
            ErrorCategory::Api => "Check the API key, model name and quota",
            ErrorCategory::Response => "Retry the request; the model output was unusable",
            ErrorCategory::Config => "Fix the configuration value and run again",
            ErrorCategory::Io => "Check file paths and permissions",
            ErrorCategory::Render => "Check the configured font file",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Transport,
    Timeout,
    Authentication,
    Quota,
    Service,
    MalformedResponse,
}

pub type Result<T> = std::result::Result<T, FortuneError>;

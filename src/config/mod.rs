pub mod settings;
pub mod toml_config;

pub use settings::Settings;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "uranai")]
#[command(about = "生年月日と性別から今日の運勢を占います")]
pub struct CliConfig {
    /// Birth date as YYYYMMDD (asked on stdin when omitted)
    #[arg(short, long)]
    pub birth_date: Option<String>,

    /// 男性 / 女性 (male / female)
    #[arg(short, long, default_value = "男性")]
    pub gender: String,

    /// Extra question for the fortune-teller
    #[arg(short, long)]
    pub question: Option<String>,

    /// Seven-day fortune starting today
    #[arg(long)]
    pub weekly: bool,

    /// Leave the numerology labels out of the prompt
    #[arg(long)]
    pub no_profile: bool,

    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// API key (overrides config file and GEMINI_API_KEY)
    #[arg(long)]
    pub api_key: Option<String>,

    #[arg(long)]
    pub endpoint: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    /// Write the result as a PNG image to this path
    #[arg(long)]
    pub image: Option<String>,

    /// Font file (TTF/OTF) used for the PNG image
    #[arg(long)]
    pub font: Option<String>,

    /// Print the PNG image as a base64 data URI
    #[arg(long)]
    pub data_uri: bool,

    /// Print share links
    #[arg(long)]
    pub share: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

/// 命令列覆蓋設定；沒有 `cli` feature 時也能組出 [`Settings`]
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
    pub font: Option<String>,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            font: self.font.clone(),
        }
    }

    /// 需要產生圖片時才要求字型
    pub fn wants_image(&self) -> bool {
        self.image.is_some() || self.data_uri
    }
}

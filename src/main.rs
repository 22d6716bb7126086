use clap::Parser;
use std::io::{BufRead, Write};
use uranai::app::{render, share};
use uranai::config::toml_config::TomlConfig;
use uranai::core::Storage;
use uranai::utils::{logger, validation::Validate};
use uranai::{submit, CliConfig, FormState, FortuneEngine, FortuneForm, GeminiClient, LocalStorage, Settings};

fn read_birth_date() -> std::io::Result<String> {
    print!("生年月日を YYYYMMDD の形式で入力してください: ");
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

async fn emit_image(config: &CliConfig, settings: &Settings, text: &str) -> uranai::Result<()> {
    let font_path = settings
        .font_path
        .as_deref()
        .ok_or_else(|| uranai::FortuneError::RenderError {
            message: "no font configured (--font or [image].font_path)".to_string(),
        })?;

    let renderer = render::ImageRenderer::from_file(font_path, settings.font_size)?;
    let png = render::encode_png(&renderer.render(text))?;

    if let Some(path) = &config.image {
        LocalStorage::new(".".to_string()).write_file(path, &png).await?;
        println!("🖼  画像を保存しました: {}", path);
    }
    if config.data_uri {
        println!("{}", render::png_data_uri(&png));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    // 初始化日誌
    if config.log_json {
        logger::init_json_logger(config.verbose);
    } else {
        logger::init_cli_logger(config.verbose);
    }

    tracing::info!("Starting uranai");

    // 載入 TOML 配置
    let toml = match &config.config {
        Some(path) => match TomlConfig::from_file(path).and_then(|t| t.validate().map(|_| t)) {
            Ok(toml) => Some(toml),
            Err(e) => {
                tracing::error!("❌ Failed to load config file '{}': {}", path, e);
                eprintln!("❌ {}", e.user_friendly_message());
                eprintln!("💡 {}", e.recovery_suggestion());
                std::process::exit(1);
            }
        },
        None => None,
    };

    // API key 只在啟動時讀取一次
    let settings = Settings::resolve(config.overrides(), toml.as_ref(), Settings::env_api_key());
    tracing::debug!("Settings: {:?}", settings);
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let client = GeminiClient::new(settings.clone())?;
    if !client.has_credential() {
        // 沒有 key 時仍照流程走，結果會是設定說明
        tracing::warn!("🔑 No API key configured; requests are disabled");
    }
    let engine = FortuneEngine::new(client);

    let birth_date = match &config.birth_date {
        Some(value) => value.clone(),
        None => read_birth_date()?,
    };

    let form = FortuneForm {
        birth_date,
        gender: config.gender.clone(),
        question: config.question.clone(),
        weekly: config.weekly,
        include_profile: settings.include_profile && !config.no_profile,
    };

    let today = chrono::Local::now().date_naive();
    let state = submit(&engine, &form, today).await;

    println!("🔮 本格占いアプリ 🔮\n");
    println!("{}", state.display_text());

    if let FormState::Succeeded { reading, .. } = &state {
        let text = reading.full_text();

        if config.wants_image() {
            if let Err(e) = emit_image(&config, &settings, &text).await {
                tracing::error!("❌ Image output failed: {}", e);
                println!("{}", e.user_friendly_message());
            }
        }

        if config.share {
            match share::share_links(&text) {
                Ok(links) => {
                    println!("\n🐦 X でシェア: {}", links.twitter);
                    println!("💬 LINE でシェア: {}", links.line);
                }
                Err(e) => tracing::error!("❌ Share links failed: {}", e),
            }
        }
    }

    Ok(())
}

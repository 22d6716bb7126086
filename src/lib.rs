pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{GeminiClient, LocalStorage};
pub use app::{submit, FormState, FortuneForm};
pub use config::Settings;
pub use core::engine::FortuneEngine;
pub use utils::error::{FortuneError, Result};

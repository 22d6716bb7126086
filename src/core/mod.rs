pub mod engine;
pub mod numerology;
pub mod postprocess;
pub mod prompt;

pub use crate::domain::model::{FortuneReading, FortuneRequest, FortuneText, NumerologyProfile};
pub use crate::domain::ports::{ConfigProvider, FortuneTeller, Storage};
pub use crate::utils::error::Result;

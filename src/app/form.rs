use crate::core::engine::FortuneEngine;
use crate::core::{FortuneReading, FortuneRequest, FortuneTeller};
use crate::domain::model::{BirthDate, FortuneMode, Gender};
use crate::utils::error::{ErrorCategory, FailureKind, FortuneError, Result};
use chrono::NaiveDate;

/// 表單輸入，原樣保留使用者輸入的字串
#[derive(Debug, Clone)]
pub struct FortuneForm {
    pub birth_date: String,
    pub gender: String,
    pub question: Option<String>,
    pub weekly: bool,
    pub include_profile: bool,
}

impl FortuneForm {
    pub fn new(birth_date: impl Into<String>, gender: impl Into<String>) -> Self {
        Self {
            birth_date: birth_date.into(),
            gender: gender.into(),
            question: None,
            weekly: false,
            include_profile: true,
        }
    }

    /// 生年月日只檢查 8 位數字；週運勢從 `today` 起算
    pub fn validate(&self, today: NaiveDate) -> Result<FortuneRequest> {
        let birth_date = BirthDate::parse(&self.birth_date)?;
        let gender: Gender = self.gender.parse()?;
        let mode = if self.weekly {
            FortuneMode::Weekly { start: today }
        } else {
            FortuneMode::Daily
        };

        Ok(FortuneRequest {
            birth_date,
            gender,
            extra_question: self.question.clone(),
            mode,
            include_profile: self.include_profile,
        })
    }
}

/// 單次送出的狀態，不跨請求保留
#[derive(Debug, Clone, PartialEq)]
pub enum FormState {
    Idle,
    Invalid {
        message: String,
    },
    Succeeded {
        mode: FortuneMode,
        reading: FortuneReading,
    },
    Failed {
        category: ErrorCategory,
        kind: Option<FailureKind>,
        message: String,
    },
}

impl FormState {
    fn failed(error: &FortuneError) -> Self {
        FormState::Failed {
            category: error.category(),
            kind: error.failure_kind(),
            message: error.user_friendly_message(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, FormState::Succeeded { .. })
    }

    pub fn reading(&self) -> Option<&FortuneReading> {
        match self {
            FormState::Succeeded { reading, .. } => Some(reading),
            _ => None,
        }
    }

    /// 所有狀態都轉成可顯示的文字，失敗訊息和結果共用同一個輸出
    pub fn display_text(&self) -> String {
        match self {
            FormState::Idle => String::new(),
            FormState::Invalid { message } => message.clone(),
            FormState::Succeeded { mode, reading } => {
                let heading = match mode {
                    FortuneMode::Daily => "✨ 今日の運勢 ✨",
                    FortuneMode::Weekly { .. } => "✨ 今週の運勢 ✨",
                };
                let mut text = format!("{}\n\n{}", heading, reading.main);
                if reading.has_advice() {
                    text.push_str("\n\n💡 アドバイス\n");
                    text.push_str(&reading.advice);
                }
                text
            }
            FormState::Failed { message, .. } => message.clone(),
        }
    }
}

/// 送出表單：驗證 → 呼叫流程。任何結果都回傳狀態而不是錯誤。
pub async fn submit<T: FortuneTeller>(
    engine: &FortuneEngine<T>,
    form: &FortuneForm,
    today: NaiveDate,
) -> FormState {
    let request = match form.validate(today) {
        Ok(request) => request,
        Err(e) => {
            tracing::info!("Form rejected: {}", e);
            return FormState::Invalid {
                message: e.user_friendly_message(),
            };
        }
    };

    match engine.run(&request).await {
        Ok(reading) => FormState::Succeeded {
            mode: request.mode,
            reading,
        },
        Err(e) => {
            tracing::error!(
                "❌ Fortune request failed: {} (Category: {:?})",
                e,
                e.category()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            FormState::failed(&e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FortuneText;
    use crate::utils::error::FAILURE_INDICATOR;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct CountingTeller {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl FortuneTeller for CountingTeller {
        async fn generate(&self, _prompt: &str) -> Result<FortuneText> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(FortuneError::MalformedResponse {
                    message: "empty".to_string(),
                })
            } else {
                Ok(FortuneText("総合運: 好調【アドバイス】深呼吸".to_string()))
            }
        }
    }

    fn engine(fail: bool) -> (FortuneEngine<CountingTeller>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let teller = CountingTeller {
            calls: calls.clone(),
            fail,
        };
        (FortuneEngine::new(teller), calls)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 15).unwrap()
    }

    #[tokio::test]
    async fn test_invalid_date_never_calls_service() {
        let (engine, calls) = engine(false);

        for input in ["", "123", "1990-05-15", "abcdefgh", " 19900515 "] {
            let state = submit(&engine, &FortuneForm::new(input, "男性"), today()).await;
            assert!(matches!(state, FormState::Invalid { .. }));
            assert!(state.display_text().contains("8桁の数字"));
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_success_renders_main_and_advice() {
        let (engine, calls) = engine(false);
        let state = submit(&engine, &FortuneForm::new("19900515", "女性"), today()).await;

        assert!(state.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        let text = state.display_text();
        assert!(text.starts_with("✨ 今日の運勢 ✨"));
        assert!(text.contains("総合運: 好調"));
        assert!(text.contains("💡 アドバイス\n深呼吸"));
    }

    #[tokio::test]
    async fn test_calendar_invalid_date_is_accepted() {
        let (engine, calls) = engine(false);
        let state = submit(&engine, &FortuneForm::new("99999999", "男性"), today()).await;

        assert!(state.is_success());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_is_displayable() {
        let (engine, _) = engine(true);
        let state = submit(&engine, &FortuneForm::new("19900515", "男性"), today()).await;

        match &state {
            FormState::Failed { kind, .. } => {
                assert_eq!(*kind, Some(FailureKind::MalformedResponse))
            }
            other => panic!("unexpected state: {:?}", other),
        }
        assert!(state.display_text().contains(FAILURE_INDICATOR));
        assert!(state.reading().is_none());
    }

    #[tokio::test]
    async fn test_weekly_heading() {
        let (engine, _) = engine(false);
        let mut form = FortuneForm::new("19900515", "male");
        form.weekly = true;

        let state = submit(&engine, &form, today()).await;
        assert!(state.display_text().starts_with("✨ 今週の運勢 ✨"));
    }

    #[test]
    fn test_validate_builds_weekly_request() {
        let mut form = FortuneForm::new("19900515", "女性");
        form.weekly = true;
        form.question = Some("引っ越しは?".to_string());

        let request = form.validate(today()).unwrap();
        assert_eq!(request.mode, FortuneMode::Weekly { start: today() });
        assert_eq!(request.question(), Some("引っ越しは?"));
    }

    #[test]
    fn test_idle_displays_nothing() {
        assert!(FormState::Idle.display_text().is_empty());
    }
}

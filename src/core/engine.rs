use crate::core::{numerology, postprocess, prompt};
use crate::domain::model::{FortuneReading, FortuneRequest};
use crate::domain::ports::FortuneTeller;
use crate::utils::error::Result;

/// 一次送出的完整流程：查表 → 組提示詞 → 呼叫模型 → 後處理
pub struct FortuneEngine<T: FortuneTeller> {
    teller: T,
}

impl<T: FortuneTeller> FortuneEngine<T> {
    pub fn new(teller: T) -> Self {
        Self { teller }
    }

    pub async fn run(&self, request: &FortuneRequest) -> Result<FortuneReading> {
        tracing::info!("🔮 Reading fortune for {} ({:?})", request.birth_date, request.mode);

        let profile = request
            .include_profile
            .then(|| numerology::profile(&request.birth_date));
        if let Some(profile) = &profile {
            tracing::debug!("Numerology profile: {:?}", profile);
        }

        let prompt = prompt::build_prompt(request, profile.as_ref());
        tracing::debug!("Prompt ({} chars):\n{}", prompt.chars().count(), prompt);

        let raw = self.teller.generate(&prompt).await?;
        tracing::debug!("Model returned {} chars", raw.as_str().chars().count());

        Ok(postprocess::post_process(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::postprocess::ADVICE_MARKER;
    use crate::domain::model::{BirthDate, FortuneText, Gender};
    use crate::utils::error::FortuneError;
    use async_trait::async_trait;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockTeller {
        reply: std::result::Result<String, u16>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    impl MockTeller {
        fn replying(text: &str) -> Self {
            Self {
                reply: Ok(text.to_string()),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                reply: Err(status),
                prompts: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl FortuneTeller for MockTeller {
        async fn generate(&self, prompt: &str) -> Result<FortuneText> {
            self.prompts.lock().await.push(prompt.to_string());
            match &self.reply {
                Ok(text) => Ok(FortuneText(text.clone())),
                Err(status) => Err(FortuneError::ServiceError {
                    status: *status,
                    message: "mock failure".to_string(),
                }),
            }
        }
    }

    #[tokio::test]
    async fn test_run_post_processes_reply() {
        let teller = MockTeller::replying(&format!("★総合運: 好調★\n{}笑顔で", ADVICE_MARKER));
        let engine = FortuneEngine::new(teller.clone());
        let request = FortuneRequest::daily(BirthDate::parse("19900515").unwrap(), Gender::Male);

        let reading = engine.run(&request).await.unwrap();

        assert_eq!(reading.main, "総合運: 好調");
        assert_eq!(reading.advice, "笑顔で");

        let prompts = teller.prompts.lock().await;
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("午(火)"));
    }

    #[tokio::test]
    async fn test_run_skips_profile_when_disabled() {
        let teller = MockTeller::replying("総合運: 普通");
        let engine = FortuneEngine::new(teller.clone());
        let mut request =
            FortuneRequest::daily(BirthDate::parse("19900515").unwrap(), Gender::Male);
        request.include_profile = false;

        engine.run(&request).await.unwrap();

        let prompts = teller.prompts.lock().await;
        assert!(!prompts[0].contains("【占術データ】"));
    }

    #[tokio::test]
    async fn test_run_propagates_typed_failure() {
        let engine = FortuneEngine::new(MockTeller::failing(503));
        let request = FortuneRequest::daily(BirthDate::parse("19900515").unwrap(), Gender::Male);

        let err = engine.run(&request).await.unwrap_err();
        assert!(matches!(err, FortuneError::ServiceError { status: 503, .. }));
    }
}

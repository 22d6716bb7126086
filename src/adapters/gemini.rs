use crate::core::{ConfigProvider, FortuneTeller, FortuneText};
use crate::utils::error::{FortuneError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Gemini `generateContent` 的呼叫端。API key 由建構時的設定注入，之後不再變動。
pub struct GeminiClient<C: ConfigProvider> {
    config: C,
    client: Client,
}

impl<C: ConfigProvider> GeminiClient<C> {
    pub fn new(config: C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(seconds) = config.request_timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        Ok(Self {
            config,
            client: builder.build()?,
        })
    }

    pub fn has_credential(&self) -> bool {
        self.config.api_key().is_some()
    }

    pub fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.config.service_endpoint().trim_end_matches('/'),
            self.config.model()
        )
    }
}

fn extract_text(response: GenerateResponse) -> Result<FortuneText> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        let message = match response.prompt_feedback.and_then(|f| f.block_reason) {
            Some(reason) => format!("response blocked ({})", reason),
            None => "response contained no text".to_string(),
        };
        return Err(FortuneError::MalformedResponse { message });
    }

    Ok(FortuneText(text))
}

#[async_trait::async_trait]
impl<C: ConfigProvider> FortuneTeller for GeminiClient<C> {
    async fn generate(&self, prompt: &str) -> Result<FortuneText> {
        // 沒有 key 就不發出任何請求
        let Some(api_key) = self.config.api_key() else {
            tracing::warn!("No API key configured, skipping request");
            return Err(FortuneError::MissingCredential);
        };

        let url = self.generate_url();
        tracing::debug!("Making API request to: {}", url);

        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!("API response status: {}", status);

        if !status.is_success() {
            let raw = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&raw)
                .map(|envelope| envelope.error.message)
                .unwrap_or_else(|_| {
                    if raw.trim().is_empty() {
                        status.canonical_reason().unwrap_or("unknown error").to_string()
                    } else {
                        raw
                    }
                });
            tracing::warn!("Generation service rejected request: {} {}", status, message);
            return Err(FortuneError::ServiceError {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateResponse =
            serde_json::from_str(&raw).map_err(|e| FortuneError::MalformedResponse {
                message: e.to_string(),
            })?;

        extract_text(parsed)
    }
}

use super::backend::GenerativeBackend;
use super::error::EnrichError;
use crate::config::Config;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    system_instruction: Content<'a>,
    generation_config: GenerationConfig,
}

impl<'a> GenerateRequest<'a> {
    fn new(system: &'a str, user: &'a str) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![Part { text: user }],
            }],
            system_instruction: Content {
                parts: vec![Part { text: system }],
            },
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
            },
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate
    fn first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Google Generative Language `generateContent` client
pub struct GeminiBackend {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiBackend {
    pub fn new(config: &Config) -> Result<Self, EnrichError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| EnrichError::Network(e.to_string()))?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn url(&self) -> String {
        format!("{}/{}:generateContent", self.endpoint, self.model)
    }
}

#[async_trait]
impl GenerativeBackend for GeminiBackend {
    async fn generate(&self, system: &str, user: &str) -> Result<String, EnrichError> {
        let key = self.api_key.as_deref().ok_or(EnrichError::MissingApiKey)?;

        debug!(model = %self.model, "sending generateContent request");
        let response = self
            .client
            .post(self.url())
            .query(&[("key", key)])
            .json(&GenerateRequest::new(system, user))
            .send()
            .await
            .map_err(|e| EnrichError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
            let message = match response.json::<ApiErrorBody>().await {
                Ok(body) if !body.error.message.is_empty() => body.error.message,
                _ => fallback,
            };
            return Err(EnrichError::Status {
                code: status.as_u16(),
                message,
            });
        }

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| EnrichError::Malformed(e.to_string()))?;
        body.first_text().ok_or(EnrichError::EmptyResponse)
    }
}

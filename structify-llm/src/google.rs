use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{Completion, CompletionModel, LlmError, TransportFault};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for the Google Generative Language `generateContent` endpoint.
///
/// Completions run with temperature 0 so identical prompts stay as
/// reproducible as the backend allows.
pub struct GoogleGenerativeAi {
    model: String,
    api_key: SecretString,
    base_url: Url,
    http: Client,
}

pub struct GoogleGenerativeAiBuilder {
    model: String,
    api_key: Option<SecretString>,
    base_url: Option<Url>,
    timeout: Duration,
}

impl GoogleGenerativeAiBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn api_key(mut self, api_key: impl Into<SecretString>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: Url) -> Self {
        self.base_url = Some(base_url);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<GoogleGenerativeAi, LlmError> {
        let api_key = self
            .api_key
            .ok_or_else(|| LlmError::CredentialMissing(self.model.clone()))?;
        let base_url = match self.base_url {
            Some(base_url) => base_url,
            None => Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
        };
        let http = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|err| LlmError::Transport {
                status: None,
                message: err.to_string(),
            })?;
        Ok(GoogleGenerativeAi {
            model: self.model,
            api_key,
            base_url,
            http,
        })
    }
}

impl GoogleGenerativeAi {
    pub fn builder() -> GoogleGenerativeAiBuilder {
        GoogleGenerativeAiBuilder {
            model: "gemini-2.5-flash-lite".to_string(),
            api_key: None,
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[async_trait::async_trait]
impl CompletionModel for GoogleGenerativeAi {
    fn name(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion, TransportFault> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: GenerationConfig { temperature: 0.0 },
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.as_str().trim_end_matches('/'),
            self.model
        );
        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                TransportFault::new(err.status().map(|status| status.as_u16()), err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = if body.is_empty() {
                format!("backend returned status {status}")
            } else {
                body
            };
            return Err(TransportFault::new(status.as_u16(), message));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| TransportFault::new(None, err.to_string()))?;
        let candidate = parsed
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| TransportFault::new(None, "no candidates returned"))?;
        let content = candidate
            .content
            .parts
            .into_iter()
            .map(|part| part.text)
            .collect::<Vec<_>>()
            .join("");

        Ok(Completion { content })
    }
}

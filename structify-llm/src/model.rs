use std::sync::Arc;

use secrecy::SecretString;
use serde::Deserialize;
use thiserror::Error;

use crate::{GoogleGenerativeAi, LlmError};

/// The closed set of model names the gateway will resolve.
pub const SUPPORTED_MODELS: [&str; 3] = [
    "gemini-2.0-flash-lite",
    "gemini-2.5-flash",
    "gemini-2.5-flash-lite",
];

/// Caller-supplied model selection: a name from the supported set plus the
/// credential the backend requires. The key deserializes into a
/// [`SecretString`] so it never shows up in debug output.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelReference {
    pub name: String,
    #[serde(default)]
    pub api_key: Option<SecretString>,
}

impl ModelReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            api_key: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::new(api_key.into()));
        self
    }
}

/// A successful completion from a model backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Completion {
    pub content: String,
}

/// Transport-level failure raised by a backend. Status 401 and 400 get
/// classified by the gateway; everything else passes through opaque.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("model backend request failed: {message}")]
pub struct TransportFault {
    pub status: Option<u16>,
    pub message: String,
}

impl TransportFault {
    pub fn new(status: impl Into<Option<u16>>, message: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            message: message.into(),
        }
    }
}

/// The opaque text-completion capability the pipeline orchestrates. One call
/// here is one model invocation; retries and caching are the concrete
/// client's business, never the gateway's.
#[async_trait::async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    async fn complete(&self, prompt: &str) -> Result<Completion, TransportFault>;
}

/// Maps a [`ModelReference`] onto a concrete backend client.
pub trait ModelResolver: Send + Sync {
    fn resolve(&self, model: &ModelReference) -> Result<Arc<dyn CompletionModel>, LlmError>;
}

/// Default resolver: the supported Gemini models, served by
/// [`GoogleGenerativeAi`]. A base URL override points every resolved client
/// at a test server.
#[derive(Clone, Debug, Default)]
pub struct GoogleModelResolver {
    base_url: Option<url::Url>,
}

impl GoogleModelResolver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(base_url: url::Url) -> Self {
        Self {
            base_url: Some(base_url),
        }
    }
}

impl ModelResolver for GoogleModelResolver {
    fn resolve(&self, model: &ModelReference) -> Result<Arc<dyn CompletionModel>, LlmError> {
        if !SUPPORTED_MODELS.contains(&model.name.as_str()) {
            return Err(LlmError::ModelUnavailable(model.name.clone()));
        }
        let api_key = model
            .api_key
            .clone()
            .ok_or_else(|| LlmError::CredentialMissing(model.name.clone()))?;

        let mut builder = GoogleGenerativeAi::builder()
            .model(&model.name)
            .api_key(api_key);
        if let Some(base_url) = &self.base_url {
            builder = builder.base_url(base_url.clone());
        }
        Ok(Arc::new(builder.build()?))
    }
}

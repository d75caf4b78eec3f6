use structify_prompt::TemplateError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model '{0}' is not available")]
    ModelUnavailable(String),
    #[error("API key is missing for model '{0}'")]
    CredentialMissing(String),
    #[error("API key was rejected by the '{0}' backend")]
    CredentialInvalid(String),
    #[error("the '{0}' backend rejected the request as malformed")]
    BadRequestToModel(String),
    #[error("prompt template could not be formatted: {0}")]
    TemplateFormat(#[from] TemplateError),
    #[error("input variable '{0}' is reserved by the refine chain")]
    ReservedVariable(String),
    #[error("prompt template '{template}' does not declare input variable '{variable}'")]
    MissingPromptVariable { template: String, variable: String },
    #[error("transport failure from model backend: {message}")]
    Transport { status: Option<u16>, message: String },
}

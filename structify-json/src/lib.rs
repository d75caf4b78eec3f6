mod error;
pub mod prompts;
mod service;
mod types;
mod validate;

pub use error::JsonError;
pub use service::JsonService;
pub use types::{
    ExtractionExample, JsonAnalyzeRequest, JsonAnalyzeResult, JsonClassificationRequest,
    JsonClassificationResult, JsonExtractExampleRequest, JsonExtractResult,
    JsonExtractSchemaRequest, JsonGenericRequest, JsonGenericResult, RefineMode, RefineParams,
    RefineRecap,
};
pub use validate::{
    validate_analysis, validate_classification, validate_extraction, Analysis, Classification,
    Correction,
};

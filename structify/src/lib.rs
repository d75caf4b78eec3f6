//! Structured JSON from unstructured text via an LLM-backed refine pipeline.
//!
//! The workspace splits by concern:
//! - [`structify_core`]: chunks, trace handlers, the debug tracer and the
//!   refine call counter
//! - [`structify_prompt`]: prompt templates with declared input variables
//! - [`structify_splitter`]: recursive character splitting with overlap
//! - [`structify_llm`]: the model gateway and the refine orchestrator
//! - [`structify_json`]: the JSON operations (extract, analyze, classify)
//!
//! This crate re-exports the public surface of all of them.

pub use structify_core::{
    Chunk, ChainCall, DebugReport, DebugTracer, LlmCall, RefineCallCounter, TraceHandler, Value,
};
pub use structify_json::{
    prompts, validate_analysis, validate_classification, validate_extraction, Analysis,
    Classification, Correction, ExtractionExample, JsonAnalyzeRequest, JsonAnalyzeResult,
    JsonClassificationRequest, JsonClassificationResult, JsonError, JsonExtractExampleRequest,
    JsonExtractResult, JsonExtractSchemaRequest, JsonGenericRequest, JsonGenericResult,
    JsonService, RefineMode, RefineParams, RefineRecap,
};
pub use structify_llm::{
    Completion, CompletionModel, GoogleGenerativeAi, GoogleModelResolver, LlmError, LlmGateway,
    ModelReference, ModelResolver, RefineOutput, TransportFault, CONTEXT_KEY, EXISTING_ANSWER_KEY,
    SUPPORTED_MODELS,
};
pub use structify_prompt::{PromptTemplate, TemplateError};
pub use structify_splitter::{
    tidy_extracted_text, RecursiveCharacterTextSplitter, SplitterConfigError,
};

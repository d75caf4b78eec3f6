use structify_llm::LlmError;
use structify_splitter::SplitterConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum JsonError {
    #[error("model output is not valid json for the requested shape")]
    InvalidJsonOutput,
    #[error("refine parameters are invalid: chunk_size ({chunk_size}) must be non-zero and greater than overlap ({overlap})")]
    InvalidRefineParams { chunk_size: usize, overlap: usize },
    #[error(transparent)]
    Llm(#[from] LlmError),
    #[error(transparent)]
    Splitter(#[from] SplitterConfigError),
}

mod error;
mod gateway;
mod google;
mod model;
mod refine;

pub use error::LlmError;
pub use gateway::LlmGateway;
pub use google::{GoogleGenerativeAi, GoogleGenerativeAiBuilder};
pub use model::{
    Completion, CompletionModel, GoogleModelResolver, ModelReference, ModelResolver,
    TransportFault, SUPPORTED_MODELS,
};
pub use refine::{RefineOutput, CONTEXT_KEY, EXISTING_ANSWER_KEY};

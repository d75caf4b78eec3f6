mod callbacks;
mod debug;
mod document;
mod refine_counter;
mod value;

pub use callbacks::TraceHandler;
pub use debug::{ChainCall, DebugReport, DebugTracer, LlmCall};
pub use document::Chunk;
pub use refine_counter::RefineCallCounter;
pub use value::Value;

use serde::{Deserialize, Serialize};

/// One bounded piece of a source document. Position in the sequence returned
/// by the splitter is the chunk's identity; it carries no other metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chunk {
    pub text: String,
}

impl Chunk {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl From<String> for Chunk {
    fn from(text: String) -> Self {
        Self { text }
    }
}

impl From<&str> for Chunk {
    fn from(text: &str) -> Self {
        Self { text: text.to_string() }
    }
}

use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use structify_core::{DebugReport, Value};
use structify_llm::ModelReference;

use crate::validate::{Analysis, Classification};
use crate::JsonError;

/// Chunking parameters for the refine technique. Construction enforces
/// `chunk_size > overlap` and `chunk_size > 0`, so invalid combinations are
/// rejected before any splitting happens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefineParams {
    chunk_size: usize,
    overlap: usize,
}

impl RefineParams {
    pub fn new(chunk_size: usize, overlap: usize) -> Result<Self, JsonError> {
        if chunk_size == 0 || chunk_size <= overlap {
            return Err(JsonError::InvalidRefineParams {
                chunk_size,
                overlap,
            });
        }
        Ok(Self {
            chunk_size,
            overlap,
        })
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn overlap(&self) -> usize {
        self.overlap
    }
}

impl Default for RefineParams {
    fn default() -> Self {
        Self {
            chunk_size: 2000,
            overlap: 100,
        }
    }
}

/// The request-side `refine` field: `false`/absent disables the technique,
/// `true` enables it with defaults, an object supplies explicit parameters.
/// Resolved once here so nothing downstream sees the loose union.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RefineMode {
    #[default]
    Disabled,
    Enabled(RefineParams),
}

impl RefineMode {
    pub fn params(&self) -> Option<RefineParams> {
        match self {
            Self::Disabled => None,
            Self::Enabled(params) => Some(*params),
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct RawRefineParams {
    chunk_size: usize,
    overlap: usize,
}

impl<'de> Deserialize<'de> for RefineMode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Bool(false) => Ok(Self::Disabled),
            Value::Bool(true) => Ok(Self::Enabled(RefineParams::default())),
            Value::Object(_) => {
                let raw: RawRefineParams =
                    serde_json::from_value(value).map_err(serde::de::Error::custom)?;
                let params = RefineParams::new(raw.chunk_size, raw.overlap)
                    .map_err(serde::de::Error::custom)?;
                Ok(Self::Enabled(params))
            }
            _ => Err(serde::de::Error::custom(
                "refine must be a boolean or an object with chunkSize and overlap",
            )),
        }
    }
}

/// Summary attached to extraction results: `false` on the wire when the
/// refine technique was not used, otherwise the parameters plus the number
/// of model calls the job took.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefineRecap {
    Disabled,
    Used {
        chunk_size: usize,
        overlap: usize,
        llm_call_count: usize,
    },
}

impl RefineRecap {
    pub fn used(params: RefineParams, llm_call_count: usize) -> Self {
        Self::Used {
            chunk_size: params.chunk_size(),
            overlap: params.overlap(),
            llm_call_count,
        }
    }
}

impl Serialize for RefineRecap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Disabled => serializer.serialize_bool(false),
            Self::Used {
                chunk_size,
                overlap,
                llm_call_count,
            } => {
                let mut state = serializer.serialize_struct("RefineRecap", 3)?;
                state.serialize_field("chunkSize", chunk_size)?;
                state.serialize_field("overlap", overlap)?;
                state.serialize_field("llmCallCount", llm_call_count)?;
                state.end()
            }
        }
    }
}

/// One-shot extraction example: an input document and the output expected
/// for it.
#[derive(Clone, Debug, Deserialize)]
pub struct ExtractionExample {
    pub input: String,
    pub output: String,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExtractSchemaRequest {
    pub text: String,
    pub model: ModelReference,
    pub json_schema: String,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub refine: RefineMode,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExtractExampleRequest {
    pub text: String,
    pub model: ModelReference,
    pub example_input: String,
    pub example_output: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAnalyzeRequest {
    pub model: ModelReference,
    pub json_output: String,
    pub original_text: String,
    pub json_schema: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonClassificationRequest {
    pub model: ModelReference,
    pub text: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGenericRequest {
    pub model: ModelReference,
    pub prompt: String,
    #[serde(default)]
    pub debug: bool,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonExtractResult {
    pub model: String,
    pub refine: RefineRecap,
    pub output: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonAnalyzeResult {
    pub model: String,
    pub analysis: Analysis,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonClassificationResult {
    pub model: String,
    pub classification: Classification,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugReport>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonGenericResult {
    pub model: String,
    pub output: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<DebugReport>,
}

use serde::{Deserialize, Deserializer, Serialize};
use structify_core::Value;

use crate::JsonError;

/// One issue the analysis found in a generated JSON document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Correction {
    pub field: String,
    pub issue: String,
    pub description: String,
    pub suggestion: String,
}

/// Validated shape of an analysis response.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analysis {
    pub corrections: Vec<Correction>,
    pub text_analysis: String,
}

/// Validated shape of a classification response. Models occasionally return
/// the confidence as a bare number, so both spellings deserialize.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub classification: String,
    #[serde(deserialize_with = "string_or_number")]
    pub confidence: String,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        _ => Err(serde::de::Error::custom("expected a string or a number")),
    }
}

/// Strips a leading/trailing markdown code fence. Gemini routinely wraps
/// JSON answers in one.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(rest) = trimmed.strip_prefix("```json") {
        rest.trim_end_matches("```").trim()
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest.trim_end_matches("```").trim()
    } else {
        trimmed
    }
}

fn parse_json(raw: &str) -> Result<Value, JsonError> {
    serde_json::from_str(strip_code_fences(raw)).map_err(|_| JsonError::InvalidJsonOutput)
}

/// Extraction output: any valid JSON is accepted as-is. Whether it matches
/// the caller's schema is the model's responsibility, not re-checked here.
pub fn validate_extraction(raw: &str) -> Result<Value, JsonError> {
    parse_json(raw)
}

/// Analysis output: `corrections` must be an array whose elements carry
/// string-typed `field`/`issue`/`description`/`suggestion`, and
/// `textAnalysis` must be present.
pub fn validate_analysis(raw: &str) -> Result<Analysis, JsonError> {
    let value = parse_json(raw)?;
    serde_json::from_value(value).map_err(|_| JsonError::InvalidJsonOutput)
}

/// Classification output: a non-empty `classification` plus a present,
/// non-empty `confidence`.
pub fn validate_classification(raw: &str) -> Result<Classification, JsonError> {
    let value = parse_json(raw)?;
    let classification: Classification =
        serde_json::from_value(value).map_err(|_| JsonError::InvalidJsonOutput)?;
    if classification.classification.is_empty() || classification.confidence.is_empty() {
        return Err(JsonError::InvalidJsonOutput);
    }
    Ok(classification)
}

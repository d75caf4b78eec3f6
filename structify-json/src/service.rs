use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use structify_core::{DebugTracer, TraceHandler, Value};
use structify_llm::{GoogleModelResolver, LlmGateway, ModelReference, ModelResolver};
use structify_splitter::RecursiveCharacterTextSplitter;

use crate::types::{
    ExtractionExample, JsonAnalyzeResult, JsonClassificationResult, JsonExtractResult,
    JsonGenericResult, RefineParams, RefineRecap,
};
use crate::{prompts, validate, JsonError};

/// The JSON operation layer: each method resolves the caller's model, runs
/// one orchestrated generation, validates the output shape, and attaches the
/// debug report when asked for one.
///
/// Every call builds its own gateway and tracer, so concurrent requests
/// share nothing.
pub struct JsonService<R: ModelResolver = GoogleModelResolver> {
    resolver: R,
    default_refine_params: RefineParams,
}

impl JsonService<GoogleModelResolver> {
    pub fn new() -> Self {
        Self::with_resolver(GoogleModelResolver::new())
    }
}

impl Default for JsonService<GoogleModelResolver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: ModelResolver> JsonService<R> {
    pub fn with_resolver(resolver: R) -> Self {
        Self {
            resolver,
            default_refine_params: RefineParams::default(),
        }
    }

    pub fn with_default_refine_params(mut self, params: RefineParams) -> Self {
        self.default_refine_params = params;
        self
    }

    /// Extract structured data from `text` using a JSON schema as the model.
    pub async fn extract_with_schema(
        &self,
        text: &str,
        model: &ModelReference,
        json_schema: &str,
        debug: bool,
    ) -> Result<JsonExtractResult, JsonError> {
        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([
            ("context".to_string(), Value::from(text)),
            ("json_schema".to_string(), Value::from(json_schema)),
        ]);

        let output = gateway
            .generate_output(
                &prompts::json_zero_shot_schema_extraction(),
                &values,
                &handler_list(&tracer),
            )
            .await?;
        let parsed = validate::validate_extraction(&output)?;

        Ok(JsonExtractResult {
            model: model.name.clone(),
            refine: RefineRecap::Disabled,
            output: parsed,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }

    /// Schema extraction over a long document: split into overlapping
    /// chunks and fold them through the refine technique.
    pub async fn extract_with_schema_refined(
        &self,
        text: &str,
        model: &ModelReference,
        json_schema: &str,
        refine_params: Option<RefineParams>,
        debug: bool,
    ) -> Result<JsonExtractResult, JsonError> {
        let params = refine_params.unwrap_or(self.default_refine_params);
        let splitter = RecursiveCharacterTextSplitter::builder()
            .chunk_size(params.chunk_size())
            .chunk_overlap(params.overlap())
            .build()?;
        let chunks = splitter.split_chunks(text);
        tracing::debug!(
            chunks = chunks.len(),
            chunk_size = params.chunk_size(),
            overlap = params.overlap(),
            "refine extraction"
        );

        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([("json_schema".to_string(), Value::from(json_schema))]);

        let refined = gateway
            .generate_refine_output(
                &prompts::json_zero_shot_schema_extraction(),
                &prompts::json_zero_shot_schema_extraction_refine(),
                &chunks,
                &values,
                &handler_list(&tracer),
            )
            .await?;
        let parsed = validate::validate_extraction(&refined.output)?;

        Ok(JsonExtractResult {
            model: model.name.clone(),
            refine: RefineRecap::used(params, refined.llm_call_count),
            output: parsed,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }

    /// Extract structured data from `text` by imitating a single example.
    pub async fn extract_with_example(
        &self,
        text: &str,
        model: &ModelReference,
        example: &ExtractionExample,
        debug: bool,
    ) -> Result<JsonExtractResult, JsonError> {
        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([
            ("context".to_string(), Value::from(text)),
            ("example_input".to_string(), Value::from(example.input.as_str())),
            (
                "example_output".to_string(),
                Value::from(example.output.as_str()),
            ),
        ]);

        let output = gateway
            .generate_output(
                &prompts::json_one_shot_extraction(),
                &values,
                &handler_list(&tracer),
            )
            .await?;
        let parsed = validate::validate_extraction(&output)?;

        Ok(JsonExtractResult {
            model: model.name.clone(),
            refine: RefineRecap::Disabled,
            output: parsed,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }

    /// Review a previously generated JSON output against the original text
    /// and schema, returning the model's corrections.
    pub async fn analyze_json_output(
        &self,
        model: &ModelReference,
        json_output: &str,
        original_text: &str,
        json_schema: &str,
        debug: bool,
    ) -> Result<JsonAnalyzeResult, JsonError> {
        let output_format = json!({
            "corrections": [{
                "field": "the field in the generated JSON that needs to be corrected",
                "issue": "the issue you identified",
                "description": "your description of the issue, give your full reasoning for why it is an issue",
                "suggestion": "your suggestion for correction",
            }],
            "textAnalysis": "Your detailed and precise analysis, exposing your whole thought process, step by step. Do not provide a corrected JSON output in this field. Generate a readable text in markdown.",
        });

        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([
            ("json_schema".to_string(), Value::from(json_schema)),
            ("original_text".to_string(), Value::from(original_text)),
            ("json_output".to_string(), Value::from(json_output)),
            (
                "output_format".to_string(),
                Value::from(output_format.to_string()),
            ),
        ]);

        let output = gateway
            .generate_output(&prompts::json_analysis(), &values, &handler_list(&tracer))
            .await?;
        let analysis = validate::validate_analysis(&output)?;

        Ok(JsonAnalyzeResult {
            model: model.name.clone(),
            analysis,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }

    /// Classify `text` into one of the caller's categories.
    pub async fn classify_text(
        &self,
        model: &ModelReference,
        text: &str,
        categories: &[String],
        debug: bool,
    ) -> Result<JsonClassificationResult, JsonError> {
        let output_format = json!({
            "classification": "classification of the text",
            "confidence": "number representing your confidence of the classification in percentage. display only the number, not the percentage sign",
        });

        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([
            ("categories".to_string(), Value::from(categories.to_vec())),
            ("text".to_string(), Value::from(text)),
            (
                "output_format".to_string(),
                Value::from(output_format.to_string()),
            ),
        ]);

        let output = gateway
            .generate_output(
                &prompts::json_classification(),
                &values,
                &handler_list(&tracer),
            )
            .await?;
        let classification = validate::validate_classification(&output)?;

        Ok(JsonClassificationResult {
            model: model.name.clone(),
            classification,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }

    /// Run an arbitrary caller prompt through the model and hand the text
    /// back without shape validation.
    pub async fn handle_generic_prompt(
        &self,
        model: &ModelReference,
        prompt: &str,
        debug: bool,
    ) -> Result<JsonGenericResult, JsonError> {
        let gateway = LlmGateway::resolve(&self.resolver, model)?;
        let tracer = new_tracer(debug);
        let values = HashMap::from([("prompt".to_string(), Value::from(prompt))]);

        let output = gateway
            .generate_output(
                &prompts::json_generic_prompt(),
                &values,
                &handler_list(&tracer),
            )
            .await?;

        Ok(JsonGenericResult {
            model: model.name.clone(),
            output,
            debug: tracer.map(|tracer| tracer.report()),
        })
    }
}

fn new_tracer(debug: bool) -> Option<Arc<DebugTracer>> {
    debug.then(|| Arc::new(DebugTracer::new()))
}

fn handler_list(tracer: &Option<Arc<DebugTracer>>) -> Vec<Arc<dyn TraceHandler>> {
    tracer
        .iter()
        .map(|tracer| tracer.clone() as Arc<dyn TraceHandler>)
        .collect()
}

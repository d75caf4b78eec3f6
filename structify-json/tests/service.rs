use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::json;
use structify_json::{
    ExtractionExample, JsonError, JsonService, RefineParams, RefineRecap,
};
use structify_llm::{
    Completion, CompletionModel, LlmError, LlmGateway, ModelReference, ModelResolver,
    TransportFault,
};

struct ScriptedModel {
    responses: Mutex<VecDeque<String>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(responses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.iter().map(|text| text.to_string()).collect()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl CompletionModel for ScriptedModel {
    fn name(&self) -> &str {
        "gemini-2.5-flash-lite"
    }

    async fn complete(&self, _prompt: &str) -> Result<Completion, TransportFault> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().pop_front() {
            Some(content) => Ok(Completion { content }),
            None => Err(TransportFault::new(None, "script exhausted")),
        }
    }
}

struct ScriptedResolver {
    model: Arc<ScriptedModel>,
}

impl ModelResolver for ScriptedResolver {
    fn resolve(&self, _model: &ModelReference) -> Result<Arc<dyn CompletionModel>, LlmError> {
        Ok(self.model.clone())
    }
}

fn service_with(model: &Arc<ScriptedModel>) -> JsonService<ScriptedResolver> {
    JsonService::with_resolver(ScriptedResolver {
        model: model.clone(),
    })
}

fn gemini() -> ModelReference {
    ModelReference::new("gemini-2.5-flash-lite").with_api_key("key")
}

#[tokio::test]
async fn extract_with_schema_returns_parsed_output() {
    let model = ScriptedModel::new(&[r#"{"name": "Ada"}"#]);
    let service = service_with(&model);

    let result = service
        .extract_with_schema("Ada wrote programs.", &gemini(), r#"{"name": "string"}"#, false)
        .await
        .expect("extraction");

    assert_eq!(result.model, "gemini-2.5-flash-lite");
    assert_eq!(result.output, json!({"name": "Ada"}));
    assert_eq!(result.refine, RefineRecap::Disabled);
    assert!(result.debug.is_none());
}

#[tokio::test]
async fn extract_with_schema_attaches_a_debug_report_on_request() {
    let model = ScriptedModel::new(&[r#"{"name": "Ada"}"#]);
    let service = service_with(&model);

    let result = service
        .extract_with_schema("Ada wrote programs.", &gemini(), "{}", true)
        .await
        .expect("extraction");

    let report = result.debug.expect("debug report");
    assert_eq!(report.chain_call_count, 1);
    assert_eq!(report.llm_call_count, 1);
    assert!(report.llms[0].prompt.contains("Ada wrote programs."));
}

#[tokio::test]
async fn extract_with_schema_rejects_non_json_model_output() {
    let model = ScriptedModel::new(&["this is not json"]);
    let service = service_with(&model);

    let err = service
        .extract_with_schema("text", &gemini(), "{}", false)
        .await
        .unwrap_err();

    assert!(matches!(err, JsonError::InvalidJsonOutput));
}

#[tokio::test]
async fn refined_extraction_reports_one_call_per_chunk() {
    let model = ScriptedModel::new(&[r#"{"v": 1}"#, r#"{"v": 2}"#, r#"{"v": 3}"#]);
    let service = service_with(&model);
    let params = RefineParams::new(5, 0).expect("params");

    let result = service
        .extract_with_schema_refined(
            "aaa\n\nbbb\n\nccc",
            &gemini(),
            "{}",
            Some(params),
            true,
        )
        .await
        .expect("refined extraction");

    assert_eq!(model.calls(), 3);
    assert_eq!(result.output, json!({"v": 3}));
    assert_eq!(
        result.refine,
        RefineRecap::Used {
            chunk_size: 5,
            overlap: 0,
            llm_call_count: 3
        }
    );

    let report = result.debug.expect("debug report");
    assert_eq!(report.chain_call_count, 1);
    assert_eq!(report.llm_call_count, 3);
}

#[tokio::test]
async fn refined_extraction_uses_the_default_params_when_none_are_given() {
    let model = ScriptedModel::new(&[r#"{"v": 1}"#]);
    let service = service_with(&model);

    let result = service
        .extract_with_schema_refined("short document", &gemini(), "{}", None, false)
        .await
        .expect("refined extraction");

    assert_eq!(model.calls(), 1);
    assert_eq!(
        result.refine,
        RefineRecap::Used {
            chunk_size: 2000,
            overlap: 100,
            llm_call_count: 1
        }
    );
}

#[tokio::test]
async fn extract_with_example_follows_the_one_shot_template() {
    let model = ScriptedModel::new(&[r#"{"title": "Dune"}"#]);
    let service = service_with(&model);
    let example = ExtractionExample {
        input: "A book called Hyperion".to_string(),
        output: r#"{"title": "Hyperion"}"#.to_string(),
    };

    let result = service
        .extract_with_example("A book called Dune", &gemini(), &example, false)
        .await
        .expect("extraction");

    assert_eq!(result.output, json!({"title": "Dune"}));
    assert_eq!(result.refine, RefineRecap::Disabled);
}

#[tokio::test]
async fn analyze_json_output_validates_the_corrections_shape() {
    let model = ScriptedModel::new(&[r#"{
        "corrections": [{
            "field": "name",
            "issue": "missing",
            "description": "the name is absent",
            "suggestion": "add it"
        }],
        "textAnalysis": "one field was missed"
    }"#]);
    let service = service_with(&model);

    let result = service
        .analyze_json_output(&gemini(), r#"{"age": 3}"#, "Ada, age 3", "{}", false)
        .await
        .expect("analysis");

    assert_eq!(result.analysis.corrections.len(), 1);
    assert_eq!(result.analysis.corrections[0].field, "name");
}

#[tokio::test]
async fn classify_text_returns_the_validated_classification() {
    let model = ScriptedModel::new(&[r#"{"classification": "positive", "confidence": "87"}"#]);
    let service = service_with(&model);
    let categories = vec!["positive".to_string(), "negative".to_string()];

    let result = service
        .classify_text(&gemini(), "what a great day", &categories, false)
        .await
        .expect("classification");

    assert_eq!(result.classification.classification, "positive");
    assert_eq!(result.classification.confidence, "87");
}

#[tokio::test]
async fn generic_prompt_passes_output_through_unvalidated() {
    let model = ScriptedModel::new(&["plain text answer"]);
    let service = service_with(&model);

    let result = service
        .handle_generic_prompt(&gemini(), "say something", false)
        .await
        .expect("generic output");

    assert_eq!(result.output, "plain text answer");
}

#[tokio::test]
async fn unknown_models_fail_before_any_network_access() {
    let service = JsonService::new();

    let err = service
        .extract_with_schema("text", &ModelReference::new("gpt-4o"), "{}", false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JsonError::Llm(LlmError::ModelUnavailable(name)) if name == "gpt-4o"
    ));
}

#[tokio::test]
async fn gateway_errors_propagate_through_the_service() {
    let model = ScriptedModel::new(&[]);
    let service = service_with(&model);

    let err = service
        .extract_with_schema("text", &gemini(), "{}", false)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        JsonError::Llm(LlmError::Transport { status: None, .. })
    ));
}

#[tokio::test]
async fn service_and_gateway_agree_on_call_counts() {
    let model = ScriptedModel::new(&[r#"{"v": 1}"#, r#"{"v": 2}"#]);
    let gateway = LlmGateway::new(model.clone());

    let refined = gateway
        .generate_refine_output(
            &structify_json::prompts::json_zero_shot_schema_extraction(),
            &structify_json::prompts::json_zero_shot_schema_extraction_refine(),
            &[
                structify_core::Chunk::from("part one"),
                structify_core::Chunk::from("part two"),
            ],
            &std::collections::HashMap::from([(
                "json_schema".to_string(),
                structify_core::Value::from("{}"),
            )]),
            &[],
        )
        .await
        .expect("refine output");

    assert_eq!(refined.llm_call_count, model.calls());
    assert_eq!(refined.llm_call_count, 2);
}

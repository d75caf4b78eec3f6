use std::collections::HashMap;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use structify_core::{DebugTracer, TraceHandler, Value};
use structify_llm::{
    Completion, CompletionModel, GoogleModelResolver, LlmError, LlmGateway, ModelReference,
    ModelResolver, TransportFault,
};
use structify_prompt::PromptTemplate;

struct ScriptedModel {
    responses: Mutex<VecDeque<Result<Completion, TransportFault>>>,
    calls: AtomicUsize,
}

impl ScriptedModel {
    fn new(responses: Vec<Result<Completion, TransportFault>>) -> Arc<Self> {
        Arc::new(Self {
            responses: Mutex::new(responses.into()),
            calls: AtomicUsize::new(0),
        })
    }

    fn replying(content: &str) -> Arc<Self> {
        Self::new(vec![Ok(Completion {
            content: content.to_string(),
        })])
    }

    fn failing(status: Option<u16>) -> Arc<Self> {
        Self::new(vec![Err(TransportFault::new(status, "backend said no"))])
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
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(TransportFault::new(None, "script exhausted")))
    }
}

fn context_template() -> PromptTemplate {
    PromptTemplate::new("Input: {{context}}", &["context"])
}

fn context_values(text: &str) -> HashMap<String, Value> {
    HashMap::from([("context".to_string(), Value::from(text))])
}

#[test]
fn resolver_rejects_unknown_model_names() {
    let resolver = GoogleModelResolver::new();
    let err = resolver
        .resolve(&ModelReference::new("gpt-4o").with_api_key("key"))
        .err()
        .unwrap();
    assert!(matches!(err, LlmError::ModelUnavailable(name) if name == "gpt-4o"));
}

#[test]
fn resolver_requires_a_credential_for_known_models() {
    let resolver = GoogleModelResolver::new();
    let err = resolver
        .resolve(&ModelReference::new("gemini-2.5-flash"))
        .err()
        .unwrap();
    assert!(matches!(err, LlmError::CredentialMissing(name) if name == "gemini-2.5-flash"));
}

#[tokio::test]
async fn complete_emits_one_start_end_pair_per_call() {
    let model = ScriptedModel::replying("hello");
    let gateway = LlmGateway::new(model.clone());
    let tracer = Arc::new(DebugTracer::new());
    let handlers: Vec<Arc<dyn TraceHandler>> = vec![tracer.clone()];

    let output = gateway
        .complete(&context_template(), &context_values("text"), &handlers, None)
        .await
        .expect("completion");

    assert_eq!(output, "hello");
    assert_eq!(model.calls(), 1);
    let report = tracer.report();
    assert_eq!(report.llm_call_count, 1);
    assert_eq!(report.llms[0].prompt, "Input: text");
    assert_eq!(
        report.llms[0].outputs,
        Some(serde_json::json!({"content": "hello"}))
    );
    assert_eq!(report.llms[0].error, None);
}

#[tokio::test]
async fn unauthorized_fault_maps_to_credential_invalid() {
    let model = ScriptedModel::failing(Some(401));
    let gateway = LlmGateway::new(model.clone());
    let tracer = Arc::new(DebugTracer::new());
    let handlers: Vec<Arc<dyn TraceHandler>> = vec![tracer.clone()];

    let err = gateway
        .complete(&context_template(), &context_values("text"), &handlers, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::CredentialInvalid(_)));
    let report = tracer.report();
    assert_eq!(report.llm_call_count, 1);
    assert!(report.llms[0].error.is_some());
    assert_eq!(report.llms[0].outputs, None);
}

#[tokio::test]
async fn bad_request_fault_maps_to_bad_request_to_model() {
    let gateway = LlmGateway::new(ScriptedModel::failing(Some(400)));

    let err = gateway
        .complete(&context_template(), &context_values("text"), &[], None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::BadRequestToModel(_)));
}

#[tokio::test]
async fn other_faults_propagate_as_transport_errors() {
    let gateway = LlmGateway::new(ScriptedModel::failing(Some(503)));

    let err = gateway
        .complete(&context_template(), &context_values("text"), &[], None)
        .await
        .unwrap_err();

    match err {
        LlmError::Transport { status, message } => {
            assert_eq!(status, Some(503));
            assert_eq!(message, "backend said no");
        }
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn template_mismatch_fails_before_any_model_call() {
    let model = ScriptedModel::replying("unused");
    let gateway = LlmGateway::new(model.clone());
    let tracer = Arc::new(DebugTracer::new());
    let handlers: Vec<Arc<dyn TraceHandler>> = vec![tracer.clone()];

    let err = gateway
        .complete(&context_template(), &HashMap::new(), &handlers, None)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::TemplateFormat(_)));
    assert_eq!(model.calls(), 0);
    assert_eq!(tracer.report().llm_call_count, 0);
}

#[tokio::test]
async fn generate_output_nests_the_llm_call_under_a_chain() {
    let gateway = LlmGateway::new(ScriptedModel::replying("done"));
    let tracer = Arc::new(DebugTracer::new());
    let handlers: Vec<Arc<dyn TraceHandler>> = vec![tracer.clone()];

    let output = gateway
        .generate_output(&context_template(), &context_values("text"), &handlers)
        .await
        .expect("output");

    assert_eq!(output, "done");
    let report = tracer.report();
    assert_eq!(report.chain_call_count, 1);
    assert_eq!(report.llm_call_count, 1);
    assert_eq!(report.llms[0].parent_run_id, Some(report.chains[0].run_id));
    assert_eq!(
        report.chains[0].outputs,
        Some(serde_json::json!({"output": "done"}))
    );
}

#[tokio::test]
async fn generate_output_records_the_chain_error_on_failure() {
    let gateway = LlmGateway::new(ScriptedModel::failing(Some(401)));
    let tracer = Arc::new(DebugTracer::new());
    let handlers: Vec<Arc<dyn TraceHandler>> = vec![tracer.clone()];

    let err = gateway
        .generate_output(&context_template(), &context_values("text"), &handlers)
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::CredentialInvalid(_)));
    let report = tracer.report();
    assert!(report.chains[0].error.is_some());
    assert_eq!(report.chains[0].outputs, None);
}

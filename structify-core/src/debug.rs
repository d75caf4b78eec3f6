use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{TraceHandler, Value};

/// Lifecycle record of one chain invocation. `outputs` and `error` stay
/// `None` until the matching end/error event arrives.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainCall {
    pub name: String,
    pub run_id: Uuid,
    pub inputs: Value,
    pub outputs: Option<Value>,
    pub error: Option<String>,
}

/// Lifecycle record of one model invocation, optionally parented to the
/// chain call it ran under.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LlmCall {
    pub name: String,
    pub run_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_run_id: Option<Uuid>,
    pub prompt: String,
    pub outputs: Option<Value>,
    pub error: Option<String>,
}

/// Aggregate trace of one logical operation, in event receipt order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugReport {
    pub chain_call_count: usize,
    pub llm_call_count: usize,
    pub chains: Vec<ChainCall>,
    pub llms: Vec<LlmCall>,
}

/// Records every chain and LLM call it observes into a [`DebugReport`].
///
/// One tracer is created per operation and owned by it exclusively; `report`
/// snapshots whatever has been recorded so far, so partial traces stay
/// readable after a failed run. End/error events for an unknown run id are
/// ignored rather than treated as errors: a run may finish after the report
/// stopped being watched.
#[derive(Debug, Default)]
pub struct DebugTracer {
    report: Mutex<DebugReport>,
}

impl DebugTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> DebugReport {
        self.lock().clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, DebugReport> {
        // Handler calls never panic while holding the lock.
        self.report.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl TraceHandler for DebugTracer {
    fn on_chain_start(&self, name: &str, inputs: &Value, run_id: Uuid) {
        let mut report = self.lock();
        report.chains.push(ChainCall {
            name: name.to_string(),
            run_id,
            inputs: inputs.clone(),
            outputs: None,
            error: None,
        });
        report.chain_call_count = report.chains.len();
    }

    fn on_chain_end(&self, outputs: &Value, run_id: Uuid) {
        let mut report = self.lock();
        if let Some(chain) = report.chains.iter_mut().find(|call| call.run_id == run_id) {
            chain.outputs = Some(outputs.clone());
        }
    }

    fn on_chain_error(&self, error: &str, run_id: Uuid) {
        let mut report = self.lock();
        if let Some(chain) = report.chains.iter_mut().find(|call| call.run_id == run_id) {
            chain.error = Some(error.to_string());
        }
    }

    fn on_llm_start(&self, name: &str, prompt: &str, run_id: Uuid, parent_run_id: Option<Uuid>) {
        let mut report = self.lock();
        report.llms.push(LlmCall {
            name: name.to_string(),
            run_id,
            parent_run_id,
            prompt: prompt.to_string(),
            outputs: None,
            error: None,
        });
        report.llm_call_count = report.llms.len();
    }

    fn on_llm_end(&self, outputs: &Value, run_id: Uuid) {
        let mut report = self.lock();
        if let Some(call) = report.llms.iter_mut().find(|call| call.run_id == run_id) {
            call.outputs = Some(outputs.clone());
        }
    }

    fn on_llm_error(&self, error: &str, run_id: Uuid) {
        let mut report = self.lock();
        if let Some(call) = report.llms.iter_mut().find(|call| call.run_id == run_id) {
            call.error = Some(error.to_string());
        }
    }
}

use uuid::Uuid;

use crate::Value;

/// Observer for chain and LLM call lifecycles.
///
/// Handlers are invoked synchronously by whoever drives the calls (the
/// gateway or the refine loop), in event order. Every method defaults to a
/// no-op so a handler only has to implement the slice of the lifecycle it
/// cares about.
pub trait TraceHandler: Send + Sync {
    fn on_chain_start(&self, _name: &str, _inputs: &Value, _run_id: Uuid) {}

    fn on_chain_end(&self, _outputs: &Value, _run_id: Uuid) {}

    fn on_chain_error(&self, _error: &str, _run_id: Uuid) {}

    fn on_llm_start(&self, _name: &str, _prompt: &str, _run_id: Uuid, _parent_run_id: Option<Uuid>) {
    }

    fn on_llm_end(&self, _outputs: &Value, _run_id: Uuid) {}

    fn on_llm_error(&self, _error: &str, _run_id: Uuid) {}
}

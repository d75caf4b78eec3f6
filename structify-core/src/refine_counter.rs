use std::sync::atomic::{AtomicUsize, Ordering};

use uuid::Uuid;

use crate::TraceHandler;

/// Counts model invocations and nothing else.
///
/// The refine loop always attaches one of these so the recap can report how
/// many calls a job took even when full tracing is off.
#[derive(Debug, Default)]
pub struct RefineCallCounter {
    llm_calls: AtomicUsize,
}

impl RefineCallCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> usize {
        self.llm_calls.load(Ordering::Relaxed)
    }
}

impl TraceHandler for RefineCallCounter {
    fn on_llm_start(&self, _name: &str, _prompt: &str, _run_id: Uuid, _parent_run_id: Option<Uuid>) {
        self.llm_calls.fetch_add(1, Ordering::Relaxed);
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use structify_core::{Chunk, RefineCallCounter, TraceHandler, Value};
use structify_prompt::PromptTemplate;
use uuid::Uuid;

use crate::{LlmError, LlmGateway};

/// Variable the orchestrator fills with each chunk's text.
pub const CONTEXT_KEY: &str = "context";
/// Variable the orchestrator fills with the running answer.
pub const EXISTING_ANSWER_KEY: &str = "existing_answer";

/// Result of one refine run: the folded answer and how many model calls it
/// took to produce it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RefineOutput {
    pub output: String,
    pub llm_call_count: usize,
}

impl LlmGateway {
    /// Fold a chunk sequence into one answer: the first chunk goes through
    /// `seed_template`, every later chunk through `refine_template` together
    /// with the answer so far. Chunks are processed strictly in order since
    /// each step consumes the previous step's output.
    ///
    /// The first backend failure aborts the loop and propagates; whatever a
    /// caller-retained tracer recorded up to that point stays readable.
    pub async fn generate_refine_output(
        &self,
        seed_template: &PromptTemplate,
        refine_template: &PromptTemplate,
        chunks: &[Chunk],
        values: &HashMap<String, Value>,
        handlers: &[Arc<dyn TraceHandler>],
    ) -> Result<RefineOutput, LlmError> {
        for key in [CONTEXT_KEY, EXISTING_ANSWER_KEY] {
            if values.contains_key(key) {
                return Err(LlmError::ReservedVariable(key.to_string()));
            }
        }
        ensure_declares(seed_template, "seed_template", CONTEXT_KEY)?;
        ensure_declares(refine_template, "refine_template", CONTEXT_KEY)?;
        ensure_declares(refine_template, "refine_template", EXISTING_ANSWER_KEY)?;

        if chunks.is_empty() {
            return Ok(RefineOutput {
                output: String::new(),
                llm_call_count: 0,
            });
        }

        let counter = Arc::new(RefineCallCounter::new());
        let mut all_handlers: Vec<Arc<dyn TraceHandler>> = handlers.to_vec();
        all_handlers.push(counter.clone());

        let chain_run_id = Uuid::new_v4();
        let inputs = json!({ "chunk_count": chunks.len() });
        for handler in handlers {
            handler.on_chain_start("refine_chain", &inputs, chain_run_id);
        }

        let mut answer = String::new();
        for (index, chunk) in chunks.iter().enumerate() {
            let mut step_values = values.clone();
            step_values.insert(CONTEXT_KEY.to_string(), Value::from(chunk.text.as_str()));
            let template = if index == 0 {
                seed_template
            } else {
                step_values.insert(
                    EXISTING_ANSWER_KEY.to_string(),
                    Value::from(answer.as_str()),
                );
                refine_template
            };

            tracing::debug!(chunk = index, total = chunks.len(), "refine step");
            match self
                .complete(template, &step_values, &all_handlers, Some(chain_run_id))
                .await
            {
                Ok(output) => answer = output,
                Err(error) => {
                    let rendered = error.to_string();
                    for handler in handlers {
                        handler.on_chain_error(&rendered, chain_run_id);
                    }
                    return Err(error);
                }
            }
        }

        let outputs = json!({ "output": answer });
        for handler in handlers {
            handler.on_chain_end(&outputs, chain_run_id);
        }

        Ok(RefineOutput {
            output: answer,
            llm_call_count: counter.count(),
        })
    }
}

fn ensure_declares(
    template: &PromptTemplate,
    template_name: &str,
    variable: &str,
) -> Result<(), LlmError> {
    if template.declares(variable) {
        Ok(())
    } else {
        Err(LlmError::MissingPromptVariable {
            template: template_name.to_string(),
            variable: variable.to_string(),
        })
    }
}

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::json;
use structify_core::{TraceHandler, Value};
use structify_prompt::PromptTemplate;
use uuid::Uuid;

use crate::{CompletionModel, LlmError, ModelReference, ModelResolver, TransportFault};

/// The only component that talks to a model backend.
///
/// One `complete` call is exactly one backend invocation, bracketed by one
/// start/end (or start/error) event pair on every attached handler. The
/// gateway keeps no state between calls, so independent requests can share
/// nothing and still run concurrently.
pub struct LlmGateway {
    model: Arc<dyn CompletionModel>,
}

impl LlmGateway {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    pub fn resolve(
        resolver: &dyn ModelResolver,
        reference: &ModelReference,
    ) -> Result<Self, LlmError> {
        Ok(Self::new(resolver.resolve(reference)?))
    }

    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Render the template and run the prompt through the backend once.
    ///
    /// The render happens before any network I/O, so a template/variable
    /// mismatch never costs a model call.
    pub async fn complete(
        &self,
        template: &PromptTemplate,
        values: &HashMap<String, Value>,
        handlers: &[Arc<dyn TraceHandler>],
        parent_run_id: Option<Uuid>,
    ) -> Result<String, LlmError> {
        let prompt = template.format(values)?;

        let run_id = Uuid::new_v4();
        for handler in handlers {
            handler.on_llm_start(self.model.name(), &prompt, run_id, parent_run_id);
        }

        match self.model.complete(&prompt).await {
            Ok(completion) => {
                let outputs = json!({ "content": completion.content });
                for handler in handlers {
                    handler.on_llm_end(&outputs, run_id);
                }
                Ok(completion.content)
            }
            Err(fault) => {
                let error = classify_fault(self.model.name(), fault);
                tracing::warn!(model = self.model.name(), error = %error, "model call failed");
                let rendered = error.to_string();
                for handler in handlers {
                    handler.on_llm_error(&rendered, run_id);
                }
                Err(error)
            }
        }
    }

    /// One prompt, one model call, wrapped in a chain record.
    pub async fn generate_output(
        &self,
        template: &PromptTemplate,
        values: &HashMap<String, Value>,
        handlers: &[Arc<dyn TraceHandler>],
    ) -> Result<String, LlmError> {
        let chain_run_id = Uuid::new_v4();
        let inputs = Value::Object(values.clone().into_iter().collect());
        for handler in handlers {
            handler.on_chain_start("llm_chain", &inputs, chain_run_id);
        }

        match self
            .complete(template, values, handlers, Some(chain_run_id))
            .await
        {
            Ok(output) => {
                let outputs = json!({ "output": output });
                for handler in handlers {
                    handler.on_chain_end(&outputs, chain_run_id);
                }
                Ok(output)
            }
            Err(error) => {
                let rendered = error.to_string();
                for handler in handlers {
                    handler.on_chain_error(&rendered, chain_run_id);
                }
                Err(error)
            }
        }
    }
}

fn classify_fault(model: &str, fault: TransportFault) -> LlmError {
    match fault.status {
        Some(401) => LlmError::CredentialInvalid(model.to_string()),
        Some(400) => LlmError::BadRequestToModel(model.to_string()),
        status => LlmError::Transport {
            status,
            message: fault.message,
        },
    }
}

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;
use structify_core::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("missing value for input variable '{0}'")]
    MissingValue(String),
    #[error("template references '{0}' which is not a declared input variable")]
    UndeclaredVariable(String),
}

fn placeholder_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\{\{\s*(\w+)\s*\}\}").expect("placeholder pattern is valid"))
}

/// A text template with `{{ variable }}` placeholders and an explicit list of
/// the variables it expects. Formatting fails if a declared variable has no
/// value or the template references one it never declared, so mismatches are
/// caught before a prompt ever leaves the process.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
    input_variables: Vec<String>,
}

impl PromptTemplate {
    pub fn new(template: impl Into<String>, input_variables: &[&str]) -> Self {
        Self {
            template: template.into(),
            input_variables: input_variables.iter().map(|name| name.to_string()).collect(),
        }
    }

    pub fn input_variables(&self) -> &[String] {
        &self.input_variables
    }

    pub fn declares(&self, variable: &str) -> bool {
        self.input_variables.iter().any(|name| name == variable)
    }

    pub fn format(&self, vars: &HashMap<String, Value>) -> Result<String, TemplateError> {
        for name in &self.input_variables {
            if !vars.contains_key(name) {
                return Err(TemplateError::MissingValue(name.clone()));
            }
        }

        let mut undeclared = None;
        let rendered = placeholder_pattern().replace_all(&self.template, |caps: &regex::Captures| {
            let key = &caps[1];
            match vars.get(key) {
                Some(value) if self.declares(key) => value
                    .as_str()
                    .map(|text| text.to_string())
                    .unwrap_or_else(|| value.to_string()),
                _ => {
                    undeclared.get_or_insert_with(|| key.to_string());
                    String::new()
                }
            }
        });

        match undeclared {
            Some(variable) => Err(TemplateError::UndeclaredVariable(variable)),
            None => Ok(rendered.to_string()),
        }
    }
}

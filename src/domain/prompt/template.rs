//! Prompt template rendering
//!
//! Langfuse prompt templates use mustache-style placeholders: `{{variable}}`.
//! Every placeholder must be satisfied by the provided variable map; there
//! are no defaults.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

static VARIABLE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{\s*([a-zA-Z0-9_][a-zA-Z0-9_.-]*)\s*\}\}").unwrap());

/// Template processing errors
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Missing required variable: {name}")]
    MissingVariable { name: String },
}

/// A parsed prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    content: String,
    variables: Vec<String>,
}

impl PromptTemplate {
    /// Parse a template string and extract its placeholder names
    pub fn parse(content: impl Into<String>) -> Self {
        let content = content.into();
        let mut variables = Vec::new();

        for cap in VARIABLE_PATTERN.captures_iter(&content) {
            let name = cap.get(1).unwrap().as_str().to_string();
            if !variables.contains(&name) {
                variables.push(name);
            }
        }

        Self { content, variables }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn has_variables(&self) -> bool {
        !self.variables.is_empty()
    }

    /// Render the template, substituting every placeholder
    pub fn render(&self, values: &HashMap<String, String>) -> Result<String, TemplateError> {
        let mut missing = None;

        let result = VARIABLE_PATTERN.replace_all(&self.content, |caps: &regex::Captures<'_>| {
            let name = caps.get(1).unwrap().as_str();
            match values.get(name) {
                Some(value) => value.clone(),
                None => {
                    missing.get_or_insert_with(|| name.to_string());
                    String::new()
                }
            }
        });

        match missing {
            Some(name) => Err(TemplateError::MissingVariable { name }),
            None => Ok(result.into_owned()),
        }
    }
}

/// Convenience function to render a template string directly
pub fn render_template(
    template: &str,
    values: &HashMap<String, String>,
) -> Result<String, TemplateError> {
    PromptTemplate::parse(template).render(values)
}

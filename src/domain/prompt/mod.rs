//! Prompt template rendering

mod template;

pub use template::{render_template, PromptTemplate, TemplateError};

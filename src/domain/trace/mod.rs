//! Trace records and the tracing-backend port

mod record;
mod tracer;

pub use record::{
    ChatPromptMessage, GenerationRecord, Observation, PromptPayload, SessionSummary, SessionTrace,
    StoredPrompt, TraceDetail, TraceHandle, TraceOptions,
};
pub use tracer::Tracer;

#[cfg(test)]
pub use tracer::mock;

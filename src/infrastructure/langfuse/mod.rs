//! Langfuse tracing backend adapter

mod client;
pub mod ingestion;

pub use client::LangfuseTracer;

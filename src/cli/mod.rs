//! CLI for the Langfuse chat gateway

pub mod serve;

use clap::{Parser, Subcommand};

/// Example API server wiring OpenAI chat completions into Langfuse tracing
#[derive(Parser)]
#[command(name = "langfuse-chat-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the API server
    Serve,
}

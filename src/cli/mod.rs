//! Command-line interface for the agent-workshop binary
//!
//! Everything else is read from the environment (see [`workshop::Config`]);
//! flags given here win over `HOST` and `PORT`.

use clap::Parser;

/// Agent Workshop - LLM agents behind an HTTP API
#[derive(Parser, Debug)]
#[command(
    name = "agent-workshop",
    version,
    about = "Agent Workshop - LLM agents behind an HTTP API",
    long_about = "Serves tool-calling agents, deterministic pipelines and handoff routing\n\
                  over HTTP. Requires OPENAI_API_KEY and API_KEY in the environment or .env.",
    after_help = "EXAMPLES:\n    \
                  agent-workshop                       # Listen on HOST:PORT (default 127.0.0.1:8000)\n    \
                  agent-workshop --port 9000           # Override the port\n    \
                  RUST_LOG=debug agent-workshop --log-json"
)]
pub struct Cli {
    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,

    /// Log at debug level when RUST_LOG is unset
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Filter used when RUST_LOG is not set
    pub fn default_filter(&self) -> &'static str {
        if self.verbose {
            "agent_workshop=debug,workshop=debug,tower_http=debug,info"
        } else {
            "info"
        }
    }
}

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "clipper", version, about = "Turn chat messages into Markdown notes")]
pub struct Cli {
    /// RON settings file.
    #[arg(long, short, global = true, env = "CLIPPER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log debug output.
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Also write logs to ./clipper.log.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve one message and print the assembled document.
    Resolve {
        /// Plain text, a web URL or a GitHub repository URL.
        input: String,

        /// Message id written to the front-matter.
        #[arg(long, default_value = "cli")]
        message_id: String,

        /// Message timestamp (epoch milliseconds or RFC 3339); defaults to now.
        #[arg(long)]
        timestamp: Option<String>,

        /// Print the resolved record as JSON instead of a document.
        #[arg(long)]
        json: bool,
    },
    /// Fetch pending messages and store a document for each new one.
    Sync {
        /// Message endpoint; overrides the settings file.
        #[arg(long, env = "CLIPPER_ENDPOINT")]
        endpoint: Option<String>,

        /// Document directory; overrides the settings file.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

//! CLI argument parsing types using `clap`.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

/// `OpenWatt` command-line interface for remote devices
#[derive(Parser)]
#[command(name = "openwatt")]
#[command(author, version, about = "OpenWatt command-line interface")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration directory
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Increase output verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// List all endpoints
    #[command(about = "List all registered endpoints")]
    List {
        /// Output format for the endpoint list
        #[arg(short, long, default_value = "table", value_enum)]
        format: OutputFormat,
    },

    /// Register a new endpoint
    #[command(about = "Register a new endpoint and make it current")]
    Add {
        /// Name for the new endpoint
        #[arg(short, long)]
        name: String,

        /// Host address (hostname or IP)
        #[arg(short = 'H', long)]
        host: String,

        /// Port number
        #[arg(short, long, default_value_t = openwatt_core::models::DEFAULT_PORT)]
        port: u16,

        /// Use HTTPS instead of plain HTTP
        #[arg(long)]
        https: bool,

        /// Probe the endpoint before registering it
        #[arg(long)]
        test: bool,
    },

    /// Update an existing endpoint
    #[command(about = "Change an endpoint's name, address or scheme")]
    Update {
        /// Endpoint name or UUID
        name: String,

        /// New name
        #[arg(long)]
        new_name: Option<String>,

        /// New host address
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// New port number
        #[arg(short, long)]
        port: Option<u16>,

        /// Switch to HTTPS
        #[arg(long, conflicts_with = "http")]
        https: bool,

        /// Switch to plain HTTP
        #[arg(long)]
        http: bool,
    },

    /// Delete an endpoint
    #[command(about = "Delete an endpoint from the configuration")]
    Delete {
        /// Endpoint name or UUID
        name: String,
    },

    /// Show endpoint details
    #[command(about = "Show details of an endpoint")]
    Show {
        /// Endpoint name or UUID
        name: String,
    },

    /// Select the current endpoint
    #[command(about = "Make an endpoint the current one")]
    Use {
        /// Endpoint name or UUID
        name: String,
    },

    /// Test endpoint reachability
    #[command(about = "Probe an endpoint's health check")]
    Test {
        /// Endpoint name or UUID (defaults to the current endpoint)
        name: Option<String>,

        /// Timeout in seconds for each request phase
        #[arg(short, long)]
        timeout: Option<u64>,
    },

    /// Run one command on an endpoint
    #[command(about = "Execute a single command on an endpoint")]
    Exec {
        /// Endpoint name or UUID (defaults to the current endpoint)
        name: Option<String>,

        /// Command line to send, after `--`
        #[arg(last = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Interactive console
    #[command(about = "Open an interactive command console")]
    Console {
        /// Endpoint name or UUID (defaults to the current endpoint)
        name: Option<String>,
    },

    /// Watch endpoint status
    #[command(about = "Poll an endpoint and print status changes")]
    Monitor {
        /// Endpoint name or UUID (defaults to the current endpoint)
        name: Option<String>,

        /// Poll interval in seconds (overrides the configuration)
        #[arg(short, long)]
        interval: Option<u64>,

        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<u32>,
    },

    /// Generate shell completions
    #[command(about = "Generate shell completion scripts")]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Output format options
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum OutputFormat {
    /// Display as formatted table
    #[default]
    Table,
    /// Output as JSON
    Json,
}

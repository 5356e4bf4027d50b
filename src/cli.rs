use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "solrsync")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "Declarative Solr config and schema management", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Operator config file (default: ~/.config/solrsync/config.toml)
    #[arg(short, long, global = true, env = "SOLRSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract the declarative form of a live solrconfig.xml
    Generate {
        /// Path to solrconfig.xml
        file: PathBuf,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Toml)]
        format: OutputFormat,
    },

    /// Show the commands apply would submit
    Diff(TargetArgs),

    /// Converge cores to the declared config and schema
    Apply(ApplyArgs),

    /// Core admin actions
    #[command(subcommand)]
    Cores(CoresCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser)]
pub struct TargetArgs {
    /// Only this core (default: every declared core)
    #[arg(long)]
    pub core: Option<String>,
}

#[derive(Parser)]
pub struct ApplyArgs {
    /// Only this core (default: every declared core)
    #[arg(long)]
    pub core: Option<String>,

    /// Show what would be submitted without submitting
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand)]
pub enum CoresCommand {
    /// Show core status
    Status {
        /// Core name (default: all cores)
        core: Option<String>,
    },

    /// Reload a core so submitted changes take effect
    Reload {
        /// Core name
        core: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Toml,
    Json,
}

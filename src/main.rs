mod cli;
mod commands;
mod config;
mod transport;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command, CoresCommand};
use std::io;
use std::path::PathBuf;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
    pub config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let log_level = match cli.verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(if cli.quiet {
            log::LevelFilter::Error
        } else {
            log_level
        })
        .format_timestamp(None)
        .init();

    let ctx = Context {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
    };

    match cli.command {
        Command::Generate { file, format } => commands::generate::run(&ctx, &file, format),
        Command::Diff(args) => commands::reconcile::diff(&ctx, args.core.as_deref()),
        Command::Apply(args) => {
            commands::reconcile::apply(&ctx, args.core.as_deref(), args.dry_run)
        }
        Command::Cores(cmd) => match cmd {
            CoresCommand::Status { core } => commands::cores::status(&ctx, core.as_deref()),
            CoresCommand::Reload { core } => commands::cores::reload(&ctx, &core),
        },
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "solrsync", &mut io::stdout());
            Ok(())
        }
    }
}

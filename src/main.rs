mod cli;
mod commands;
mod config;
mod progress;
mod report;
mod ui;

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use cli::{Cli, Command};
use std::io;
use std::process::ExitCode;

/// Global context for the application
pub struct Context {
    pub verbose: u8,
    pub quiet: bool,
}

fn main() -> ExitCode {
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
    };

    match run(&ctx, cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

fn run(ctx: &Context, cli: Cli) -> Result<()> {
    match cli.command {
        Command::Apply(args) => commands::reconcile::apply(ctx, &cli.device, args),
        Command::Diff(args) => commands::reconcile::diff(ctx, &cli.device, args),
        Command::Get { path } => commands::get::run(&cli.device, &path),
        Command::Completions { shell } => {
            let mut cmd = Cli::command();
            generate(shell, &mut cmd, "srlctl", &mut io::stdout());
            Ok(())
        }
    }
}

/// Print the error chain, plus advice for connection problems
fn report_error(err: &anyhow::Error) {
    ui::error(&format!("{err:#}"));

    let transport = err.chain().find_map(|cause| {
        cause
            .downcast_ref::<jsonrpc::Error>()
            .or_else(|| match cause.downcast_ref::<declarative::Error>() {
                Some(declarative::Error::Transport(inner)) => Some(inner),
                _ => None,
            })
    });
    if let Some(transport) = transport {
        let category = transport.category();
        ui::dim(&format!("{}: {}", category.description(), category.advice()));
    }
}

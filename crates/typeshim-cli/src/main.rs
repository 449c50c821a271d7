mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Command};
use commands::CommandError;
use commands::check::CheckArgs;
use commands::generate::GenerateArgs;
use commands::plans::PlansArgs;

fn main() -> ExitCode {
    init_logging();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr, filtered by `TYPESHIM_LOG` (default: warnings only).
fn init_logging() {
    let filter = EnvFilter::try_from_env("TYPESHIM_LOG")
        .unwrap_or_else(|_| EnvFilter::new("typeshim=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<(), CommandError> {
    match cli.command {
        Command::Generate {
            input,
            out_dir,
            module_format,
            output,
        } => {
            commands::generate::run(GenerateArgs {
                input: input.path,
                out_dir,
                module_format: module_format.map(Into::into),
                color: output.color.should_colorize(),
            })?;
        }
        Command::Check { input, output } => {
            commands::check::run(CheckArgs {
                input: input.path,
                color: output.color.should_colorize(),
            })?;
        }
        Command::Plans {
            input,
            module,
            output,
        } => {
            commands::plans::run(PlansArgs {
                input: input.path,
                module,
                color: output.color.should_colorize(),
            })?;
        }
    }
    Ok(())
}

pub mod check;
pub mod generate;
pub mod plans;

mod input;

#[cfg(test)]
mod commands_tests;

use std::path::PathBuf;

use typeshim_compiler::{Generator, GenerationOutput};

pub use input::load_input;

/// Failure of a command. Diagnostics are printed before this is returned.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    Input(#[from] typeshim_compiler::Error),

    #[error("generation failed for {} of {total} modules", failed.len())]
    Failed { failed: Vec<String>, total: usize },

    #[error("no module named `{0}`")]
    UnknownModule(String),
}

/// Run the generator over `path` and print its diagnostics to stderr.
fn generate_from(
    path: &std::path::Path,
    configure: impl FnOnce(&Generator) -> Option<typeshim_compiler::Config>,
    color: bool,
) -> Result<GenerationOutput, CommandError> {
    let json = load_input(path)?;
    let mut generator = Generator::from_json(&json)?;
    if let Some(config) = configure(&generator) {
        generator = generator.with_config(config);
    }

    let output = generator.generate();
    if !output.diagnostics.is_empty() {
        eprint!("{}", output.diagnostics.render_colored(color));
    }
    Ok(output)
}

fn ensure_success(output: &GenerationOutput) -> Result<(), CommandError> {
    if output.is_success() {
        return Ok(());
    }
    Err(CommandError::Failed {
        failed: output.failed.iter().cloned().collect(),
        total: output.modules.len() + output.failed.len(),
    })
}

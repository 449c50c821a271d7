use std::fs;
use std::path::{Path, PathBuf};

use typeshim_compiler::ModuleFormat;

use super::{CommandError, ensure_success, generate_from};

pub struct GenerateArgs {
    pub input: PathBuf,
    pub out_dir: PathBuf,
    pub module_format: Option<ModuleFormat>,
    pub color: bool,
}

/// Write the artifacts of every module that generated. Modules that failed
/// are reported and make the command fail, but do not stop the others.
pub fn run(args: GenerateArgs) -> Result<Vec<PathBuf>, CommandError> {
    let output = generate_from(
        &args.input,
        |generator| {
            args.module_format
                .map(|format| generator.config().clone().module_format(format))
        },
        args.color,
    )?;

    fs::create_dir_all(&args.out_dir).map_err(|source| CommandError::Write {
        path: args.out_dir.clone(),
        source,
    })?;

    let mut written = Vec::new();
    for module in output.modules.values() {
        for (file, contents) in [
            (module.declarations_file(), &module.declarations),
            (module.shim_file(), &module.shim),
        ] {
            let path = args.out_dir.join(file);
            write(&path, contents)?;
            written.push(path);
        }
        tracing::info!(module = %module.name, "wrote bindings");
    }

    ensure_success(&output)?;
    Ok(written)
}

fn write(path: &Path, contents: &str) -> Result<(), CommandError> {
    fs::write(path, contents).map_err(|source| CommandError::Write {
        path: path.to_path_buf(),
        source,
    })
}

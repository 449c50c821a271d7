use std::path::PathBuf;

use typeshim_compiler::GenerationOutput;

use super::{CommandError, ensure_success, generate_from};

pub struct PlansArgs {
    pub input: PathBuf,
    pub module: Option<String>,
    pub color: bool,
}

/// Print the dumps of the modules that generated, then fail if any did not.
pub fn run(args: PlansArgs) -> Result<(), CommandError> {
    let output = generate_from(&args.input, |_| None, args.color)?;
    print!("{}", render(&output, args.module.as_deref())?);
    ensure_success(&output)
}

/// One `# Module` section per generated module, or the bare dump of `only`.
pub fn render(output: &GenerationOutput, only: Option<&str>) -> Result<String, CommandError> {
    if let Some(name) = only {
        return output
            .module(name)
            .map(|module| module.plans.clone())
            .ok_or_else(|| CommandError::UnknownModule(name.to_string()));
    }

    let sections: Vec<String> = output
        .modules
        .values()
        .map(|module| format!("# {}\n{}", module.name, module.plans))
        .collect();
    Ok(sections.join("\n"))
}

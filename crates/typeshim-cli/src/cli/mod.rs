use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use typeshim_compiler::ModuleFormat;


#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ModuleFormatChoice {
    Es6,
    #[value(name = "commonjs")]
    CommonJs,
}

impl From<ModuleFormatChoice> for ModuleFormat {
    fn from(choice: ModuleFormatChoice) -> Self {
        match choice {
            ModuleFormatChoice::Es6 => ModuleFormat::Es6,
            ModuleFormatChoice::CommonJs => ModuleFormat::CommonJs,
        }
    }
}

/// Color output mode for diagnostics.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn should_colorize(self) -> bool {
        match self {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => std::io::IsTerminal::is_terminal(&std::io::stderr()),
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "typeshim", bin_name = "typeshim")]
#[command(about = "Typed host bindings and conversion shims from origin type signatures")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Write `<Module>.gen.d.ts` and `<Module>.gen.js` for every module
    #[command(after_help = r#"EXAMPLES:
  typeshim generate types.json -o src/bindings
  typeshim generate - --module-format commonjs < types.json"#)]
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Output directory
        #[arg(short = 'o', long = "out-dir", value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Module system of the emitted shims (overrides the document config)
        #[arg(long, value_name = "FORMAT")]
        module_format: Option<ModuleFormatChoice>,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Validate a document and report diagnostics without writing files
    Check {
        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        output: OutputArgs,
    },

    /// Print the conversion plans of every module
    Plans {
        #[command(flatten)]
        input: InputArgs,

        /// Only this module
        #[arg(long, value_name = "NAME")]
        module: Option<String>,

        #[command(flatten)]
        output: OutputArgs,
    },
}

#[derive(Args, Debug)]
pub struct InputArgs {
    /// Type-signature document (use "-" for stdin)
    #[arg(value_name = "INPUT")]
    pub path: PathBuf,
}

#[derive(Args, Debug)]
pub struct OutputArgs {
    /// Colorize diagnostics (auto-detected by default)
    #[arg(long, default_value = "auto", value_name = "WHEN")]
    pub color: ColorChoice,
}

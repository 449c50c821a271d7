use std::path::PathBuf;

use super::{CommandError, ensure_success, generate_from};

pub struct CheckArgs {
    pub input: PathBuf,
    pub color: bool,
}

/// Silent on success, like `cargo check`.
pub fn run(args: CheckArgs) -> Result<(), CommandError> {
    let output = generate_from(&args.input, |_| None, args.color)?;
    ensure_success(&output)
}

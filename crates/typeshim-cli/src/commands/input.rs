use std::fs;
use std::io::{self, Read};
use std::path::Path;

use super::CommandError;

/// Read the input document. `-` reads stdin.
pub fn load_input(path: &Path) -> Result<String, CommandError> {
    let read_error = |source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    };

    if path.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf).map_err(read_error)?;
        return Ok(buf);
    }
    fs::read_to_string(path).map_err(read_error)
}

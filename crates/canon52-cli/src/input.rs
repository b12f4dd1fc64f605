//! Reading single inputs from a file or stdin.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure to obtain the raw input.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("failed to read file {}: {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("failed to read stdin: {0}")]
    Stdin(#[source] io::Error),
}

/// Reads `path` as UTF-8, or all of stdin when no path is given.
pub fn read_input(path: Option<&Path>) -> Result<String, InputError> {
    match path {
        Some(path) => std::fs::read_to_string(path).map_err(|source| InputError::File {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(InputError::Stdin)?;
            Ok(buffer)
        }
    }
}

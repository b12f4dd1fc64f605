//! Canonicalize command implementation.

use std::path::PathBuf;

use canon52_canonical::CanonKind;

use super::CommandResult;
use crate::input::read_input;

pub fn run(kind: CanonKind, input: Option<PathBuf>) -> CommandResult {
    let raw = read_input(input.as_deref())?;
    let bytes = kind
        .canonicalize(&raw)
        .map_err(|e| format!("Canonicalization failed: {} ({})", e.code(), e))?;

    println!("{}", String::from_utf8_lossy(&bytes));
    Ok(true)
}

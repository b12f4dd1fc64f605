//! Hash command implementation.

use std::path::PathBuf;

use canon52_canonical::{canon_then_hash, CanonKind};

use super::CommandResult;
use crate::input::read_input;

pub fn run(kind: CanonKind, input: Option<PathBuf>) -> CommandResult {
    let raw = read_input(input.as_deref())?;
    let digest = canon_then_hash(kind.as_str(), &raw)
        .map_err(|e| format!("Canonicalization failed: {} ({})", e.code(), e))?;

    println!("{}", digest);
    Ok(true)
}

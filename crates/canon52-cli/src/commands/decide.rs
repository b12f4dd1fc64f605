//! Decide command implementation.

use std::path::PathBuf;

use canon52_core::{adjudicate, AdjudicationRequest};
use serde_json::json;

use super::CommandResult;
use crate::input::read_input;
use crate::output::format_json;

pub fn run(input: Option<PathBuf>) -> CommandResult {
    let raw = read_input(input.as_deref())?;
    let request = AdjudicationRequest::from_json_str(&raw)?;
    let record = adjudicate(&request)?;
    let digest = record.digest()?;

    let out = json!({
        "record": serde_json::to_value(&record)?,
        "digest": digest.as_hex(),
    });
    println!("{}", format_json(&out));
    Ok(true)
}

//! Output formatting utilities.

use canon52_vectors::ReplaySummary;
use serde_json::Value;

/// Pretty JSON for terminal output.
pub fn format_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Prints one `[FAIL]` line per failed vector, then the summary line.
pub fn print_summary(summary: &ReplaySummary) {
    for failure in &summary.failures {
        println!("{}", failure);
    }
    println!("{}", summary);
}

//! Subcommand implementations. Each returns `Ok(false)` when the check ran
//! but did not pass.

pub mod anchors;
pub mod canonicalize;
pub mod decide;
pub mod dump;
pub mod hash;
pub mod replay;

/// Result type shared by every subcommand.
pub type CommandResult = Result<bool, Box<dyn std::error::Error>>;

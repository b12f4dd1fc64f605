use thiserror::Error;

use crate::decision::Justification;

/// Adjudication error types.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdjudicationError {
    /// A SupportPack was about to be issued without a reason code for a
    /// non-committing justification. Indicates a policy-table bug.
    #[error("bypass detected: missing reason code for {d_t}")]
    BypassDetected {
        /// Justification that lacked a reason.
        d_t: Justification,
    },
    /// The request mapping could not be decoded.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl AdjudicationError {
    /// Stable error code.
    pub fn code(&self) -> &'static str {
        match self {
            AdjudicationError::BypassDetected { .. } => "BYPASS_DETECTED",
            AdjudicationError::InvalidRequest(_) => "INVALID_REQUEST",
        }
    }

    /// True for internal-consistency failures that must abort a replay.
    pub fn is_fatal(&self) -> bool {
        matches!(self, AdjudicationError::BypassDetected { .. })
    }
}

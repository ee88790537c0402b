//! Per-line error type for the CLI session.
//!
//! Startup failures go through `anyhow` in `main`; once the session is
//! running, each input line either succeeds or produces a [`LineError`]
//! that is reported on stdout and the session continues.

use respira_calculator::CalculatorError;
use respira_engagement::EngagementError;

/// Why one input line failed.
#[derive(Debug, thiserror::Error)]
pub enum LineError {
    /// The line is not valid JSON or names no known op.
    #[error("malformed input line: {0}")]
    BadLine(#[from] serde_json::Error),

    /// The store rejected the intent.
    #[error(transparent)]
    Engagement(#[from] EngagementError),

    /// The calculation or its recording failed.
    #[error(transparent)]
    Calculator(#[from] CalculatorError),

    /// A day count too large to subtract from the current time.
    #[error("window of {days} days is out of range")]
    WindowOutOfRange {
        /// Requested window length.
        days: u32,
    },
}

impl LineError {
    /// Machine-readable code for the output record.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::BadLine(_) => "bad_line",
            Self::Engagement(e) => e.code(),
            Self::Calculator(e) => e.code(),
            Self::WindowOutOfRange { .. } => "invalid_input",
        }
    }
}

//! Error types for the calculation client.

use respira_engagement::EngagementError;
use respira_types::EmissionCategory;

/// Errors that can occur while calculating or recording an activity.
#[derive(Debug, thiserror::Error)]
pub enum CalculatorError {
    /// The request never produced a response (connect, timeout, TLS).
    #[error("calculation request failed: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("calculation service returned {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, usually a `detail` message.
        body: String,
    },

    /// The response body was not a valid calculation response.
    #[error("calculation response parse failed: {0}")]
    Parse(String),

    /// The response named a category outside the known set.
    #[error("calculation response has unknown category: {0}")]
    UnknownCategory(String),

    /// The response category disagrees with the request.
    #[error("asked for {expected} emissions but service answered {actual}")]
    CategoryMismatch {
        /// Category of the submitted activity.
        expected: EmissionCategory,
        /// Category in the response.
        actual: EmissionCategory,
    },

    /// The store rejected the calculated value.
    #[error(transparent)]
    Engagement(#[from] EngagementError),
}

impl CalculatorError {
    /// Stable machine-readable code. Store rejections keep the store's code.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Http(_) => "calculator_unreachable",
            Self::Status { .. } => "calculator_rejected",
            Self::Parse(_) => "calculator_bad_response",
            Self::UnknownCategory(_) => "calculator_unknown_category",
            Self::CategoryMismatch { .. } => "calculator_category_mismatch",
            Self::Engagement(e) => e.code(),
        }
    }
}

impl From<reqwest::Error> for CalculatorError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

//! Point and emission ledgers for the Respira+ engagement core.
//!
//! Every XP movement and every emission addition is tracked through this
//! crate. The point balance is never modified directly: each change is an
//! append-only [`PointEntry`](respira_types::PointEntry) carrying the balance
//! it produced, so the whole history can be replayed and audited.
//!
//! # Architecture
//!
//! - [`points`] -- The [`PointLedger`]: append-only XP journal with a cached balance.
//! - [`transaction`] -- The [`EntryBuilder`] for validated entry construction.
//! - [`solvency`] -- Replay audit: the balance never dips below zero.
//! - [`emissions`] -- The [`EmissionLedger`]: per-category kg CO2e accumulators.
//!
//! # Solvency Law
//!
//! For every prefix of the point journal:
//!
//! ```text
//! sum(credits) - sum(debits) >= 0
//! ```
//!
//! and the final replayed balance equals the cached balance. A violation
//! produces a [`LedgerAnomaly`]. The ledger never panics; it returns errors.
//!
//! # Usage
//!
//! ```
//! use respira_ledger::{PointLedger, SolvencyResult};
//! use rust_decimal::Decimal;
//!
//! let mut ledger = PointLedger::with_opening_balance(Decimal::new(1250, 0)).ok();
//! if let Some(ledger) = ledger.as_mut() {
//!     let _ = ledger.record_purchase(Decimal::new(200, 0), "glasses");
//!     assert_eq!(ledger.balance(), Decimal::new(1050, 0));
//!     assert_eq!(ledger.verify_solvency(), SolvencyResult::Solvent);
//! }
//! ```

pub mod emissions;
pub mod points;
pub mod solvency;
pub mod transaction;

// Re-export primary types at crate root.
pub use emissions::{EmissionLedger, quantity_from_f64};
pub use points::PointLedger;
pub use solvency::SolvencyResult;
pub use transaction::EntryBuilder;

use rust_decimal::Decimal;

use respira_types::PointEntryType;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when recording ledger entries.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Quantity must be strictly positive.
    #[error("ledger entry quantity must be non-zero")]
    ZeroQuantity,

    /// Quantity must not be negative.
    #[error("ledger quantity must be positive, got {quantity}")]
    NegativeQuantity {
        /// The invalid quantity.
        quantity: Decimal,
    },

    /// A floating point input was NaN or infinite.
    #[error("ledger quantity must be finite, got {value}")]
    NonFinite {
        /// The rejected input.
        value: f64,
    },

    /// A required field was not set on the builder.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The entry type does not move points in the requested direction.
    #[error("{entry_type:?} entries cannot be recorded as a {direction}")]
    InvalidDirection {
        /// The entry type being recorded.
        entry_type: PointEntryType,
        /// The direction that was requested (`"credit"` or `"debit"`).
        direction: &'static str,
    },

    /// A debit larger than the current balance.
    #[error("insufficient balance: wanted {requested} but only {available} available")]
    InsufficientBalance {
        /// The debit amount.
        requested: Decimal,
        /// The balance at the time of the debit.
        available: Decimal,
    },

    /// An accumulator exceeded the representable range.
    #[error("arithmetic overflow: {0}")]
    Overflow(&'static str),

    /// An internal error that should not occur in normal operation.
    #[error("internal ledger error: {0}")]
    InternalError(&'static str),
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A solvency violation detected while replaying the point journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerAnomaly {
    /// Index of the first offending entry, or `None` when the journal is
    /// internally consistent but disagrees with the cached balance.
    pub entry_index: Option<usize>,
    /// Balance reached by the replay at the point of detection.
    pub replayed_balance: Decimal,
    /// The ledger's cached balance.
    pub cached_balance: Decimal,
    /// Human-readable description of the anomaly.
    pub message: String,
}

impl core::fmt::Display for LedgerAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}

//! Error types for the engagement store.
//!
//! Every failure is a local precondition violation returned to the
//! immediate caller. None of them leave partial state behind and none are
//! retryable by the store itself; the UI layer turns them into messages.

use rust_decimal::Decimal;

use respira_ledger::LedgerError;
use respira_types::{ItemId, MissionId};

/// Errors returned by engagement store operations.
#[derive(Debug, thiserror::Error)]
pub enum EngagementError {
    /// Malformed numeric input (negative, non-finite, out of range) or an
    /// argument that contradicts the catalog.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// What was wrong with the input.
        reason: String,
    },

    /// A purchase was attempted without enough XP.
    #[error("insufficient funds for {item}: price {price}, balance {balance}")]
    InsufficientFunds {
        /// The item the user tried to buy.
        item: ItemId,
        /// Catalog price.
        price: Decimal,
        /// Balance at the time of the attempt.
        balance: Decimal,
    },

    /// A mission was accepted while another one is active.
    #[error("mission {active} is already active (requested {requested})")]
    MissionAlreadyActive {
        /// The mission currently occupying the slot.
        active: MissionId,
        /// The mission the caller tried to accept.
        requested: MissionId,
    },

    /// An equip was attempted on an item the user does not own.
    #[error("item {item} is not owned")]
    NotOwned {
        /// The item the caller tried to equip.
        item: ItemId,
    },

    /// The item key does not exist in the item catalog.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),

    /// The mission key does not exist in the mission catalog.
    #[error("unknown mission: {0}")]
    UnknownMission(MissionId),

    /// A mission transition was requested with no active mission.
    #[error("no active mission")]
    NoActiveMission,

    /// A thread panicked while holding the store lock; the state can no
    /// longer be trusted.
    #[error("engagement store unavailable: {0}")]
    Unavailable(&'static str),

    /// The underlying ledger rejected an entry after validation passed.
    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl EngagementError {
    /// Shorthand for [`EngagementError::InvalidInput`].
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Whether retrying the same call could succeed without another
    /// operation happening first. Store failures are never retryable.
    pub const fn is_retryable(&self) -> bool {
        false
    }

    /// Stable machine-readable code for UI translation tables.
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::InsufficientFunds { .. } => "insufficient_funds",
            Self::MissionAlreadyActive { .. } => "mission_already_active",
            Self::NotOwned { .. } => "not_owned",
            Self::UnknownItem(_) => "unknown_item",
            Self::UnknownMission(_) => "unknown_mission",
            Self::NoActiveMission => "no_active_mission",
            Self::Unavailable(_) => "unavailable",
            Self::Ledger(_) => "ledger",
        }
    }
}

//! Solvency verification for the point ledger.
//!
//! The solvency law: replaying the journal from zero, applying each entry
//! in order, must never produce a negative balance; each entry's recorded
//! `balance_after` must equal the replayed value; and the final replayed
//! balance must equal the ledger's cached balance.
//!
//! Entries are validated on the way in, so a well-formed ledger passes by
//! construction. The replay catches a cached balance that drifted from its
//! journal.

use rust_decimal::Decimal;

use respira_types::PointEntry;

use crate::transaction::{apply, validate_amount};
use crate::{LedgerAnomaly, LedgerError};

/// The result of a solvency audit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolvencyResult {
    /// The journal replays cleanly and matches the cached balance.
    Solvent,
    /// The journal or the cached balance is inconsistent.
    Anomaly(LedgerAnomaly),
}

impl SolvencyResult {
    /// Returns `true` for [`SolvencyResult::Solvent`].
    pub const fn is_solvent(&self) -> bool {
        matches!(self, Self::Solvent)
    }
}

/// Replay `entries` from a zero balance and compare with `cached_balance`.
pub fn verify_solvency(entries: &[PointEntry], cached_balance: Decimal) -> SolvencyResult {
    let mut replayed = Decimal::ZERO;

    for (index, entry) in entries.iter().enumerate() {
        if let Err(e) = validate_amount(entry.amount) {
            return anomaly(
                Some(index),
                replayed,
                cached_balance,
                format!("SOLVENCY_ANOMALY at entry {index}: {e}"),
            );
        }

        replayed = match apply(entry.entry_type, replayed, entry.amount) {
            Ok(next) => next,
            Err(LedgerError::InsufficientBalance { requested, available }) => {
                return anomaly(
                    Some(index),
                    replayed,
                    cached_balance,
                    format!(
                        "SOLVENCY_ANOMALY at entry {index}: debit of {requested} with only {available} available",
                    ),
                );
            }
            Err(e) => {
                return anomaly(
                    Some(index),
                    replayed,
                    cached_balance,
                    format!("SOLVENCY_ANOMALY at entry {index}: {e}"),
                );
            }
        };

        if replayed != entry.balance_after {
            return anomaly(
                Some(index),
                replayed,
                cached_balance,
                format!(
                    "SOLVENCY_ANOMALY at entry {index}: recorded balance {} but replay gives {replayed}",
                    entry.balance_after,
                ),
            );
        }
    }

    if replayed == cached_balance {
        SolvencyResult::Solvent
    } else {
        anomaly(
            None,
            replayed,
            cached_balance,
            format!("SOLVENCY_ANOMALY: cached balance {cached_balance} but journal replays to {replayed}"),
        )
    }
}

fn anomaly(
    entry_index: Option<usize>,
    replayed_balance: Decimal,
    cached_balance: Decimal,
    message: String,
) -> SolvencyResult {
    tracing::error!(?entry_index, %replayed_balance, %cached_balance, "{message}");
    SolvencyResult::Anomaly(LedgerAnomaly {
        entry_index,
        replayed_balance,
        cached_balance,
        message,
    })
}

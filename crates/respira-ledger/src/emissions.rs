//! The emission ledger: per-category kg CO2e accumulators.
//!
//! Accumulators only grow. Every positive addition is also journaled as an
//! [`EmissionRecord`] so totals over a trailing window can be recomputed.
//! Nothing here resets; rollover policy belongs to whoever owns persistence.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

use respira_types::{EmissionCategory, EmissionRecord, EmissionRecordId, EmissionTotals};

use crate::LedgerError;

/// Convert a floating point kg value (as returned by the calculation
/// service) into an exact [`Decimal`].
///
/// # Errors
///
/// Returns [`LedgerError::NonFinite`] for NaN or infinities,
/// [`LedgerError::NegativeQuantity`] for negative values, and
/// [`LedgerError::Overflow`] for magnitudes [`Decimal`] cannot hold.
pub fn quantity_from_f64(value: f64) -> Result<Decimal, LedgerError> {
    if !value.is_finite() {
        return Err(LedgerError::NonFinite { value });
    }
    let quantity = Decimal::from_f64(value).ok_or(LedgerError::Overflow("kg value out of range"))?;
    if quantity < Decimal::ZERO {
        return Err(LedgerError::NegativeQuantity { quantity });
    }
    Ok(quantity)
}

/// Emission accumulators plus their addition journal.
#[derive(Debug, Default)]
pub struct EmissionLedger {
    totals: EmissionTotals,
    records: Vec<EmissionRecord>,
}

impl EmissionLedger {
    /// Create a ledger with all accumulators at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulator values.
    pub const fn totals(&self) -> &EmissionTotals {
        &self.totals
    }

    /// All journaled additions, oldest first.
    pub fn records(&self) -> &[EmissionRecord] {
        &self.records
    }

    /// Add `amount_kg` to exactly one accumulator.
    ///
    /// A zero amount is accepted and changes nothing. Validation happens
    /// before any mutation, so a failed call leaves the ledger unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NegativeQuantity`] for a negative amount or
    /// [`LedgerError::Overflow`] if the accumulator would overflow.
    pub fn record(
        &mut self,
        category: EmissionCategory,
        amount_kg: Decimal,
        recorded_at: DateTime<Utc>,
    ) -> Result<&EmissionTotals, LedgerError> {
        if amount_kg < Decimal::ZERO {
            return Err(LedgerError::NegativeQuantity { quantity: amount_kg });
        }
        if amount_kg.is_zero() {
            return Ok(&self.totals);
        }

        let next = self
            .totals
            .get(category)
            .checked_add(amount_kg)
            .ok_or(LedgerError::Overflow("emission accumulator"))?;
        *self.totals.get_mut(category) = next;

        self.records.push(EmissionRecord {
            id: EmissionRecordId::new(),
            category,
            amount_kg,
            recorded_at,
        });

        Ok(&self.totals)
    }

    /// Totals of the additions recorded at or after `cutoff`, each
    /// saturating at [`Decimal::MAX`].
    pub fn totals_since(&self, cutoff: DateTime<Utc>) -> EmissionTotals {
        let mut window = EmissionTotals::default();
        for record in self.records.iter().filter(|r| r.recorded_at >= cutoff) {
            let slot = window.get_mut(record.category);
            *slot = slot.saturating_add(record.amount_kg);
        }
        window
    }
}

//! Entry builder and validation for the point ledger.
//!
//! Provides an [`EntryBuilder`] that enforces the journal invariants before
//! producing a [`PointEntry`]: a strictly positive amount, a reason, and a
//! resulting balance that is representable and never negative.

use chrono::Utc;
use rust_decimal::Decimal;

use respira_types::{PointEntry, PointEntryId, PointEntryType};

use crate::LedgerError;

// ---------------------------------------------------------------------------
// Entry builder
// ---------------------------------------------------------------------------

/// Builder for constructing validated [`PointEntry`] values.
///
/// # Examples
///
/// ```
/// use respira_ledger::EntryBuilder;
/// use respira_types::PointEntryType;
/// use rust_decimal::Decimal;
///
/// let entry = EntryBuilder::new(PointEntryType::Purchase)
///     .amount(Decimal::new(200, 0))
///     .reason("PURCHASE".to_owned())
///     .reference("glasses".to_owned())
///     .build(Decimal::new(1250, 0));
///
/// assert_eq!(entry.ok().map(|e| e.balance_after), Some(Decimal::new(1050, 0)));
/// ```
#[derive(Debug)]
pub struct EntryBuilder {
    entry_type: PointEntryType,
    amount: Option<Decimal>,
    reason: Option<String>,
    reference: Option<String>,
}

impl EntryBuilder {
    /// Start building an entry of the given type.
    pub const fn new(entry_type: PointEntryType) -> Self {
        Self {
            entry_type,
            amount: None,
            reason: None,
            reference: None,
        }
    }

    /// Set the amount moved.
    #[must_use]
    pub const fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Set the human-readable reason.
    #[must_use]
    pub fn reason(mut self, reason: String) -> Self {
        self.reason = Some(reason);
        self
    }

    /// Set the related catalog key.
    #[must_use]
    pub fn reference(mut self, reference: String) -> Self {
        self.reference = Some(reference);
        self
    }

    /// Validate inputs against the balance before the entry and produce a
    /// [`PointEntry`].
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::MissingField`] if amount or reason is unset.
    /// Returns [`LedgerError::ZeroQuantity`] or
    /// [`LedgerError::NegativeQuantity`] for a non-positive amount.
    /// Returns [`LedgerError::InsufficientBalance`] if a debit exceeds
    /// `balance_before`.
    /// Returns [`LedgerError::Overflow`] if a credit overflows.
    pub fn build(self, balance_before: Decimal) -> Result<PointEntry, LedgerError> {
        let amount = self.amount.ok_or(LedgerError::MissingField("amount"))?;
        let reason = self.reason.ok_or(LedgerError::MissingField("reason"))?;

        validate_amount(amount)?;

        let balance_after = apply(self.entry_type, balance_before, amount)?;

        Ok(PointEntry {
            id: PointEntryId::new(),
            entry_type: self.entry_type,
            amount,
            reason,
            reference: self.reference,
            balance_after,
            created_at: Utc::now(),
        })
    }
}

/// Reject zero and negative amounts.
pub(crate) fn validate_amount(amount: Decimal) -> Result<(), LedgerError> {
    if amount.is_zero() {
        return Err(LedgerError::ZeroQuantity);
    }
    if amount.is_sign_negative() {
        return Err(LedgerError::NegativeQuantity { quantity: amount });
    }
    Ok(())
}

/// Apply one movement to a balance.
///
/// Shared by the builder and the solvency replay so both agree on what a
/// movement does.
pub(crate) fn apply(
    entry_type: PointEntryType,
    balance: Decimal,
    amount: Decimal,
) -> Result<Decimal, LedgerError> {
    if entry_type.is_credit() {
        balance
            .checked_add(amount)
            .ok_or(LedgerError::Overflow("point balance credit"))
    } else {
        if balance < amount {
            return Err(LedgerError::InsufficientBalance {
                requested: amount,
                available: balance,
            });
        }
        balance
            .checked_sub(amount)
            .ok_or(LedgerError::Overflow("point balance debit"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder(entry_type: PointEntryType, amount: Decimal) -> EntryBuilder {
        EntryBuilder::new(entry_type)
            .amount(amount)
            .reason("TEST".to_owned())
    }

    #[test]
    fn credit_increases_balance() {
        let entry = builder(PointEntryType::Award, Decimal::new(80, 0)).build(Decimal::new(20, 0));
        assert!(entry.is_ok());
        if let Ok(e) = entry {
            assert_eq!(e.balance_after, Decimal::new(100, 0));
            assert_eq!(e.reference, None);
        }
    }

    #[test]
    fn debit_decreases_balance() {
        let entry = builder(PointEntryType::Purchase, Decimal::new(350, 0))
            .reference("hat".to_owned())
            .build(Decimal::new(500, 0));
        assert!(entry.is_ok());
        if let Ok(e) = entry {
            assert_eq!(e.balance_after, Decimal::new(150, 0));
            assert_eq!(e.reference.as_deref(), Some("hat"));
        }
    }

    #[test]
    fn debit_to_exactly_zero_allowed() {
        let entry = builder(PointEntryType::Purchase, Decimal::new(200, 0)).build(Decimal::new(200, 0));
        assert_eq!(entry.ok().map(|e| e.balance_after), Some(Decimal::ZERO));
    }

    #[test]
    fn overdraft_rejected() {
        let result = builder(PointEntryType::Purchase, Decimal::new(200, 0)).build(Decimal::new(100, 0));
        assert!(matches!(
            result,
            Err(LedgerError::InsufficientBalance { .. })
        ));
    }

    #[test]
    fn zero_amount_rejected() {
        let result = builder(PointEntryType::Award, Decimal::ZERO).build(Decimal::ZERO);
        assert!(matches!(result, Err(LedgerError::ZeroQuantity)));
    }

    #[test]
    fn negative_amount_rejected() {
        let result = builder(PointEntryType::Award, Decimal::new(-5, 0)).build(Decimal::ZERO);
        assert!(matches!(result, Err(LedgerError::NegativeQuantity { .. })));
    }

    #[test]
    fn missing_reason_rejected() {
        let result = EntryBuilder::new(PointEntryType::Award)
            .amount(Decimal::ONE)
            .build(Decimal::ZERO);
        assert!(matches!(result, Err(LedgerError::MissingField("reason"))));
    }

    #[test]
    fn missing_amount_rejected() {
        let result = EntryBuilder::new(PointEntryType::Award)
            .reason("TEST".to_owned())
            .build(Decimal::ZERO);
        assert!(matches!(result, Err(LedgerError::MissingField("amount"))));
    }

    #[test]
    fn credit_overflow_rejected() {
        let result = builder(PointEntryType::Award, Decimal::MAX).build(Decimal::MAX);
        assert!(matches!(result, Err(LedgerError::Overflow(_))));
    }
}

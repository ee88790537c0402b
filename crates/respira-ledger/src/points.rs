//! The point ledger: an append-only journal of XP movements.
//!
//! The [`PointLedger`] holds every [`PointEntry`] of the session plus a
//! cached balance. The cache is what callers read; the journal is what the
//! solvency audit replays.
//!
//! # Design
//!
//! - **Append-only**: entries are never modified or deleted.
//! - **Typed direction**: only `Purchase` debits; everything else credits.
//! - **Solvency**: the balance never goes below zero; overdrafts are
//!   rejected, never clamped.
//! - **Precision**: all amounts use [`Decimal`] -- no floating point.

use rust_decimal::Decimal;

use respira_types::{PointEntry, PointEntryType};

use crate::solvency::{SolvencyResult, verify_solvency};
use crate::{EntryBuilder, LedgerError};

/// The XP journal for one session.
#[derive(Debug, Default)]
pub struct PointLedger {
    /// All entries, in insertion order.
    entries: Vec<PointEntry>,
    /// Balance after the last entry.
    balance: Decimal,
}

impl PointLedger {
    /// Create a new empty ledger with a zero balance.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
            balance: Decimal::ZERO,
        }
    }

    /// Create a ledger whose first entry is an `Opening` credit.
    ///
    /// A zero opening balance records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NegativeQuantity`] for a negative balance.
    pub fn with_opening_balance(opening: Decimal) -> Result<Self, LedgerError> {
        let mut ledger = Self::new();
        if opening < Decimal::ZERO {
            return Err(LedgerError::NegativeQuantity { quantity: opening });
        }
        if !opening.is_zero() {
            ledger.credit(PointEntryType::Opening, opening, "OPENING_BALANCE", None)?;
        }
        Ok(ledger)
    }

    /// Return the number of entries in the ledger.
    pub const fn len(&self) -> usize {
        self.entries.len()
    }

    /// Return whether the ledger has no entries.
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current spendable balance.
    pub const fn balance(&self) -> Decimal {
        self.balance
    }

    /// Returns `true` if a debit of `amount` would succeed.
    pub fn can_afford(&self, amount: Decimal) -> bool {
        self.balance >= amount
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> &[PointEntry] {
        &self.entries
    }

    /// Record a credit of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDirection`] if `entry_type` is a debit
    /// type, or any validation error from [`EntryBuilder::build`].
    pub fn credit(
        &mut self,
        entry_type: PointEntryType,
        amount: Decimal,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<&PointEntry, LedgerError> {
        if !entry_type.is_credit() {
            return Err(LedgerError::InvalidDirection {
                entry_type,
                direction: "credit",
            });
        }
        self.record(entry_type, amount, reason, reference)
    }

    /// Record a debit of the given type.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InvalidDirection`] if `entry_type` is a credit
    /// type, [`LedgerError::InsufficientBalance`] on overdraft, or any other
    /// validation error from [`EntryBuilder::build`].
    pub fn debit(
        &mut self,
        entry_type: PointEntryType,
        amount: Decimal,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<&PointEntry, LedgerError> {
        if entry_type.is_credit() {
            return Err(LedgerError::InvalidDirection {
                entry_type,
                direction: "debit",
            });
        }
        self.record(entry_type, amount, reason, reference)
    }

    /// Credit XP earned in the app.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_award(&mut self, amount: Decimal, reason: &str) -> Result<&PointEntry, LedgerError> {
        self.credit(PointEntryType::Award, amount, reason, None)
    }

    /// Credit a completed mission's reward.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError`] if the entry fails validation.
    pub fn record_mission_reward(
        &mut self,
        amount: Decimal,
        mission: &str,
    ) -> Result<&PointEntry, LedgerError> {
        self.credit(PointEntryType::MissionReward, amount, "MISSION_REWARD", Some(mission))
    }

    /// Debit a shop purchase.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientBalance`] if the balance is below
    /// `price`, or another [`LedgerError`] if the entry fails validation.
    pub fn record_purchase(&mut self, price: Decimal, item: &str) -> Result<&PointEntry, LedgerError> {
        self.debit(PointEntryType::Purchase, price, "PURCHASE", Some(item))
    }

    /// Sum of all credits except the opening balance, saturating at
    /// [`Decimal::MAX`].
    pub fn total_earned(&self) -> Decimal {
        self.sum_where(|t| t.is_credit() && t != PointEntryType::Opening)
    }

    /// Sum of all debits, saturating at [`Decimal::MAX`].
    pub fn total_spent(&self) -> Decimal {
        self.sum_where(|t| !t.is_credit())
    }

    /// Replay the journal and check it against the cached balance.
    pub fn verify_solvency(&self) -> SolvencyResult {
        verify_solvency(&self.entries, self.balance)
    }

    fn sum_where(&self, keep: impl Fn(PointEntryType) -> bool) -> Decimal {
        self.entries
            .iter()
            .filter(|e| keep(e.entry_type))
            .fold(Decimal::ZERO, |acc, e| acc.saturating_add(e.amount))
    }

    fn record(
        &mut self,
        entry_type: PointEntryType,
        amount: Decimal,
        reason: &str,
        reference: Option<&str>,
    ) -> Result<&PointEntry, LedgerError> {
        let mut builder = EntryBuilder::new(entry_type)
            .amount(amount)
            .reason(reason.to_owned());

        if let Some(reference) = reference {
            builder = builder.reference(reference.to_owned());
        }

        let entry = builder.build(self.balance)?;
        self.balance = entry.balance_after;
        self.entries.push(entry);

        tracing::trace!(
            ?entry_type,
            %amount,
            balance = %self.balance,
            "point entry recorded"
        );

        self.entries.last().ok_or(LedgerError::InternalError(
            "failed to retrieve entry after append",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opened(amount: i64) -> PointLedger {
        PointLedger::with_opening_balance(Decimal::new(amount, 0)).unwrap_or_default()
    }

    #[test]
    fn new_ledger_is_empty() {
        let ledger = PointLedger::new();
        assert!(ledger.is_empty());
        assert_eq!(ledger.balance(), Decimal::ZERO);
    }

    #[test]
    fn opening_balance_recorded_as_entry() {
        let ledger = opened(1250);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.balance(), Decimal::new(1250, 0));
        assert_eq!(
            ledger.entries().first().map(|e| e.entry_type),
            Some(PointEntryType::Opening)
        );
    }

    #[test]
    fn zero_opening_balance_records_nothing() {
        let ledger = opened(0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn negative_opening_balance_rejected() {
        let result = PointLedger::with_opening_balance(Decimal::new(-1, 0));
        assert!(matches!(result, Err(LedgerError::NegativeQuantity { .. })));
    }

    #[test]
    fn purchase_deducts_price() {
        let mut ledger = opened(1250);
        let result = ledger.record_purchase(Decimal::new(200, 0), "glasses");
        assert!(result.is_ok());
        assert_eq!(ledger.balance(), Decimal::new(1050, 0));
        assert_eq!(ledger.total_spent(), Decimal::new(200, 0));
    }

    #[test]
    fn failed_purchase_leaves_ledger_untouched() {
        let mut ledger = opened(100);
        let result = ledger.record_purchase(Decimal::new(200, 0), "glasses");
        assert!(matches!(result, Err(LedgerError::InsufficientBalance { .. })));
        assert_eq!(ledger.balance(), Decimal::new(100, 0));
        assert_eq!(ledger.len(), 1);
    }

    #[test]
    fn purchase_cannot_be_recorded_as_credit() {
        let mut ledger = opened(100);
        let result = ledger.credit(PointEntryType::Purchase, Decimal::ONE, "X", None);
        assert!(matches!(result, Err(LedgerError::InvalidDirection { .. })));
    }

    #[test]
    fn award_cannot_be_recorded_as_debit() {
        let mut ledger = opened(100);
        let result = ledger.debit(PointEntryType::Award, Decimal::ONE, "X", None);
        assert!(matches!(result, Err(LedgerError::InvalidDirection { .. })));
        assert_eq!(ledger.balance(), Decimal::new(100, 0));
    }

    #[test]
    fn earned_excludes_opening() {
        let mut ledger = opened(1000);
        let _ = ledger.record_award(Decimal::new(50, 0), "AWARD");
        let _ = ledger.record_mission_reward(Decimal::new(80, 0), "banho_flash");
        assert_eq!(ledger.total_earned(), Decimal::new(130, 0));
        assert_eq!(ledger.balance(), Decimal::new(1130, 0));
    }

    #[test]
    fn mission_reward_references_mission() {
        let mut ledger = PointLedger::new();
        let reference = ledger
            .record_mission_reward(Decimal::new(80, 0), "banho_flash")
            .ok()
            .and_then(|e| e.reference.clone());
        assert_eq!(reference.as_deref(), Some("banho_flash"));
    }

    #[test]
    fn can_afford_is_inclusive() {
        let ledger = opened(200);
        assert!(ledger.can_afford(Decimal::new(200, 0)));
        assert!(!ledger.can_afford(Decimal::new(201, 0)));
    }

    #[test]
    fn mixed_history_stays_solvent() {
        let mut ledger = opened(500);
        let _ = ledger.record_purchase(Decimal::new(350, 0), "hat");
        let _ = ledger.record_award(Decimal::new(40, 0), "AWARD");
        let _ = ledger.record_purchase(Decimal::new(190, 0), "bg_purple");
        assert_eq!(ledger.balance(), Decimal::ZERO);
        assert_eq!(ledger.verify_solvency(), SolvencyResult::Solvent);
    }
}

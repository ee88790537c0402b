//! The single-writer engagement model.
//!
//! [`EngagementState`] owns every piece of session state: emission
//! accumulators, the point ledger, the wardrobe and the mission slot. Each
//! operation validates first and mutates second, so a failed call leaves
//! the state exactly as it was. Concurrent access goes through
//! [`EngagementStore`](crate::EngagementStore).
//!
//! Successful calls that change something bump the revision counter. No-op
//! successes (a zero award, a re-purchase) leave it alone.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use respira_ledger::{
    EmissionLedger, LedgerError, PointLedger, SolvencyResult, quantity_from_f64,
};
use respira_types::{
    ActiveMission, EmissionCategory, EmissionRecord, EmissionTotals, EngagementSnapshot,
    EngagementStats, EquippedItems, ItemId, ItemKind, MissionId, MissionOutcome, MissionRecord,
    PointEntry,
};

use crate::catalog::Catalogs;
use crate::config::StoreConfig;
use crate::error::EngagementError;
use crate::mission::MissionSlot;
use crate::wardrobe::Wardrobe;

/// Result of a successful `purchase_item`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum PurchaseOutcome {
    /// The price was deducted and the item is now owned.
    Purchased {
        /// Catalog price paid.
        price: Decimal,
        /// Balance after the deduction.
        balance: Decimal,
    },
    /// The item was already owned; nothing changed.
    AlreadyOwned,
}

/// All mutable session state.
#[derive(Debug)]
pub struct EngagementState {
    catalogs: Arc<Catalogs>,
    emissions: EmissionLedger,
    points: PointLedger,
    wardrobe: Wardrobe,
    missions: MissionSlot,
    revision: u64,
}

impl EngagementState {
    /// Build the initial state from config and catalogs.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] if the config is out of
    /// range, or [`EngagementError::UnknownMission`] if the initial mission
    /// is not in the catalog.
    pub fn new(config: &StoreConfig, catalogs: Arc<Catalogs>) -> Result<Self, EngagementError> {
        config
            .validate()
            .map_err(|e| EngagementError::invalid(e.to_string()))?;

        let points = PointLedger::with_opening_balance(config.initial_balance)
            .map_err(input_error)?;
        let wardrobe = Wardrobe::new(catalogs.items.default_background().clone());

        let mut missions = MissionSlot::new();
        if let Some(initial) = &config.initial_mission {
            let mission = catalogs
                .missions
                .get(&initial.mission_id)
                .ok_or_else(|| EngagementError::UnknownMission(initial.mission_id.clone()))?;
            missions.accept(mission, Utc::now())?;
            missions.advance(initial.progress)?;
        }

        info!(
            balance = %points.balance(),
            active_mission = ?config.initial_mission.as_ref().map(|m| m.mission_id.as_str()),
            "Engagement state initialized"
        );

        Ok(Self {
            catalogs,
            emissions: EmissionLedger::new(),
            points,
            wardrobe,
            missions,
            revision: 0,
        })
    }

    // -----------------------------------------------------------------------
    // Reads
    // -----------------------------------------------------------------------

    /// Mutation counter; 0 until the first state change.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Current spendable XP.
    pub const fn balance(&self) -> Decimal {
        self.points.balance()
    }

    /// Current emission accumulators.
    pub const fn emissions(&self) -> &EmissionTotals {
        self.emissions.totals()
    }

    /// Emission totals over additions recorded at or after `cutoff`.
    pub fn emissions_since(&self, cutoff: DateTime<Utc>) -> EmissionTotals {
        self.emissions.totals_since(cutoff)
    }

    /// The point ledger journal, oldest first.
    pub fn point_entries(&self) -> &[PointEntry] {
        self.points.entries()
    }

    /// The emission record journal, oldest first.
    pub fn emission_records(&self) -> &[EmissionRecord] {
        self.emissions.records()
    }

    /// Replay the point ledger and compare it to the cached balance.
    pub fn audit(&self) -> SolvencyResult {
        self.points.verify_solvency()
    }

    /// The catalogs this state was built with.
    pub const fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// Whether `item` is owned.
    pub fn owns(&self, item: &ItemId) -> bool {
        self.wardrobe.is_owned(item)
    }

    /// Current equip map.
    pub const fn equipped(&self) -> &EquippedItems {
        self.wardrobe.equipped()
    }

    /// The mission in progress, if any.
    pub const fn active_mission(&self) -> Option<&ActiveMission> {
        self.missions.active()
    }

    /// Closed missions, oldest first.
    pub fn mission_history(&self) -> &[MissionRecord] {
        self.missions.history()
    }

    /// Copy the whole state into an immutable snapshot.
    pub fn snapshot(&self) -> EngagementSnapshot {
        let emissions = *self.emissions.totals();
        EngagementSnapshot {
            revision: self.revision,
            emissions,
            balance: self.points.balance(),
            active_mission: self.missions.active().cloned(),
            owned_items: self.wardrobe.owned().clone(),
            equipped: self.wardrobe.equipped().clone(),
            mission_history: self.missions.history().to_vec(),
            stats: EngagementStats {
                total_emissions_kg: emissions.saturating_total(),
                missions_completed: self.missions.count(MissionOutcome::Completed),
                missions_abandoned: self.missions.count(MissionOutcome::Abandoned),
                points_earned: self.points.total_earned(),
                points_spent: self.points.total_spent(),
            },
        }
    }

    // -----------------------------------------------------------------------
    // Emissions and points
    // -----------------------------------------------------------------------

    /// Add `amount_kg` to one emission accumulator.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] for a negative amount or
    /// an accumulator overflow. The ledger is unchanged on error.
    pub fn record_emission(
        &mut self,
        category: EmissionCategory,
        amount_kg: Decimal,
    ) -> Result<EmissionTotals, EngagementError> {
        let totals = *self
            .emissions
            .record(category, amount_kg, Utc::now())
            .map_err(|e| {
                warn!(%category, %amount_kg, error = %e, "Rejected emission");
                input_error(e)
            })?;
        if !amount_kg.is_zero() {
            self.bump();
            debug!(%category, %amount_kg, revision = self.revision, "Recorded emission");
        }
        Ok(totals)
    }

    /// [`record_emission`](Self::record_emission) for a floating point kg
    /// value, as returned by the calculation service.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] for NaN, infinities and
    /// negative values.
    pub fn record_emission_f64(
        &mut self,
        category: EmissionCategory,
        amount_kg: f64,
    ) -> Result<EmissionTotals, EngagementError> {
        let amount = quantity_from_f64(amount_kg).map_err(|e| {
            warn!(%category, amount_kg, error = %e, "Rejected emission");
            input_error(e)
        })?;
        self.record_emission(category, amount)
    }

    /// Credit XP. Zero is accepted and records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] for a negative amount or a
    /// balance overflow.
    pub fn award_points(&mut self, amount: Decimal) -> Result<Decimal, EngagementError> {
        if amount < Decimal::ZERO {
            warn!(%amount, "Rejected negative award");
            return Err(EngagementError::invalid(format!(
                "award must not be negative, got {amount}"
            )));
        }
        if amount.is_zero() {
            return Ok(self.points.balance());
        }
        self.points.record_award(amount, "AWARD").map_err(input_error)?;
        self.bump();
        debug!(%amount, balance = %self.points.balance(), "Awarded points");
        Ok(self.points.balance())
    }

    // -----------------------------------------------------------------------
    // Shop
    // -----------------------------------------------------------------------

    /// Buy `item_id` at its catalog price.
    ///
    /// Buying an owned item succeeds without side effects.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownItem`] or
    /// [`EngagementError::InsufficientFunds`]; nothing changes on error.
    pub fn purchase_item(&mut self, item_id: &ItemId) -> Result<PurchaseOutcome, EngagementError> {
        let item = self
            .catalogs
            .items
            .get(item_id)
            .ok_or_else(|| EngagementError::UnknownItem(item_id.clone()))?;

        if self.wardrobe.is_owned(item_id) {
            debug!(item = %item_id, "Item already owned; purchase is a no-op");
            return Ok(PurchaseOutcome::AlreadyOwned);
        }

        let price = item.price;
        let balance = self.points.balance();
        if !self.points.can_afford(price) {
            warn!(item = %item_id, %price, %balance, "Purchase rejected: insufficient funds");
            return Err(EngagementError::InsufficientFunds {
                item: item_id.clone(),
                price,
                balance,
            });
        }

        // Free items skip the ledger; entries must carry a positive amount.
        if !price.is_zero() {
            self.points
                .record_purchase(price, item_id.as_str())
                .map_err(|e| match e {
                    LedgerError::InsufficientBalance { available, .. } => {
                        EngagementError::InsufficientFunds {
                            item: item_id.clone(),
                            price,
                            balance: available,
                        }
                    }
                    other => EngagementError::Ledger(other),
                })?;
        }
        self.wardrobe.grant(item_id.clone());
        self.bump();

        let balance = self.points.balance();
        info!(item = %item_id, %price, %balance, "Item purchased");
        Ok(PurchaseOutcome::Purchased { price, balance })
    }

    /// Equip `item_id` in the `kind` slot, or unequip it if it is already
    /// there.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownItem`],
    /// [`EngagementError::InvalidInput`] on a kind mismatch, or
    /// [`EngagementError::NotOwned`].
    pub fn equip_item(
        &mut self,
        item_id: &ItemId,
        kind: ItemKind,
    ) -> Result<EquippedItems, EngagementError> {
        let item = self
            .catalogs
            .items
            .get(item_id)
            .ok_or_else(|| EngagementError::UnknownItem(item_id.clone()))?;
        let changed = self
            .wardrobe
            .equip(item, kind)
            .inspect_err(|e| warn!(item = %item_id, %kind, error = %e, "Equip rejected"))?;
        let equipped = self.wardrobe.equipped().clone();
        if changed {
            self.bump();
            debug!(item = %item_id, %kind, ?equipped, "Equip state changed");
        }
        Ok(equipped)
    }

    // -----------------------------------------------------------------------
    // Missions
    // -----------------------------------------------------------------------

    /// Start `mission_id` with zero progress.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownMission`] or
    /// [`EngagementError::MissionAlreadyActive`].
    pub fn accept_mission(&mut self, mission_id: &MissionId) -> Result<ActiveMission, EngagementError> {
        let mission = self
            .catalogs
            .missions
            .get(mission_id)
            .ok_or_else(|| EngagementError::UnknownMission(mission_id.clone()))?;
        let active = self
            .missions
            .accept(mission, Utc::now())
            .inspect_err(|e| warn!(mission = %mission_id, error = %e, "Accept rejected"))?
            .clone();
        self.bump();
        info!(mission = %mission_id, reward = %active.mission.point_reward, "Mission accepted");
        Ok(active)
    }

    /// Set the active mission's progress ratio.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`] or
    /// [`EngagementError::InvalidInput`] for a ratio outside `[0, 1]`.
    pub fn advance_mission_progress(
        &mut self,
        progress: Decimal,
    ) -> Result<ActiveMission, EngagementError> {
        let active = self.missions.advance(progress)?.clone();
        self.bump();
        debug!(mission = %active.mission.id, %progress, "Mission progress updated");
        Ok(active)
    }

    /// Close the active mission as completed and credit its reward.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`], or
    /// [`EngagementError::InvalidInput`] if the reward overflows the balance.
    pub fn complete_mission(&mut self) -> Result<MissionRecord, EngagementError> {
        let active = self
            .missions
            .active()
            .ok_or(EngagementError::NoActiveMission)?;
        let reward = active.mission.point_reward;
        let mission_id = active.mission.id.clone();

        if !reward.is_zero() {
            self.points
                .record_mission_reward(reward, mission_id.as_str())
                .map_err(input_error)?;
        }
        let record = self
            .missions
            .close(MissionOutcome::Completed, reward, Utc::now())?
            .clone();
        self.bump();
        info!(mission = %mission_id, %reward, balance = %self.points.balance(), "Mission completed");
        Ok(record)
    }

    /// Close the active mission without a reward.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`].
    pub fn abandon_mission(&mut self) -> Result<MissionRecord, EngagementError> {
        let record = self
            .missions
            .close(MissionOutcome::Abandoned, Decimal::ZERO, Utc::now())?
            .clone();
        self.bump();
        info!(mission = %record.mission_id, progress = %record.final_progress, "Mission abandoned");
        Ok(record)
    }

    fn bump(&mut self) {
        self.revision = self.revision.saturating_add(1);
    }
}

/// Quantity problems are the caller's fault; anything else is a ledger bug.
fn input_error(err: LedgerError) -> EngagementError {
    match err {
        LedgerError::ZeroQuantity
        | LedgerError::NegativeQuantity { .. }
        | LedgerError::NonFinite { .. }
        | LedgerError::Overflow(_) => EngagementError::invalid(err.to_string()),
        other => EngagementError::Ledger(other),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::InitialMission;
    use crate::starting_catalog::starting_catalogs;

    fn state_with(balance: i64) -> EngagementState {
        let catalogs = Arc::new(starting_catalogs().unwrap());
        let config = StoreConfig {
            initial_balance: Decimal::new(balance, 0),
            initial_mission: None,
        };
        EngagementState::new(&config, catalogs).unwrap()
    }

    #[test]
    fn fresh_state_owns_default_background() {
        let state = state_with(1250);
        let snapshot = state.snapshot();
        assert_eq!(snapshot.revision, 0);
        assert_eq!(snapshot.balance, Decimal::new(1250, 0));
        assert!(snapshot.owned_items.contains(&ItemId::from("bg_default")));
        assert_eq!(snapshot.equipped.background, ItemId::from("bg_default"));
        assert_eq!(snapshot.equipped.accessory, None);
        assert!(state.audit().is_solvent());
    }

    #[test]
    fn purchase_deducts_and_grants() {
        let mut state = state_with(1250);
        let outcome = state.purchase_item(&ItemId::from("glasses")).unwrap();
        assert_eq!(
            outcome,
            PurchaseOutcome::Purchased {
                price: Decimal::new(200, 0),
                balance: Decimal::new(1050, 0),
            }
        );
        assert!(state.owns(&ItemId::from("glasses")));
        assert_eq!(state.revision(), 1);

        let again = state.purchase_item(&ItemId::from("glasses")).unwrap();
        assert_eq!(again, PurchaseOutcome::AlreadyOwned);
        assert_eq!(state.balance(), Decimal::new(1050, 0));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn purchase_without_funds_changes_nothing() {
        let mut state = state_with(100);
        let result = state.purchase_item(&ItemId::from("glasses"));
        assert!(matches!(result, Err(EngagementError::InsufficientFunds { .. })));
        assert_eq!(state.balance(), Decimal::new(100, 0));
        assert!(!state.owns(&ItemId::from("glasses")));
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn unknown_item_rejected() {
        let mut state = state_with(1250);
        let result = state.purchase_item(&ItemId::from("cape"));
        assert!(matches!(result, Err(EngagementError::UnknownItem(_))));
    }

    #[test]
    fn emissions_add_exactly() {
        let mut state = state_with(0);
        state
            .record_emission(EmissionCategory::Transport, Decimal::new(35, 1))
            .unwrap();
        let totals = state
            .record_emission(EmissionCategory::Transport, Decimal::new(12, 1))
            .unwrap();
        assert_eq!(totals.transport, Decimal::new(47, 1));
        assert_eq!(totals.energy, Decimal::ZERO);
        assert_eq!(totals.food, Decimal::ZERO);
    }

    #[test]
    fn float_emissions_rejected_when_not_finite() {
        let mut state = state_with(0);
        let result = state.record_emission_f64(EmissionCategory::Energy, f64::NAN);
        assert!(matches!(result, Err(EngagementError::InvalidInput { .. })));
        let result = state.record_emission_f64(EmissionCategory::Energy, -1.0);
        assert!(matches!(result, Err(EngagementError::InvalidInput { .. })));
        assert_eq!(state.emissions().energy, Decimal::ZERO);
        assert_eq!(state.revision(), 0);
    }

    #[test]
    fn award_rejects_negative_and_ignores_zero() {
        let mut state = state_with(10);
        assert!(matches!(
            state.award_points(Decimal::new(-5, 0)),
            Err(EngagementError::InvalidInput { .. })
        ));
        assert_eq!(state.award_points(Decimal::ZERO).unwrap(), Decimal::new(10, 0));
        assert_eq!(state.revision(), 0);
        assert_eq!(state.award_points(Decimal::new(15, 0)).unwrap(), Decimal::new(25, 0));
        assert_eq!(state.revision(), 1);
    }

    #[test]
    fn equip_requires_ownership() {
        let mut state = state_with(1250);
        let result = state.equip_item(&ItemId::from("hat"), ItemKind::Accessory);
        assert!(matches!(result, Err(EngagementError::NotOwned { .. })));
    }

    #[test]
    fn equip_twice_toggles_off() {
        let mut state = state_with(1250);
        state.purchase_item(&ItemId::from("glasses")).unwrap();
        let on = state
            .equip_item(&ItemId::from("glasses"), ItemKind::Accessory)
            .unwrap();
        assert_eq!(on.accessory, Some(ItemId::from("glasses")));
        let off = state
            .equip_item(&ItemId::from("glasses"), ItemKind::Accessory)
            .unwrap();
        assert_eq!(off.accessory, None);
    }

    #[test]
    fn complete_credits_reward() {
        let mut state = state_with(0);
        state.accept_mission(&MissionId::from("banho_flash")).unwrap();
        let record = state.complete_mission().unwrap();
        assert_eq!(record.outcome, MissionOutcome::Completed);
        assert_eq!(record.points_awarded, Decimal::new(80, 0));
        assert_eq!(state.balance(), Decimal::new(80, 0));
        assert!(state.active_mission().is_none());
        assert!(state.audit().is_solvent());
    }

    #[test]
    fn abandon_pays_nothing() {
        let mut state = state_with(0);
        state.accept_mission(&MissionId::from("plantio_amigo")).unwrap();
        let record = state.abandon_mission().unwrap();
        assert_eq!(record.outcome, MissionOutcome::Abandoned);
        assert_eq!(state.balance(), Decimal::ZERO);
        assert_eq!(state.snapshot().stats.missions_abandoned, 1);
    }

    #[test]
    fn initial_mission_restored() {
        let catalogs = Arc::new(starting_catalogs().unwrap());
        let config = StoreConfig {
            initial_balance: Decimal::new(1250, 0),
            initial_mission: Some(InitialMission {
                mission_id: MissionId::from("sobra_zero"),
                progress: Decimal::new(75, 2),
            }),
        };
        let state = EngagementState::new(&config, catalogs).unwrap();
        let active = state.active_mission().unwrap();
        assert_eq!(active.mission.id, MissionId::from("sobra_zero"));
        assert_eq!(active.progress, Decimal::new(75, 2));
    }

    #[test]
    fn unknown_initial_mission_rejected() {
        let catalogs = Arc::new(starting_catalogs().unwrap());
        let config = StoreConfig {
            initial_balance: Decimal::ZERO,
            initial_mission: Some(InitialMission {
                mission_id: MissionId::from("nope"),
                progress: Decimal::ZERO,
            }),
        };
        let result = EngagementState::new(&config, catalogs);
        assert!(matches!(result, Err(EngagementError::UnknownMission(_))));
    }
}

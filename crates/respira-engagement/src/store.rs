//! Thread-safe handle around [`EngagementState`].
//!
//! Every mutation runs read-compute-write under one [`Mutex`], so no caller
//! can observe a half-applied purchase. When a mutation changes the state,
//! the new snapshot is published on a [`watch`] channel before the lock is
//! released, which keeps published revisions strictly increasing. Readers
//! take the latest snapshot from the channel and never contend with writers.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tokio::sync::watch;

use respira_ledger::SolvencyResult;
use respira_types::{
    ActiveMission, EmissionCategory, EmissionRecord, EmissionTotals, EngagementSnapshot,
    EquippedItems, ItemId, ItemKind, MissionId, MissionRecord, PointEntry,
};

use crate::catalog::{Catalogs, ItemCatalog, MissionCatalog};
use crate::config::StoreConfig;
use crate::error::EngagementError;
use crate::intent::{Intent, IntentOutcome};
use crate::state::{EngagementState, PurchaseOutcome};

/// Shared engagement store. Wrap in an [`Arc`] to hand to collaborators.
#[derive(Debug)]
pub struct EngagementStore {
    state: Mutex<EngagementState>,
    snapshots: watch::Sender<Arc<EngagementSnapshot>>,
    catalogs: Arc<Catalogs>,
}

impl EngagementStore {
    /// Build a store from config and catalogs.
    ///
    /// # Errors
    ///
    /// Returns whatever [`EngagementState::new`] returns.
    pub fn new(config: &StoreConfig, catalogs: Arc<Catalogs>) -> Result<Self, EngagementError> {
        let state = EngagementState::new(config, Arc::clone(&catalogs))?;
        Ok(Self::from_state(state))
    }

    /// Wrap an existing state.
    pub fn from_state(state: EngagementState) -> Self {
        let catalogs = Arc::clone(state.catalogs());
        let (snapshots, _) = watch::channel(Arc::new(state.snapshot()));
        Self {
            state: Mutex::new(state),
            snapshots,
            catalogs,
        }
    }

    /// Receive every snapshot published from now on.
    pub fn subscribe(&self) -> watch::Receiver<Arc<EngagementSnapshot>> {
        self.snapshots.subscribe()
    }

    /// The latest published snapshot.
    pub fn snapshot(&self) -> Arc<EngagementSnapshot> {
        Arc::clone(&self.snapshots.borrow())
    }

    /// The read-only catalogs.
    pub const fn catalogs(&self) -> &Arc<Catalogs> {
        &self.catalogs
    }

    /// Mission catalog.
    pub fn missions(&self) -> &MissionCatalog {
        &self.catalogs.missions
    }

    /// Shop catalog.
    pub fn items(&self) -> &ItemCatalog {
        &self.catalogs.items
    }

    // -----------------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------------

    /// See [`EngagementState::record_emission`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] or
    /// [`EngagementError::Unavailable`].
    pub fn record_emission(
        &self,
        category: EmissionCategory,
        amount_kg: Decimal,
    ) -> Result<EmissionTotals, EngagementError> {
        self.mutate(|s| s.record_emission(category, amount_kg))
    }

    /// See [`EngagementState::record_emission_f64`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] or
    /// [`EngagementError::Unavailable`].
    pub fn record_emission_f64(
        &self,
        category: EmissionCategory,
        amount_kg: f64,
    ) -> Result<EmissionTotals, EngagementError> {
        self.mutate(|s| s.record_emission_f64(category, amount_kg))
    }

    /// See [`EngagementState::award_points`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] or
    /// [`EngagementError::Unavailable`].
    pub fn award_points(&self, amount: Decimal) -> Result<Decimal, EngagementError> {
        self.mutate(|s| s.award_points(amount))
    }

    /// See [`EngagementState::purchase_item`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownItem`],
    /// [`EngagementError::InsufficientFunds`] or
    /// [`EngagementError::Unavailable`].
    pub fn purchase_item(&self, item_id: &ItemId) -> Result<PurchaseOutcome, EngagementError> {
        self.mutate(|s| s.purchase_item(item_id))
    }

    /// See [`EngagementState::equip_item`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownItem`],
    /// [`EngagementError::InvalidInput`], [`EngagementError::NotOwned`] or
    /// [`EngagementError::Unavailable`].
    pub fn equip_item(
        &self,
        item_id: &ItemId,
        kind: ItemKind,
    ) -> Result<EquippedItems, EngagementError> {
        self.mutate(|s| s.equip_item(item_id, kind))
    }

    /// See [`EngagementState::accept_mission`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::UnknownMission`],
    /// [`EngagementError::MissionAlreadyActive`] or
    /// [`EngagementError::Unavailable`].
    pub fn accept_mission(&self, mission_id: &MissionId) -> Result<ActiveMission, EngagementError> {
        self.mutate(|s| s.accept_mission(mission_id))
    }

    /// See [`EngagementState::advance_mission_progress`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`],
    /// [`EngagementError::InvalidInput`] or [`EngagementError::Unavailable`].
    pub fn advance_mission_progress(
        &self,
        progress: Decimal,
    ) -> Result<ActiveMission, EngagementError> {
        self.mutate(|s| s.advance_mission_progress(progress))
    }

    /// See [`EngagementState::complete_mission`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`] or
    /// [`EngagementError::Unavailable`].
    pub fn complete_mission(&self) -> Result<MissionRecord, EngagementError> {
        self.mutate(EngagementState::complete_mission)
    }

    /// See [`EngagementState::abandon_mission`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`] or
    /// [`EngagementError::Unavailable`].
    pub fn abandon_mission(&self) -> Result<MissionRecord, EngagementError> {
        self.mutate(EngagementState::abandon_mission)
    }

    /// Run one serialized intent.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns.
    pub fn dispatch(&self, intent: Intent) -> Result<IntentOutcome, EngagementError> {
        let op = intent.op();
        self.mutate(|s| s.apply(intent))
            .inspect_err(|e| tracing::debug!(op, code = e.code(), "Intent failed"))
    }

    // -----------------------------------------------------------------------
    // Locked reads
    // -----------------------------------------------------------------------

    /// See [`EngagementState::emissions_since`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Unavailable`] if the lock is poisoned.
    pub fn emissions_since(&self, cutoff: DateTime<Utc>) -> Result<EmissionTotals, EngagementError> {
        self.read(|s| s.emissions_since(cutoff))
    }

    /// A copy of the point ledger journal.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Unavailable`] if the lock is poisoned.
    pub fn point_entries(&self) -> Result<Vec<PointEntry>, EngagementError> {
        self.read(|s| s.point_entries().to_vec())
    }

    /// A copy of the emission record journal.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Unavailable`] if the lock is poisoned.
    pub fn emission_records(&self) -> Result<Vec<EmissionRecord>, EngagementError> {
        self.read(|s| s.emission_records().to_vec())
    }

    /// See [`EngagementState::audit`].
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::Unavailable`] if the lock is poisoned.
    pub fn audit(&self) -> Result<SolvencyResult, EngagementError> {
        self.read(EngagementState::audit)
    }

    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut EngagementState) -> Result<T, EngagementError>,
    ) -> Result<T, EngagementError> {
        let Ok(mut state) = self.state.lock() else {
            tracing::error!("Engagement state lock poisoned");
            return Err(EngagementError::Unavailable("state lock poisoned"));
        };
        let before = state.revision();
        let out = op(&mut *state)?;
        if state.revision() != before {
            self.snapshots.send_replace(Arc::new(state.snapshot()));
        }
        Ok(out)
    }

    fn read<T>(&self, op: impl FnOnce(&EngagementState) -> T) -> Result<T, EngagementError> {
        let Ok(state) = self.state.lock() else {
            return Err(EngagementError::Unavailable("state lock poisoned"));
        };
        Ok(op(&*state))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use crate::starting_catalog::starting_catalogs;

    fn store(balance: i64) -> EngagementStore {
        let config = StoreConfig {
            initial_balance: Decimal::new(balance, 0),
            initial_mission: None,
        };
        EngagementStore::new(&config, Arc::new(starting_catalogs().unwrap())).unwrap()
    }

    #[test]
    fn successful_mutation_publishes_snapshot() {
        let store = store(1250);
        let rx = store.subscribe();
        assert_eq!(rx.borrow().revision, 0);

        store.purchase_item(&ItemId::from("glasses")).unwrap();
        let snapshot = store.snapshot();
        assert_eq!(snapshot.revision, 1);
        assert_eq!(snapshot.balance, Decimal::new(1050, 0));
        assert!(rx.has_changed().unwrap());
    }

    #[test]
    fn failed_mutation_publishes_nothing() {
        let store = store(100);
        let rx = store.subscribe();
        let result = store.purchase_item(&ItemId::from("glasses"));
        assert!(result.is_err());
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().revision, 0);
    }

    #[test]
    fn no_op_success_publishes_nothing() {
        let store = store(1250);
        store.purchase_item(&ItemId::from("glasses")).unwrap();
        let rx = store.subscribe();
        store.purchase_item(&ItemId::from("glasses")).unwrap();
        store.award_points(Decimal::ZERO).unwrap();
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn equipping_the_equipped_default_background_publishes_nothing() {
        let store = store(1250);
        let rx = store.subscribe();
        let equipped = store
            .equip_item(&ItemId::from("bg_default"), ItemKind::Background)
            .unwrap();
        assert_eq!(equipped.background, ItemId::from("bg_default"));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(store.snapshot().revision, 0);
    }

    #[test]
    fn dispatch_routes_to_operations() {
        let store = store(1250);
        let outcome = store
            .dispatch(Intent::AcceptMission {
                mission_id: MissionId::from("banho_flash"),
            })
            .unwrap();
        assert!(matches!(outcome, IntentOutcome::ActiveMission { .. }));
        let again = store.dispatch(Intent::AcceptMission {
            mission_id: MissionId::from("dia_vegano"),
        });
        assert!(matches!(again, Err(EngagementError::MissionAlreadyActive { .. })));
        assert_eq!(
            store
                .snapshot()
                .active_mission
                .as_ref()
                .map(|a| a.mission.id.as_str()),
            Some("banho_flash")
        );
    }

    #[test]
    fn locked_reads_reflect_mutations() {
        let store = store(1250);
        store
            .record_emission(EmissionCategory::Food, Decimal::new(289, 2))
            .unwrap();
        let window = store.emissions_since(Utc::now() - chrono::Duration::hours(1)).unwrap();
        assert_eq!(window.food, Decimal::new(289, 2));
        assert_eq!(store.point_entries().unwrap().len(), 1);
        let records = store.emission_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records.first().map(|r| r.category), Some(EmissionCategory::Food));
        assert!(store.audit().unwrap().is_solvent());
    }

    #[test]
    fn catalog_accessors_expose_built_in_tables() {
        let store = store(0);
        assert_eq!(store.missions().len(), 12);
        assert_eq!(store.items().default_background().as_str(), "bg_default");
    }
}

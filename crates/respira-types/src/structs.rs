//! Core entity structs: catalog entries, ledger records and the
//! engagement snapshot published to the client.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::{DifficultyTier, EmissionCategory, ItemKind, MissionOutcome, PointEntryType};
use crate::ids::{EmissionRecordId, ItemId, MissionId, PointEntryId};

// ---------------------------------------------------------------------------
// Catalog entries
// ---------------------------------------------------------------------------

/// A predefined sustainability challenge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Mission {
    /// Unique catalog key.
    pub id: MissionId,
    /// Short title shown on the mission card.
    pub title: String,
    /// What the user has to do.
    pub description: String,
    /// XP paid on completion.
    #[ts(as = "String")]
    pub point_reward: Decimal,
    /// Difficulty tier.
    pub difficulty: DifficultyTier,
    /// Icon name in the client's icon font.
    pub icon: String,
    /// Colour tag used for the card accent.
    pub color_tag: String,
    /// Free-form expected duration (`"24h"`, `"5 min"`).
    pub duration: Option<String>,
}

/// A purchasable cosmetic item for the mascot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Item {
    /// Unique catalog key.
    pub id: ItemId,
    /// Which equip slot the item occupies.
    pub kind: ItemKind,
    /// Name shown in the shop.
    pub display_name: String,
    /// Price in XP.
    #[ts(as = "String")]
    pub price: Decimal,
}

// ---------------------------------------------------------------------------
// Emissions
// ---------------------------------------------------------------------------

/// Running emission totals per category, in kg CO2e.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmissionTotals {
    /// Transport accumulator.
    #[ts(as = "String")]
    pub transport: Decimal,
    /// Energy accumulator.
    #[ts(as = "String")]
    pub energy: Decimal,
    /// Food accumulator.
    #[ts(as = "String")]
    pub food: Decimal,
}

impl EmissionTotals {
    /// Return the accumulator for a category.
    pub const fn get(&self, category: EmissionCategory) -> Decimal {
        match category {
            EmissionCategory::Transport => self.transport,
            EmissionCategory::Energy => self.energy,
            EmissionCategory::Food => self.food,
        }
    }

    /// Mutable access to the accumulator for a category.
    pub const fn get_mut(&mut self, category: EmissionCategory) -> &mut Decimal {
        match category {
            EmissionCategory::Transport => &mut self.transport,
            EmissionCategory::Energy => &mut self.energy,
            EmissionCategory::Food => &mut self.food,
        }
    }

    /// Sum of all three accumulators, saturating at [`Decimal::MAX`].
    pub fn saturating_total(&self) -> Decimal {
        EmissionCategory::ALL
            .iter()
            .fold(Decimal::ZERO, |acc, &category| acc.saturating_add(self.get(category)))
    }
}

/// One positive addition to the emission ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EmissionRecord {
    /// Unique record identifier.
    pub id: EmissionRecordId,
    /// Accumulator the amount was added to.
    pub category: EmissionCategory,
    /// Amount added, kg CO2e (always positive).
    #[ts(as = "String")]
    pub amount_kg: Decimal,
    /// When the addition was recorded.
    pub recorded_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

/// A single movement of XP.
///
/// Every change to the point balance produces exactly one entry. The
/// `balance_after` field lets the solvency audit replay the ledger and
/// detect drift between the cached balance and the journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct PointEntry {
    /// Unique entry identifier.
    pub id: PointEntryId,
    /// Category of the movement; determines the direction.
    pub entry_type: PointEntryType,
    /// Amount moved (always positive).
    #[ts(as = "String")]
    pub amount: Decimal,
    /// Reason for the movement (e.g. `"PURCHASE"`, `"MISSION_REWARD"`).
    pub reason: String,
    /// Related catalog key, such as the purchased item or completed mission.
    pub reference: Option<String>,
    /// Balance immediately after this entry was applied.
    #[ts(as = "String")]
    pub balance_after: Decimal,
    /// Real-world timestamp.
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// The mission currently in progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActiveMission {
    /// Copy of the catalog definition taken at accept time.
    pub mission: Mission,
    /// Completion ratio in `[0, 1]`.
    #[ts(as = "String")]
    pub progress: Decimal,
    /// When the mission was accepted.
    pub accepted_at: DateTime<Utc>,
}

/// A mission that has left the active slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct MissionRecord {
    /// Catalog key of the mission.
    pub mission_id: MissionId,
    /// Title at the time it was accepted.
    pub title: String,
    /// Completed or abandoned.
    pub outcome: MissionOutcome,
    /// Progress reached before the mission closed.
    #[ts(as = "String")]
    pub final_progress: Decimal,
    /// XP credited when the mission closed (zero when abandoned).
    #[ts(as = "String")]
    pub points_awarded: Decimal,
    /// When the mission was accepted.
    pub accepted_at: DateTime<Utc>,
    /// When the mission was completed or abandoned.
    pub closed_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// Currently equipped cosmetic per slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EquippedItems {
    /// Equipped accessory, if any.
    pub accessory: Option<ItemId>,
    /// Equipped background. Always set.
    pub background: ItemId,
}

impl EquippedItems {
    /// Nothing worn, given background shown.
    pub const fn with_background(background: ItemId) -> Self {
        Self {
            accessory: None,
            background,
        }
    }

    /// Return the id equipped in the slot for `kind`, if any.
    pub const fn slot(&self, kind: ItemKind) -> Option<&ItemId> {
        match kind {
            ItemKind::Accessory => self.accessory.as_ref(),
            ItemKind::Background => Some(&self.background),
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Aggregate statistics over the session.
///
/// The decimal sums saturate at [`Decimal::MAX`]; the accumulators and the
/// balance they summarize reject overflow on write.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EngagementStats {
    /// Sum of all emission accumulators, kg CO2e.
    #[ts(as = "String")]
    pub total_emissions_kg: Decimal,
    /// Number of completed missions.
    pub missions_completed: u32,
    /// Number of abandoned missions.
    pub missions_abandoned: u32,
    /// XP credited by awards and mission rewards (excludes the opening balance).
    #[ts(as = "String")]
    pub points_earned: Decimal,
    /// XP spent in the shop.
    #[ts(as = "String")]
    pub points_spent: Decimal,
}

/// Immutable view of the whole engagement state at one revision.
///
/// This is what UI collaborators render. A new snapshot is published after
/// every successful mutation; `revision` increases by one each time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EngagementSnapshot {
    /// Monotonic mutation counter (0 = freshly initialized).
    pub revision: u64,
    /// Emission accumulators.
    pub emissions: EmissionTotals,
    /// Spendable XP.
    #[ts(as = "String")]
    pub balance: Decimal,
    /// Mission in progress, if any.
    pub active_mission: Option<ActiveMission>,
    /// Owned item keys (always includes the default background).
    pub owned_items: BTreeSet<ItemId>,
    /// Equip state.
    pub equipped: EquippedItems,
    /// Closed missions, oldest first.
    pub mission_history: Vec<MissionRecord>,
    /// Aggregate statistics.
    pub stats: EngagementStats,
}

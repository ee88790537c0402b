//! Serializable mutation intents.
//!
//! UI collaborators send an [`Intent`] instead of calling methods directly.
//! The wire format is JSON with a snake_case `op` tag:
//!
//! ```json
//! {"op": "purchase_item", "item_id": "glasses"}
//! {"op": "record_emission", "category": "transport", "amount_kg": "3.5"}
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use respira_types::{
    ActiveMission, EmissionCategory, EmissionTotals, EquippedItems, ItemId, ItemKind, MissionId,
    MissionRecord,
};

use crate::error::EngagementError;
use crate::state::{EngagementState, PurchaseOutcome};

/// One mutation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Intent {
    /// Add kg CO2e to one category.
    RecordEmission {
        /// Target accumulator.
        category: EmissionCategory,
        /// Non-negative amount in kg.
        amount_kg: Decimal,
    },
    /// Credit XP.
    AwardPoints {
        /// Non-negative amount.
        amount: Decimal,
    },
    /// Buy an item at its catalog price.
    PurchaseItem {
        /// Catalog key.
        item_id: ItemId,
        /// Price the UI displayed. Informational only; the catalog wins.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        price: Option<Decimal>,
    },
    /// Equip or unequip an owned item.
    EquipItem {
        /// Catalog key.
        item_id: ItemId,
        /// Slot to act on.
        kind: ItemKind,
    },
    /// Start a mission.
    AcceptMission {
        /// Catalog key.
        mission_id: MissionId,
    },
    /// Set the active mission's progress.
    AdvanceMission {
        /// Ratio in `[0, 1]`.
        progress: Decimal,
    },
    /// Finish the active mission and collect its reward.
    CompleteMission,
    /// Give up on the active mission.
    AbandonMission,
}

impl Intent {
    /// The `op` tag, for logging.
    pub const fn op(&self) -> &'static str {
        match self {
            Self::RecordEmission { .. } => "record_emission",
            Self::AwardPoints { .. } => "award_points",
            Self::PurchaseItem { .. } => "purchase_item",
            Self::EquipItem { .. } => "equip_item",
            Self::AcceptMission { .. } => "accept_mission",
            Self::AdvanceMission { .. } => "advance_mission",
            Self::CompleteMission => "complete_mission",
            Self::AbandonMission => "abandon_mission",
        }
    }
}

/// What a successful intent returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum IntentOutcome {
    /// Updated emission accumulators.
    Emissions {
        /// All three totals.
        totals: EmissionTotals,
    },
    /// Updated balance.
    Balance {
        /// Spendable XP.
        balance: Decimal,
    },
    /// Purchase result.
    Purchase {
        /// Purchased or already owned.
        outcome: PurchaseOutcome,
    },
    /// Updated equip map.
    Equipped {
        /// Both slots.
        equipped: EquippedItems,
    },
    /// The mission now in the active slot.
    ActiveMission {
        /// Mission copy plus progress.
        mission: ActiveMission,
    },
    /// The mission that just left the active slot.
    MissionClosed {
        /// History record.
        record: MissionRecord,
    },
}

impl EngagementState {
    /// Run one intent against the state.
    ///
    /// # Errors
    ///
    /// Returns whatever the underlying operation returns.
    pub fn apply(&mut self, intent: Intent) -> Result<IntentOutcome, EngagementError> {
        match intent {
            Intent::RecordEmission { category, amount_kg } => self
                .record_emission(category, amount_kg)
                .map(|totals| IntentOutcome::Emissions { totals }),
            Intent::AwardPoints { amount } => self
                .award_points(amount)
                .map(|balance| IntentOutcome::Balance { balance }),
            Intent::PurchaseItem { item_id, price } => {
                if let Some(quoted) = price {
                    let listed = self.catalogs().items.get(&item_id).map(|i| i.price);
                    if listed.is_some_and(|listed| listed != quoted) {
                        warn!(
                            item = %item_id,
                            %quoted,
                            listed = ?listed,
                            "Caller price differs from catalog; using catalog price"
                        );
                    }
                }
                self.purchase_item(&item_id)
                    .map(|outcome| IntentOutcome::Purchase { outcome })
            }
            Intent::EquipItem { item_id, kind } => self
                .equip_item(&item_id, kind)
                .map(|equipped| IntentOutcome::Equipped { equipped }),
            Intent::AcceptMission { mission_id } => self
                .accept_mission(&mission_id)
                .map(|mission| IntentOutcome::ActiveMission { mission }),
            Intent::AdvanceMission { progress } => self
                .advance_mission_progress(progress)
                .map(|mission| IntentOutcome::ActiveMission { mission }),
            Intent::CompleteMission => self
                .complete_mission()
                .map(|record| IntentOutcome::MissionClosed { record }),
            Intent::AbandonMission => self
                .abandon_mission()
                .map(|record| IntentOutcome::MissionClosed { record }),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::config::StoreConfig;
    use crate::starting_catalog::starting_catalogs;

    #[test]
    fn parses_wire_format() {
        let intent: Intent =
            serde_json::from_str(r#"{"op":"purchase_item","item_id":"glasses"}"#).unwrap();
        assert_eq!(
            intent,
            Intent::PurchaseItem {
                item_id: ItemId::from("glasses"),
                price: None,
            }
        );

        let intent: Intent =
            serde_json::from_str(r#"{"op":"record_emission","category":"transportation","amount_kg":3.5}"#)
                .unwrap();
        assert_eq!(
            intent,
            Intent::RecordEmission {
                category: EmissionCategory::Transport,
                amount_kg: Decimal::new(35, 1),
            }
        );

        let intent: Intent = serde_json::from_str(r#"{"op":"complete_mission"}"#).unwrap();
        assert_eq!(intent.op(), "complete_mission");
    }

    #[test]
    fn unknown_op_rejected() {
        let result = serde_json::from_str::<Intent>(r#"{"op":"reset_everything"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn intents_round_trip() {
        let intents = vec![
            Intent::AwardPoints { amount: Decimal::new(50, 0) },
            Intent::EquipItem {
                item_id: ItemId::from("hat"),
                kind: ItemKind::Accessory,
            },
            Intent::AdvanceMission { progress: Decimal::new(5, 1) },
            Intent::AbandonMission,
        ];
        for intent in intents {
            let json = serde_json::to_string(&intent).unwrap();
            let back: Intent = serde_json::from_str(&json).unwrap();
            assert_eq!(back, intent);
        }
    }

    #[test]
    fn caller_price_is_ignored() {
        let catalogs = Arc::new(starting_catalogs().unwrap());
        let mut state = EngagementState::new(&StoreConfig::default(), catalogs).unwrap();
        let outcome = state
            .apply(Intent::PurchaseItem {
                item_id: ItemId::from("hat"),
                price: Some(Decimal::ONE),
            })
            .unwrap();
        assert_eq!(
            outcome,
            IntentOutcome::Purchase {
                outcome: PurchaseOutcome::Purchased {
                    price: Decimal::new(350, 0),
                    balance: Decimal::new(900, 0),
                }
            }
        );
    }

    #[test]
    fn outcome_serializes_with_result_tag() {
        let outcome = IntentOutcome::Balance {
            balance: Decimal::new(1050, 0),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["result"], "balance");
        assert_eq!(json["balance"], "1050");
    }
}

//! Shared type definitions for the Respira+ engagement core.
//!
//! This crate is the single source of truth for the values that cross the
//! boundary between the engagement store and its UI collaborators. Types
//! defined here flow downstream to `TypeScript` via `ts-rs` for the mobile
//! client.
//!
//! # Modules
//!
//! - [`ids`] -- UUID journal identifiers and string catalog keys
//! - [`enums`] -- Emission categories, difficulty tiers, item kinds, ledger entry types
//! - [`structs`] -- Catalog entries, ledger records and the engagement snapshot

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::{
    DifficultyTier, EmissionCategory, ItemKind, MissionOutcome, PointEntryType, UnknownCategory,
};
pub use ids::{EmissionRecordId, ItemId, MissionId, PointEntryId};
pub use structs::{
    ActiveMission, EmissionRecord, EmissionTotals, EngagementSnapshot, EngagementStats,
    EquippedItems, Item, Mission, MissionRecord, PointEntry,
};

#[cfg(test)]
mod tests {
    //! `TypeScript` binding generation.

    #[test]
    fn export_bindings() {
        // Writes one `.ts` file per type into `bindings/` relative to the
        // crate root.
        use ts_rs::TS;

        // IDs
        let _ = crate::ids::PointEntryId::export_all();
        let _ = crate::ids::EmissionRecordId::export_all();
        let _ = crate::ids::ItemId::export_all();
        let _ = crate::ids::MissionId::export_all();

        // Enums
        let _ = crate::enums::EmissionCategory::export_all();
        let _ = crate::enums::DifficultyTier::export_all();
        let _ = crate::enums::MissionOutcome::export_all();
        let _ = crate::enums::ItemKind::export_all();
        let _ = crate::enums::PointEntryType::export_all();

        // Structs
        let _ = crate::structs::Mission::export_all();
        let _ = crate::structs::Item::export_all();
        let _ = crate::structs::EmissionTotals::export_all();
        let _ = crate::structs::EmissionRecord::export_all();
        let _ = crate::structs::PointEntry::export_all();
        let _ = crate::structs::ActiveMission::export_all();
        let _ = crate::structs::MissionRecord::export_all();
        let _ = crate::structs::EquippedItems::export_all();
        let _ = crate::structs::EngagementStats::export_all();
        let _ = crate::structs::EngagementSnapshot::export_all();
    }
}

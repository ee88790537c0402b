//! Engagement state store for the Respira+ client.
//!
//! This crate is the single authority over a session's engagement state:
//! emission totals, the XP balance, the active mission and the mascot's
//! wardrobe. It performs no I/O. UI collaborators read snapshots and send
//! intents; network collaborators (the calculation client) call in with
//! already-computed values.
//!
//! # Modules
//!
//! - [`catalog`] -- Read-only mission and item tables ([`Catalogs`])
//! - [`config`] -- YAML configuration ([`EngagementConfig`], [`StoreConfig`])
//! - [`error`] -- Error type for all store operations ([`EngagementError`])
//! - [`intent`] -- Serializable mutation requests ([`Intent`], [`IntentOutcome`])
//! - [`mission`] -- Active mission slot and history ([`MissionSlot`])
//! - [`starting_catalog`] -- The built-in missions and shop items
//! - [`state`] -- Single-writer model ([`EngagementState`])
//! - [`store`] -- Thread-safe handle with snapshot publishing ([`EngagementStore`])
//! - [`wardrobe`] -- Owned and equipped cosmetics ([`Wardrobe`])
//!
//! # Invariants
//!
//! - The balance never goes negative; overdrafts are rejected, not clamped.
//! - An item is never bought twice; re-purchase is a no-op success.
//! - At most one mission is active; a second accept is rejected.
//! - The default background is always owned and every equipped id is owned.

pub mod catalog;
pub mod config;
pub mod error;
pub mod intent;
pub mod mission;
pub mod starting_catalog;
pub mod state;
pub mod store;
pub mod wardrobe;

pub use catalog::{CatalogError, Catalogs, ItemCatalog, MissionCatalog};
pub use config::{
    CALCULATOR_URL_ENV, CalculatorConfig, ConfigError, EngagementConfig, InitialMission,
    LoggingConfig, StoreConfig,
};
pub use error::EngagementError;
pub use intent::{Intent, IntentOutcome};
pub use mission::MissionSlot;
pub use starting_catalog::{DEFAULT_BACKGROUND, starting_catalogs, starting_items, starting_missions};
pub use state::{EngagementState, PurchaseOutcome};
pub use store::EngagementStore;
pub use wardrobe::Wardrobe;

// Audit results surface through the store API.
pub use respira_ledger::{LedgerAnomaly, SolvencyResult};

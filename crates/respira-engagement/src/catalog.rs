//! Read-only reference tables: missions and shop items.
//!
//! Catalogs are validated once at construction and never change for the
//! life of the store. The store holds them behind an [`Arc`](std::sync::Arc)
//! so snapshots and collaborators can share them without copying.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use respira_types::{DifficultyTier, Item, ItemId, ItemKind, Mission, MissionId};

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Two missions share a key.
    #[error("duplicate mission id: {0}")]
    DuplicateMission(MissionId),

    /// Two items share a key.
    #[error("duplicate item id: {0}")]
    DuplicateItem(ItemId),

    /// A mission pays a negative reward.
    #[error("mission {id} has a negative reward: {reward}")]
    NegativeReward {
        /// Offending mission.
        id: MissionId,
        /// The reward.
        reward: Decimal,
    },

    /// An item has a negative price.
    #[error("item {id} has a negative price: {price}")]
    NegativePrice {
        /// Offending item.
        id: ItemId,
        /// The price.
        price: Decimal,
    },

    /// The designated default background is missing or is not a free
    /// background.
    #[error("invalid default background {id}: {reason}")]
    InvalidDefaultBackground {
        /// The designated key.
        id: ItemId,
        /// What is wrong with it.
        reason: &'static str,
    },
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Fixed set of missions keyed by id.
#[derive(Debug, Clone, Default)]
pub struct MissionCatalog {
    missions: BTreeMap<MissionId, Mission>,
}

impl MissionCatalog {
    /// Build a catalog, rejecting duplicate keys and negative rewards.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateMission`] or
    /// [`CatalogError::NegativeReward`].
    pub fn new(missions: impl IntoIterator<Item = Mission>) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for mission in missions {
            if mission.point_reward < Decimal::ZERO {
                return Err(CatalogError::NegativeReward {
                    id: mission.id,
                    reward: mission.point_reward,
                });
            }
            if map.contains_key(&mission.id) {
                return Err(CatalogError::DuplicateMission(mission.id));
            }
            map.insert(mission.id.clone(), mission);
        }
        Ok(Self { missions: map })
    }

    /// Look up a mission.
    pub fn get(&self, id: &MissionId) -> Option<&Mission> {
        self.missions.get(id)
    }

    /// All missions, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &Mission> {
        self.missions.values()
    }

    /// Missions of one difficulty tier, ordered by key.
    pub fn by_difficulty(&self, tier: DifficultyTier) -> impl Iterator<Item = &Mission> {
        self.missions.values().filter(move |m| m.difficulty == tier)
    }

    /// Number of missions.
    pub fn len(&self) -> usize {
        self.missions.len()
    }

    /// Whether the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.missions.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Items
// ---------------------------------------------------------------------------

/// Fixed set of shop items keyed by id, with one designated free default
/// background that every user owns.
#[derive(Debug, Clone)]
pub struct ItemCatalog {
    items: BTreeMap<ItemId, Item>,
    default_background: ItemId,
}

impl ItemCatalog {
    /// Build a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::DuplicateItem`], [`CatalogError::NegativePrice`],
    /// or [`CatalogError::InvalidDefaultBackground`] if `default_background`
    /// is absent, not a background, or not free.
    pub fn new(
        items: impl IntoIterator<Item = Item>,
        default_background: ItemId,
    ) -> Result<Self, CatalogError> {
        let mut map = BTreeMap::new();
        for item in items {
            if item.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice {
                    id: item.id,
                    price: item.price,
                });
            }
            if map.contains_key(&item.id) {
                return Err(CatalogError::DuplicateItem(item.id));
            }
            map.insert(item.id.clone(), item);
        }

        let Some(default) = map.get(&default_background) else {
            return Err(CatalogError::InvalidDefaultBackground {
                id: default_background,
                reason: "not in catalog",
            });
        };
        if default.kind != ItemKind::Background {
            return Err(CatalogError::InvalidDefaultBackground {
                id: default_background,
                reason: "not a background",
            });
        }
        if !default.price.is_zero() {
            return Err(CatalogError::InvalidDefaultBackground {
                id: default_background,
                reason: "price must be zero",
            });
        }

        Ok(Self {
            items: map,
            default_background,
        })
    }

    /// Look up an item.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.get(id)
    }

    /// The always-owned default background.
    pub const fn default_background(&self) -> &ItemId {
        &self.default_background
    }

    /// All items, ordered by key.
    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    /// Items of one kind, ordered by key.
    pub fn by_kind(&self, kind: ItemKind) -> impl Iterator<Item = &Item> {
        self.items.values().filter(move |i| i.kind == kind)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the catalog is empty. Never true for a valid catalog.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Both reference tables, shared by the store and its collaborators.
#[derive(Debug, Clone)]
pub struct Catalogs {
    /// Mission definitions.
    pub missions: MissionCatalog,
    /// Shop items.
    pub items: ItemCatalog,
}

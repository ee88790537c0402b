//! Owned and equipped cosmetics for the mascot.
//!
//! The wardrobe always owns the default background, and every equipped id
//! is owned. Both invariants hold after every public call.

use std::collections::BTreeSet;

use respira_types::{EquippedItems, Item, ItemId, ItemKind};

use crate::error::EngagementError;

/// Ownership set plus the per-slot equip map.
#[derive(Debug, Clone)]
pub struct Wardrobe {
    owned: BTreeSet<ItemId>,
    equipped: EquippedItems,
    default_background: ItemId,
}

impl Wardrobe {
    /// A wardrobe that owns and shows only `default_background`.
    pub fn new(default_background: ItemId) -> Self {
        let mut owned = BTreeSet::new();
        owned.insert(default_background.clone());
        Self {
            owned,
            equipped: EquippedItems::with_background(default_background.clone()),
            default_background,
        }
    }

    /// Whether `item` is owned.
    pub fn is_owned(&self, item: &ItemId) -> bool {
        self.owned.contains(item)
    }

    /// Owned item keys.
    pub const fn owned(&self) -> &BTreeSet<ItemId> {
        &self.owned
    }

    /// Current equip map.
    pub const fn equipped(&self) -> &EquippedItems {
        &self.equipped
    }

    /// Add `item` to the owned set. Returns `false` if it was already owned.
    pub fn grant(&mut self, item: ItemId) -> bool {
        self.owned.insert(item)
    }

    /// Equip `item` in the slot for `kind`, or unequip it if it already
    /// occupies that slot.
    ///
    /// Unequipping the accessory empties the slot; unequipping a background
    /// falls back to the default background. Returns whether the equip map
    /// changed; toggling the default background while it is equipped does
    /// not.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::InvalidInput`] if `kind` does not match
    /// the item's catalog kind, or [`EngagementError::NotOwned`].
    pub fn equip(&mut self, item: &Item, kind: ItemKind) -> Result<bool, EngagementError> {
        if item.kind != kind {
            return Err(EngagementError::invalid(format!(
                "item {} is a {}, not a {kind}",
                item.id, item.kind
            )));
        }
        if !self.is_owned(&item.id) {
            return Err(EngagementError::NotOwned {
                item: item.id.clone(),
            });
        }

        let previous = self.equipped.clone();
        let toggling_off = self.equipped.slot(kind) == Some(&item.id);
        match (kind, toggling_off) {
            (ItemKind::Accessory, true) => self.equipped.accessory = None,
            (ItemKind::Accessory, false) => self.equipped.accessory = Some(item.id.clone()),
            (ItemKind::Background, true) => {
                self.equipped.background = self.default_background.clone();
            }
            (ItemKind::Background, false) => self.equipped.background = item.id.clone(),
        }
        Ok(self.equipped != previous)
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: &str, kind: ItemKind) -> Item {
        Item {
            id: ItemId::from(id),
            kind,
            display_name: id.to_owned(),
            price: Decimal::new(100, 0),
        }
    }

    #[test]
    fn starts_with_default_background() {
        let wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        assert!(wardrobe.is_owned(&ItemId::from("bg_default")));
        assert_eq!(wardrobe.equipped().background, ItemId::from("bg_default"));
        assert_eq!(wardrobe.equipped().accessory, None);
    }

    #[test]
    fn accessory_toggles() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let glasses = item("glasses", ItemKind::Accessory);
        assert!(wardrobe.grant(glasses.id.clone()));

        assert!(matches!(wardrobe.equip(&glasses, ItemKind::Accessory), Ok(true)));
        assert_eq!(wardrobe.equipped().accessory, Some(ItemId::from("glasses")));

        assert!(matches!(wardrobe.equip(&glasses, ItemKind::Accessory), Ok(true)));
        assert_eq!(wardrobe.equipped().accessory, None);
    }

    #[test]
    fn accessory_replaces_previous() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let glasses = item("glasses", ItemKind::Accessory);
        let hat = item("hat", ItemKind::Accessory);
        wardrobe.grant(glasses.id.clone());
        wardrobe.grant(hat.id.clone());
        let _ = wardrobe.equip(&glasses, ItemKind::Accessory);
        let _ = wardrobe.equip(&hat, ItemKind::Accessory);
        assert_eq!(wardrobe.equipped().accessory, Some(ItemId::from("hat")));
    }

    #[test]
    fn background_toggle_reverts_to_default() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let purple = item("bg_purple", ItemKind::Background);
        wardrobe.grant(purple.id.clone());
        let _ = wardrobe.equip(&purple, ItemKind::Background);
        assert_eq!(wardrobe.equipped().background, ItemId::from("bg_purple"));
        let _ = wardrobe.equip(&purple, ItemKind::Background);
        assert_eq!(wardrobe.equipped().background, ItemId::from("bg_default"));
    }

    #[test]
    fn toggling_equipped_default_background_changes_nothing() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let default = item("bg_default", ItemKind::Background);
        let before = wardrobe.equipped().clone();
        assert!(matches!(wardrobe.equip(&default, ItemKind::Background), Ok(false)));
        assert_eq!(wardrobe.equipped(), &before);
    }

    #[test]
    fn unowned_item_rejected() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let hat = item("hat", ItemKind::Accessory);
        let result = wardrobe.equip(&hat, ItemKind::Accessory);
        assert!(matches!(result, Err(EngagementError::NotOwned { .. })));
        assert_eq!(wardrobe.equipped().accessory, None);
    }

    #[test]
    fn kind_mismatch_rejected() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        let hat = item("hat", ItemKind::Accessory);
        wardrobe.grant(hat.id.clone());
        let result = wardrobe.equip(&hat, ItemKind::Background);
        assert!(matches!(result, Err(EngagementError::InvalidInput { .. })));
    }

    #[test]
    fn grant_is_idempotent() {
        let mut wardrobe = Wardrobe::new(ItemId::from("bg_default"));
        assert!(wardrobe.grant(ItemId::from("hat")));
        assert!(!wardrobe.grant(ItemId::from("hat")));
        assert_eq!(wardrobe.owned().len(), 2);
    }
}

//! Enumeration types for the engagement core.
//!
//! Wire names are `snake_case` to match the mobile client and the
//! calculation service (`"transport"`, `"accessory"`, `"mission_reward"`).

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

// ---------------------------------------------------------------------------
// Emission categories
// ---------------------------------------------------------------------------

/// One of the three emission accumulators.
///
/// The calculation service reports transport emissions as
/// `"transportation"`; that spelling is accepted as an alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum EmissionCategory {
    /// Commuting and travel.
    #[serde(alias = "transportation")]
    Transport,
    /// Household electricity, gas and heating oil.
    Energy,
    /// Diet.
    Food,
}

impl EmissionCategory {
    /// Every category, in display order.
    pub const ALL: [Self; 3] = [Self::Transport, Self::Energy, Self::Food];

    /// The canonical wire name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Energy => "energy",
            Self::Food => "food",
        }
    }
}

impl fmt::Display for EmissionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string does not name a known emission category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown emission category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for EmissionCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "transport" | "transportation" => Ok(Self::Transport),
            "energy" => Ok(Self::Energy),
            "food" => Ok(Self::Food),
            _ => Err(UnknownCategory(s.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Missions
// ---------------------------------------------------------------------------

/// Difficulty tier of a mission. Drives the badge colour in the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum DifficultyTier {
    /// Quick wins.
    Easy,
    /// A day of effort.
    Medium,
    /// Requires planning or other people.
    Hard,
}

impl DifficultyTier {
    /// Every tier, easiest first.
    pub const ALL: [Self; 3] = [Self::Easy, Self::Medium, Self::Hard];
}

impl fmt::Display for DifficultyTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        })
    }
}

/// How a mission left the active slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum MissionOutcome {
    /// The user finished the mission and was paid its reward.
    Completed,
    /// The user gave up; no reward.
    Abandoned,
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// The equip slot a cosmetic item occupies on the mascot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ItemKind {
    /// Worn by the mascot (glasses, hats). Slot may be empty.
    Accessory,
    /// Backdrop gradient. Slot is never empty.
    #[serde(alias = "bg")]
    Background,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accessory => f.write_str("accessory"),
            Self::Background => f.write_str("background"),
        }
    }
}

// ---------------------------------------------------------------------------
// Point ledger
// ---------------------------------------------------------------------------

/// Category of a point ledger entry.
///
/// | Type | Direction |
/// |------|-----------|
/// | Opening | credit |
/// | Award | credit |
/// | `MissionReward` | credit |
/// | Purchase | debit |
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum PointEntryType {
    /// Starting balance granted when the session begins.
    Opening,
    /// Points earned through the app (logging, streaks, promotions).
    Award,
    /// Reward paid for completing a mission.
    MissionReward,
    /// Points spent in the shop.
    Purchase,
}

impl PointEntryType {
    /// Returns `true` if entries of this type increase the balance.
    pub const fn is_credit(self) -> bool {
        match self {
            Self::Opening | Self::Award | Self::MissionReward => true,
            Self::Purchase => false,
        }
    }
}

//! The active mission slot and the closed-mission history.
//!
//! The slot is a two-state machine:
//!
//! ```text
//! NONE --accept--> ACTIVE --advance--> ACTIVE
//!                  ACTIVE --complete/abandon--> NONE
//! ```
//!
//! Accepting is only legal from `NONE`. Closing a mission appends a
//! [`MissionRecord`]; the history is append-only.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use respira_types::{ActiveMission, Mission, MissionOutcome, MissionRecord};

use crate::error::EngagementError;

/// At most one active mission plus every mission closed this session.
#[derive(Debug, Clone, Default)]
pub struct MissionSlot {
    active: Option<ActiveMission>,
    history: Vec<MissionRecord>,
}

impl MissionSlot {
    /// An empty slot with no history.
    pub const fn new() -> Self {
        Self {
            active: None,
            history: Vec::new(),
        }
    }

    /// The mission in progress, if any.
    pub const fn active(&self) -> Option<&ActiveMission> {
        self.active.as_ref()
    }

    /// Closed missions, oldest first.
    pub fn history(&self) -> &[MissionRecord] {
        &self.history
    }

    /// Number of closed missions with the given outcome.
    pub fn count(&self, outcome: MissionOutcome) -> u32 {
        let n = self.history.iter().filter(|r| r.outcome == outcome).count();
        u32::try_from(n).unwrap_or(u32::MAX)
    }

    /// Put a copy of `mission` in the slot with zero progress.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::MissionAlreadyActive`] if the slot is
    /// occupied; the active mission is left untouched.
    pub fn accept(
        &mut self,
        mission: &Mission,
        now: DateTime<Utc>,
    ) -> Result<&ActiveMission, EngagementError> {
        if let Some(current) = &self.active {
            return Err(EngagementError::MissionAlreadyActive {
                active: current.mission.id.clone(),
                requested: mission.id.clone(),
            });
        }
        Ok(&*self.active.insert(ActiveMission {
            mission: mission.clone(),
            progress: Decimal::ZERO,
            accepted_at: now,
        }))
    }

    /// Set the progress ratio of the active mission.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`] or
    /// [`EngagementError::InvalidInput`] if `progress` is outside `[0, 1]`.
    pub fn advance(&mut self, progress: Decimal) -> Result<&ActiveMission, EngagementError> {
        if progress < Decimal::ZERO || progress > Decimal::ONE {
            return Err(EngagementError::invalid(format!(
                "progress must lie in [0, 1], got {progress}"
            )));
        }
        let active = self.active.as_mut().ok_or(EngagementError::NoActiveMission)?;
        active.progress = progress;
        Ok(&*active)
    }

    /// Empty the slot and append a history record.
    ///
    /// `points_awarded` is whatever the caller credited; the slot itself
    /// never touches the balance.
    ///
    /// # Errors
    ///
    /// Returns [`EngagementError::NoActiveMission`] if the slot is empty.
    pub fn close(
        &mut self,
        outcome: MissionOutcome,
        points_awarded: Decimal,
        now: DateTime<Utc>,
    ) -> Result<&MissionRecord, EngagementError> {
        let active = self.active.take().ok_or(EngagementError::NoActiveMission)?;
        self.history.push(MissionRecord {
            mission_id: active.mission.id,
            title: active.mission.title,
            outcome,
            final_progress: active.progress,
            points_awarded,
            accepted_at: active.accepted_at,
            closed_at: now,
        });
        self.history.last().ok_or(EngagementError::Unavailable("history empty after push"))
    }
}

#[cfg(test)]
mod tests {
    use respira_types::{DifficultyTier, MissionId};

    use super::*;

    fn mission(id: &str) -> Mission {
        Mission {
            id: MissionId::from(id),
            title: id.to_owned(),
            description: String::new(),
            point_reward: Decimal::new(80, 0),
            difficulty: DifficultyTier::Easy,
            icon: "shower".to_owned(),
            color_tag: "green".to_owned(),
            duration: None,
        }
    }

    #[test]
    fn accept_sets_zero_progress() {
        let mut slot = MissionSlot::new();
        let active = slot.accept(&mission("banho_flash"), Utc::now()).map(|a| a.progress);
        assert_eq!(active.ok(), Some(Decimal::ZERO));
    }

    #[test]
    fn second_accept_rejected_and_first_kept() {
        let mut slot = MissionSlot::new();
        let _ = slot.accept(&mission("m1"), Utc::now());
        let _ = slot.advance(Decimal::new(5, 1));
        let result = slot.accept(&mission("m2"), Utc::now());
        assert!(matches!(
            result,
            Err(EngagementError::MissionAlreadyActive { ref active, .. }) if active.as_str() == "m1"
        ));
        let current = slot.active().map(|a| (a.mission.id.clone(), a.progress));
        assert_eq!(current, Some((MissionId::from("m1"), Decimal::new(5, 1))));
    }

    #[test]
    fn advance_requires_active_mission() {
        let mut slot = MissionSlot::new();
        assert!(matches!(
            slot.advance(Decimal::new(5, 1)),
            Err(EngagementError::NoActiveMission)
        ));
    }

    #[test]
    fn advance_rejects_out_of_range() {
        let mut slot = MissionSlot::new();
        let _ = slot.accept(&mission("m1"), Utc::now());
        assert!(matches!(
            slot.advance(Decimal::new(11, 1)),
            Err(EngagementError::InvalidInput { .. })
        ));
        assert!(matches!(
            slot.advance(Decimal::new(-1, 1)),
            Err(EngagementError::InvalidInput { .. })
        ));
        assert_eq!(slot.active().map(|a| a.progress), Some(Decimal::ZERO));
    }

    #[test]
    fn close_frees_slot_and_records_history() {
        let mut slot = MissionSlot::new();
        let _ = slot.accept(&mission("m1"), Utc::now());
        let _ = slot.advance(Decimal::ONE);
        let record = slot
            .close(MissionOutcome::Completed, Decimal::new(80, 0), Utc::now())
            .map(|r| (r.outcome, r.final_progress));
        assert_eq!(record.ok(), Some((MissionOutcome::Completed, Decimal::ONE)));
        assert!(slot.active().is_none());
        assert_eq!(slot.count(MissionOutcome::Completed), 1);
        assert_eq!(slot.count(MissionOutcome::Abandoned), 0);

        // Slot is free again.
        assert!(slot.accept(&mission("m2"), Utc::now()).is_ok());
    }

    #[test]
    fn close_requires_active_mission() {
        let mut slot = MissionSlot::new();
        let result = slot.close(MissionOutcome::Abandoned, Decimal::ZERO, Utc::now());
        assert!(matches!(result, Err(EngagementError::NoActiveMission)));
        assert!(slot.history().is_empty());
    }
}

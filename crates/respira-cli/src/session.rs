//! Line-by-line session driver.
//!
//! Each input line is one JSON object with an `op` tag. Store intents
//! (`purchase_item`, `accept_mission`, ...) go straight to
//! [`EngagementStore::dispatch`]. A few ops exist only here:
//!
//! - `log_activity` -- calculate remotely, then record
//! - `snapshot` -- print the latest snapshot
//! - `audit` -- replay the point ledger
//! - `emissions_since` -- totals over the last `days` days
//! - `catalog` -- missions by difficulty and shop items by kind
//! - `journal` -- point ledger entries and emission records
//!
//! Every line produces exactly one output record:
//! `{"ok": true, "op": ..., "outcome": ...}` or
//! `{"ok": false, "op": ..., "error": {"code": ..., "message": ...}}`.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use respira_calculator::{Activity, CalculatorClient, log_activity};
use respira_engagement::{EngagementStore, Intent, SolvencyResult};
use respira_types::{DifficultyTier, ItemKind};

use crate::error::LineError;

/// Ops handled by the session itself rather than the store.
#[derive(Debug, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
enum SessionCommand {
    LogActivity { activity: Activity },
    Snapshot,
    Audit,
    EmissionsSince { days: u32 },
    Catalog,
    Journal,
}

const SESSION_OPS: [&str; 6] = [
    "log_activity",
    "snapshot",
    "audit",
    "emissions_since",
    "catalog",
    "journal",
];

/// A running session: one store, one calculator client.
pub struct Session {
    store: Arc<EngagementStore>,
    calculator: CalculatorClient,
}

impl Session {
    /// Create a session over a shared store.
    pub const fn new(store: Arc<EngagementStore>, calculator: CalculatorClient) -> Self {
        Self { store, calculator }
    }

    /// Handle one input line and build its output record.
    pub async fn handle_line(&self, line: &str) -> Value {
        let op = serde_json::from_str::<Value>(line)
            .ok()
            .and_then(|v| v.get("op").and_then(Value::as_str).map(ToOwned::to_owned))
            .unwrap_or_default();

        match self.run(line, &op).await {
            Ok(outcome) => json!({ "ok": true, "op": op, "outcome": outcome }),
            Err(e) => {
                tracing::debug!(%op, code = e.code(), error = %e, "Line failed");
                json!({
                    "ok": false,
                    "op": op,
                    "error": { "code": e.code(), "message": e.to_string() },
                })
            }
        }
    }

    async fn run(&self, line: &str, op: &str) -> Result<Value, LineError> {
        if SESSION_OPS.contains(&op) {
            let command: SessionCommand = serde_json::from_str(line)?;
            return self.run_command(command).await;
        }
        let intent: Intent = serde_json::from_str(line)?;
        let outcome = self.store.dispatch(intent)?;
        Ok(serde_json::to_value(outcome)?)
    }

    async fn run_command(&self, command: SessionCommand) -> Result<Value, LineError> {
        match command {
            SessionCommand::LogActivity { activity } => {
                let logged = log_activity(&self.calculator, &self.store, &activity).await?;
                Ok(serde_json::to_value(logged)?)
            }
            SessionCommand::Snapshot => Ok(serde_json::to_value(&*self.store.snapshot())?),
            SessionCommand::Audit => {
                let result = self.store.audit()?;
                Ok(match result {
                    SolvencyResult::Solvent => json!({ "solvent": true }),
                    SolvencyResult::Anomaly(anomaly) => json!({
                        "solvent": false,
                        "message": anomaly.message,
                    }),
                })
            }
            SessionCommand::EmissionsSince { days } => {
                let cutoff = TimeDelta::try_days(i64::from(days))
                    .and_then(|window| Utc::now().checked_sub_signed(window))
                    .ok_or(LineError::WindowOutOfRange { days })?;
                let totals = self.store.emissions_since(cutoff)?;
                Ok(serde_json::to_value(totals)?)
            }
            SessionCommand::Catalog => {
                let missions = self.store.missions();
                let items = self.store.items();
                let mut by_tier = serde_json::Map::new();
                for tier in DifficultyTier::ALL {
                    let listed: Vec<_> = missions.by_difficulty(tier).collect();
                    by_tier.insert(tier.to_string(), serde_json::to_value(listed)?);
                }
                let accessories: Vec<_> = items.by_kind(ItemKind::Accessory).collect();
                let backgrounds: Vec<_> = items.by_kind(ItemKind::Background).collect();
                Ok(json!({
                    "missions": by_tier,
                    "items": {
                        "accessory": accessories,
                        "background": backgrounds,
                    },
                    "default_background": items.default_background(),
                }))
            }
            SessionCommand::Journal => {
                let points = self.store.point_entries()?;
                let emissions = self.store.emission_records()?;
                Ok(json!({ "points": points, "emissions": emissions }))
            }
        }
    }
}

//! Request and response bodies of the calculation API.
//!
//! ```text
//! POST /api/calculate/transport  {"transport_type": "car",  "distance_km": 12.5}
//! POST /api/calculate/energy     {"energy_type": "electricity", "consumption": 150}
//! POST /api/calculate/food       {"diet_type": "vegetarian", "days": 7}
//!
//! 200 {"emissions_kg": 2.5, "category": "transportation"}
//! ```
//!
//! The factor names (`car`, `electricity`, `vegetarian`, ...) are passed
//! through untouched; the service owns the factor tables and answers 400 for
//! names it does not know.

use serde::{Deserialize, Serialize};

use respira_types::EmissionCategory;

use crate::error::CalculatorError;

/// One loggable activity, tagged by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "category", rename_all = "snake_case")]
pub enum Activity {
    /// A trip.
    Transport(TransportRequest),
    /// Household energy use.
    Energy(EnergyRequest),
    /// Days on a given diet.
    Food(FoodRequest),
}

impl Activity {
    /// Emission category this activity is booked under.
    pub const fn category(&self) -> EmissionCategory {
        match self {
            Self::Transport(_) => EmissionCategory::Transport,
            Self::Energy(_) => EmissionCategory::Energy,
            Self::Food(_) => EmissionCategory::Food,
        }
    }

    /// Path of the endpoint, relative to the base URL.
    pub const fn path(&self) -> &'static str {
        match self {
            Self::Transport(_) => "/api/calculate/transport",
            Self::Energy(_) => "/api/calculate/energy",
            Self::Food(_) => "/api/calculate/food",
        }
    }
}

/// Body of `POST /api/calculate/transport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportRequest {
    /// Vehicle factor name, e.g. `car`, `bus`, `plane`.
    pub transport_type: String,
    /// Distance travelled.
    pub distance_km: f64,
}

/// Body of `POST /api/calculate/energy`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergyRequest {
    /// Energy source factor name, e.g. `electricity`, `natural_gas`.
    pub energy_type: String,
    /// Consumption in the source's unit (kWh, m3, ...).
    pub consumption: f64,
}

/// Body of `POST /api/calculate/food`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodRequest {
    /// Diet factor name, e.g. `vegan`, `meat_heavy`.
    pub diet_type: String,
    /// Number of days on the diet.
    pub days: u32,
}

/// Successful response of any calculation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResponse {
    /// Calculated kg CO2e.
    pub emissions_kg: f64,
    /// Category label; transport comes back as `transportation`.
    pub category: String,
}

impl CalculationResponse {
    /// Parse the category label.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::UnknownCategory`] for labels outside the
    /// known set.
    pub fn parsed_category(&self) -> Result<EmissionCategory, CalculatorError> {
        self.category
            .parse()
            .map_err(|_| CalculatorError::UnknownCategory(self.category.clone()))
    }

    /// Check that this response answers `activity`.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError::UnknownCategory`] or
    /// [`CalculatorError::CategoryMismatch`].
    pub fn check_answers(&self, activity: &Activity) -> Result<EmissionCategory, CalculatorError> {
        let actual = self.parsed_category()?;
        let expected = activity.category();
        if actual != expected {
            return Err(CalculatorError::CategoryMismatch { expected, actual });
        }
        Ok(actual)
    }
}

//! Calculate-then-record: the collaborator flow behind the calculator screen.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use respira_engagement::{EngagementError, EngagementStore};
use respira_ledger::quantity_from_f64;
use respira_types::{EmissionCategory, EmissionTotals};

use crate::client::CalculatorClient;
use crate::contract::{Activity, CalculationResponse};
use crate::error::CalculatorError;

/// A calculated activity that has been added to the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggedActivity {
    /// Accumulator the amount went into.
    pub category: EmissionCategory,
    /// Amount recorded, kg CO2e.
    pub emissions_kg: Decimal,
    /// All accumulators after the addition.
    pub totals: EmissionTotals,
}

/// Calculate `activity` remotely and record the result in `store`.
///
/// Nothing is recorded unless the service answered for the same category.
///
/// # Errors
///
/// Returns any [`CalculatorError`] from the request, a
/// [`CalculatorError::CategoryMismatch`], or
/// [`CalculatorError::Engagement`] if the store rejects the amount.
pub async fn log_activity(
    client: &CalculatorClient,
    store: &EngagementStore,
    activity: &Activity,
) -> Result<LoggedActivity, CalculatorError> {
    let response = client.calculate(activity).await?;
    record_response(store, activity, &response)
}

/// Record an already-received response for `activity`.
///
/// # Errors
///
/// Returns [`CalculatorError::UnknownCategory`],
/// [`CalculatorError::CategoryMismatch`] or
/// [`CalculatorError::Engagement`].
pub fn record_response(
    store: &EngagementStore,
    activity: &Activity,
    response: &CalculationResponse,
) -> Result<LoggedActivity, CalculatorError> {
    let category = response.check_answers(activity)?;
    let emissions_kg = quantity_from_f64(response.emissions_kg)
        .map_err(|e| EngagementError::invalid(e.to_string()))?;
    let totals = store.record_emission(category, emissions_kg)?;
    tracing::info!(%category, %emissions_kg, "Activity logged");
    Ok(LoggedActivity {
        category,
        emissions_kg,
        totals,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use respira_engagement::{StoreConfig, starting_catalogs};

    use super::*;
    use crate::contract::FoodRequest;

    fn store() -> EngagementStore {
        let catalogs = Arc::new(starting_catalogs().unwrap());
        EngagementStore::new(&StoreConfig::default(), catalogs).unwrap()
    }

    fn vegan_week() -> Activity {
        Activity::Food(FoodRequest {
            diet_type: "vegan".to_owned(),
            days: 7,
        })
    }

    #[test]
    fn matching_response_is_recorded() {
        let store = store();
        let response = CalculationResponse {
            emissions_kg: 10.08,
            category: "food".to_owned(),
        };
        let logged = record_response(&store, &vegan_week(), &response).unwrap();
        assert_eq!(logged.emissions_kg, Decimal::new(1008, 2));
        assert_eq!(logged.totals.food, Decimal::new(1008, 2));
        assert_eq!(store.snapshot().emissions.food, Decimal::new(1008, 2));
    }

    #[test]
    fn mismatched_response_records_nothing() {
        let store = store();
        let response = CalculationResponse {
            emissions_kg: 10.0,
            category: "energy".to_owned(),
        };
        let result = record_response(&store, &vegan_week(), &response);
        assert!(matches!(result, Err(CalculatorError::CategoryMismatch { .. })));
        assert_eq!(store.snapshot().revision, 0);
    }

    #[test]
    fn non_finite_amount_rejected_by_store() {
        let store = store();
        let response = CalculationResponse {
            emissions_kg: f64::INFINITY,
            category: "food".to_owned(),
        };
        let result = record_response(&store, &vegan_week(), &response);
        assert!(matches!(
            result,
            Err(CalculatorError::Engagement(EngagementError::InvalidInput { .. }))
        ));
        assert_eq!(store.snapshot().emissions.food, Decimal::ZERO);
    }
}

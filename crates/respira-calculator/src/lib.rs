//! Client for the Respira+ emission calculation service.
//!
//! The service turns an activity (a car trip, a month of electricity, a week
//! of a given diet) into kg CO2e. This crate consumes that contract and
//! feeds the result into the engagement store; it never computes emission
//! factors itself.
//!
//! # Modules
//!
//! - [`client`] -- [`CalculatorClient`], one `reqwest` call per activity
//! - [`contract`] -- Request and response bodies ([`Activity`], [`CalculationResponse`])
//! - [`error`] -- [`CalculatorError`]
//! - [`flow`] -- [`log_activity`]: calculate, check the category, record

pub mod client;
pub mod contract;
pub mod error;
pub mod flow;

pub use client::CalculatorClient;
pub use contract::{Activity, CalculationResponse, EnergyRequest, FoodRequest, TransportRequest};
pub use error::CalculatorError;
pub use flow::{LoggedActivity, log_activity, record_response};

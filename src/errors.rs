use crate::core::energy_supply::TechnologyMismatchError;
use crate::external_conditions::UnrepresentableYearError;
use smartstring::alias::String;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HbemError {
    #[error("Request was considered invalid due to error: {0}")]
    InvalidRequest(#[from] anyhow::Error),
    #[error("Building {building_id} violates the input contract: {reason}")]
    InputContract { building_id: String, reason: String },
    #[error("Error identified during calculation of building {building_id} at hour {hour}: {source}")]
    FailureInCalculation {
        building_id: String,
        hour: usize,
        #[source]
        source: CalculationError,
    },
}

impl HbemError {
    /// Identifier of the building whose run failed, where one is known.
    pub fn building_id(&self) -> Option<&str> {
        match self {
            HbemError::InvalidRequest(_) => None,
            HbemError::InputContract { building_id, .. }
            | HbemError::FailureInCalculation { building_id, .. } => Some(building_id.as_str()),
        }
    }
}

/// Errors raised inside the hourly loop. None of these are retried: the calculation is
/// deterministic, so the only remedy is correcting the input upstream.
#[derive(Debug, Error)]
pub enum CalculationError {
    #[error("No weather or occupancy sample was supplied for hour {hour}")]
    MissingSample { hour: usize },
    #[error("Numerical degeneracy: {0}")]
    NumericalDegeneracy(std::string::String),
    #[error("Thermal network stepped out of order: {0}")]
    StateMachineMisuse(std::string::String),
    #[error(transparent)]
    TechnologyMismatch(#[from] TechnologyMismatchError),
    #[error("Could not calculate sun position: {0}")]
    SunPosition(#[from] UnrepresentableYearError),
}

use crate::core::energy_supply::{
    EnergyConverter, SupplyOutput, SupplyRequest, SupplySystemType, TechnologyMismatchError,
};

/// This module provides an object to model direct electric resistance heating.

#[derive(Clone, Copy, Debug, Default)]
pub struct ElectricHeating;

impl EnergyConverter for ElectricHeating {
    fn technology(&self) -> SupplySystemType {
        SupplySystemType::ElectricHeating
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        Ok(SupplyOutput::from_electricity(request.load, 1.))
    }
}

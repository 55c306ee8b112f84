use crate::core::energy_supply::{
    EnergyConverter, SupplyOutput, SupplyRequest, SupplySystemType, TechnologyMismatchError,
};

/// This module provides an object to represent a connection to a district heat network.

#[derive(Clone, Copy, Debug)]
pub struct DistrictHeating {
    expenditure_factor: f64,
}

impl Default for DistrictHeating {
    fn default() -> Self {
        Self {
            expenditure_factor: 1.,
        }
    }
}

impl EnergyConverter for DistrictHeating {
    fn technology(&self) -> SupplySystemType {
        SupplySystemType::DistrictHeating
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        // Heat bought from the network is booked as fossil input
        Ok(SupplyOutput::from_fossils(
            request.load * self.expenditure_factor,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::space_heat_demand::thermal_network::DemandState;
    use rstest::*;

    #[rstest]
    fn should_pass_heat_through() {
        let output = DistrictHeating::default()
            .calc_loads(&SupplyRequest {
                load: 750.,
                temp_out: 0.,
                heating_supply_temperature: 50.,
                cooling_supply_temperature: 12.,
                demand: DemandState::HeatingActive,
            })
            .unwrap();

        assert_eq!(output.fossils_in, 750.);
        assert_eq!(output.electricity_in, 0.);
    }
}

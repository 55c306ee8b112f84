use crate::core::energy_supply::{
    EnergyConverter, SupplyOutput, SupplyRequest, SupplySystemType, TechnologyMismatchError,
};

/// This module provides an object to represent a combined heat and power unit. Electricity is
/// co-generated from the fuel burnt for heat and credited, not consumed.

#[derive(Clone, Copy, Debug)]
pub struct CombinedHeatPower {
    thermal_efficiency: f64,
    /// Electricity generated per unit of fuel input
    electrical_efficiency: f64,
}

impl Default for CombinedHeatPower {
    fn default() -> Self {
        Self {
            thermal_efficiency: 0.6,
            electrical_efficiency: 0.33,
        }
    }
}

impl EnergyConverter for CombinedHeatPower {
    fn technology(&self) -> SupplySystemType {
        SupplySystemType::CombinedHeatPower
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        let fossils_in = request.load / self.thermal_efficiency;
        Ok(SupplyOutput {
            electricity_out: fossils_in * self.electrical_efficiency,
            ..SupplyOutput::from_fossils(fossils_in)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::space_heat_demand::thermal_network::DemandState;
    use approx::assert_relative_eq;
    use rstest::*;

    #[rstest]
    fn should_credit_cogenerated_electricity() {
        let output = CombinedHeatPower::default()
            .calc_loads(&SupplyRequest {
                load: 600.,
                temp_out: 0.,
                heating_supply_temperature: 65.,
                cooling_supply_temperature: 12.,
                demand: DemandState::HeatingActive,
            })
            .unwrap();

        assert_relative_eq!(output.fossils_in, 1000.);
        assert_relative_eq!(output.electricity_out, 330.);
        assert_eq!(output.electricity_in, 0.);
    }
}

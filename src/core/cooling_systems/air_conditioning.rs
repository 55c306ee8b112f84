use crate::core::energy_supply::{
    EnergyConverter, SupplyOutput, SupplyRequest, SupplySystemType, TechnologyMismatchError,
};

/// This module provides objects to represent cooling plant: vapour-compression chillers with a
/// fixed energy efficiency ratio, absorption chillers driven by heat, and district cooling.

/// An electrically driven vapour-compression chiller.
#[derive(Clone, Copy, Debug)]
pub struct Chiller {
    technology: SupplySystemType,
    /// Energy efficiency ratio, useful cooling per unit of electricity
    efficiency: f64,
}

impl Chiller {
    /// Arguments
    /// * `technology` - one of the chiller technologies; anything else is treated as the least
    ///                  efficient chiller
    pub fn new(technology: SupplySystemType) -> Self {
        let efficiency = match technology {
            SupplySystemType::AirCooledScrew => 3.2,
            SupplySystemType::WaterCooledPistonScroll => 4.2,
            SupplySystemType::WaterCooledScrew => 4.5,
            _ => 3.0,
        };

        Self {
            technology,
            efficiency,
        }
    }

    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }
}

impl EnergyConverter for Chiller {
    fn technology(&self) -> SupplySystemType {
        self.technology
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        Ok(SupplyOutput::from_electricity(
            request.load / self.efficiency,
            self.efficiency,
        ))
    }
}

/// A heat-driven absorption chiller. The driving heat is booked as fossil input.
#[derive(Clone, Copy, Debug)]
pub struct AbsorptionChiller {
    thermal_cop: f64,
}

impl Default for AbsorptionChiller {
    fn default() -> Self {
        Self { thermal_cop: 0.7 }
    }
}

impl EnergyConverter for AbsorptionChiller {
    fn technology(&self) -> SupplySystemType {
        SupplySystemType::AbsorptionChiller
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        Ok(SupplyOutput {
            cop: self.thermal_cop,
            ..SupplyOutput::from_fossils(request.load / self.thermal_cop)
        })
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct DistrictCooling;

impl EnergyConverter for DistrictCooling {
    fn technology(&self) -> SupplySystemType {
        SupplySystemType::DistrictCooling
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        Ok(SupplyOutput::from_fossils(request.load))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::space_heat_demand::thermal_network::DemandState;
    use approx::assert_relative_eq;
    use rstest::*;

    #[fixture]
    fn cooling_request() -> SupplyRequest {
        SupplyRequest {
            load: 900.,
            temp_out: 31.,
            heating_supply_temperature: 40.,
            cooling_supply_temperature: 12.,
            demand: DemandState::CoolingActive,
        }
    }

    #[rstest]
    #[case(SupplySystemType::AirCooledPistonScroll, 300.)]
    #[case(SupplySystemType::AirCooledScrew, 281.25)]
    #[case(SupplySystemType::WaterCooledPistonScroll, 214.285714)]
    #[case(SupplySystemType::WaterCooledScrew, 200.)]
    fn should_divide_load_by_efficiency_ratio(
        cooling_request: SupplyRequest,
        #[case] technology: SupplySystemType,
        #[case] expected_electricity: f64,
    ) {
        let output = Chiller::new(technology).calc_loads(&cooling_request).unwrap();

        assert_relative_eq!(output.electricity_in, expected_electricity, max_relative = 1e-6);
        assert_eq!(output.fossils_in, 0.);
    }

    #[rstest]
    fn should_drive_absorption_chiller_with_heat(cooling_request: SupplyRequest) {
        let output = AbsorptionChiller::default()
            .calc_loads(&cooling_request)
            .unwrap();

        assert_relative_eq!(output.fossils_in, 900. / 0.7);
        assert_eq!(output.electricity_in, 0.);
    }

    #[rstest]
    fn should_pass_district_cooling_through(cooling_request: SupplyRequest) {
        let output = DistrictCooling.calc_loads(&cooling_request).unwrap();
        assert_eq!(output.fossils_in, 900.);
    }

    #[rstest]
    fn should_refuse_heating(cooling_request: SupplyRequest) {
        let request = SupplyRequest {
            demand: DemandState::HeatingActive,
            ..cooling_request
        };

        assert!(Chiller::new(SupplySystemType::AirCooledScrew)
            .calc_loads(&request)
            .is_err());
        assert!(DistrictCooling.calc_loads(&request).is_err());
    }
}

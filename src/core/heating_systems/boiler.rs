use crate::core::energy_supply::{
    EnergyConverter, SupplyOutput, SupplyRequest, SupplySystemType, TechnologyMismatchError,
};
use serde::Serialize;
use strum_macros::Display;

/// This module provides objects to model combustion boilers, which convert fuel into useful
/// heat at a fixed generation expenditure.

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize)]
pub enum BoilerFuel {
    Oil,
    Gas,
    Biomass,
    Coal,
}

/// A combustion boiler of a given fuel and vintage.
#[derive(Clone, Copy, Debug)]
pub struct Boiler {
    technology: SupplySystemType,
    fuel: BoilerFuel,
    expenditure_factor: f64,
}

impl Boiler {
    /// Arguments
    /// * `technology` - one of the boiler technologies; anything else falls back to a neutral
    ///                  expenditure factor of 1.0
    /// * `fuel` - fuel burnt by the boiler
    pub fn new(technology: SupplySystemType, fuel: BoilerFuel) -> Self {
        Self {
            technology,
            fuel,
            expenditure_factor: expenditure_factor(technology),
        }
    }

    pub fn fuel(&self) -> BoilerFuel {
        self.fuel
    }

    /// Ratio of fuel input to useful heat output
    pub fn expenditure_factor(&self) -> f64 {
        self.expenditure_factor
    }
}

/// Generation expenditure factors per boiler vintage and efficiency class
fn expenditure_factor(technology: SupplySystemType) -> f64 {
    match technology {
        SupplySystemType::OilBoilerStandardBefore1986 => 1.114,
        SupplySystemType::OilBoilerStandardFrom1995 => 1.085,
        SupplySystemType::OilBoilerLowTemperatureBefore1987 => 1.082,
        SupplySystemType::OilBoilerLowTemperatureFrom1995 => 1.048,
        SupplySystemType::OilBoilerCondensingBefore1995 => 1.045,
        SupplySystemType::OilBoilerCondensingFrom1995 => 1.030,
        SupplySystemType::GasBoilerStandardBefore1986 => 1.141,
        SupplySystemType::GasBoilerStandardFrom1995 => 1.103,
        SupplySystemType::GasBoilerLowTemperatureBefore1987 => 1.097,
        SupplySystemType::GasBoilerLowTemperatureFrom1995 => 1.061,
        SupplySystemType::GasBoilerCondensingBefore1995 => 1.027,
        SupplySystemType::GasBoilerCondensingFrom1995 => 1.011,
        SupplySystemType::BiomassBoilerBefore1995 => 1.33,
        SupplySystemType::BiomassBoilerFrom1995 => 1.21,
        SupplySystemType::CoalBoilerStandard => 1.32,
        _ => 1.,
    }
}

impl EnergyConverter for Boiler {
    fn technology(&self) -> SupplySystemType {
        self.technology
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;

        Ok(SupplyOutput::from_fossils(
            request.load * self.expenditure_factor,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::space_heat_demand::thermal_network::DemandState;
    use approx::assert_relative_eq;
    use rstest::*;

    #[fixture]
    fn heating_request() -> SupplyRequest {
        SupplyRequest {
            load: 1000.,
            temp_out: -2.,
            heating_supply_temperature: 65.,
            cooling_supply_temperature: 12.,
            demand: DemandState::HeatingActive,
        }
    }

    #[rstest]
    #[case(SupplySystemType::OilBoilerStandardBefore1986, BoilerFuel::Oil, 1114.)]
    #[case(SupplySystemType::GasBoilerCondensingFrom1995, BoilerFuel::Gas, 1011.)]
    #[case(SupplySystemType::BiomassBoilerBefore1995, BoilerFuel::Biomass, 1330.)]
    #[case(SupplySystemType::CoalBoilerStandard, BoilerFuel::Coal, 1320.)]
    fn should_apply_expenditure_factor_to_fuel_only(
        heating_request: SupplyRequest,
        #[case] technology: SupplySystemType,
        #[case] fuel: BoilerFuel,
        #[case] expected_fossils: f64,
    ) {
        let boiler = Boiler::new(technology, fuel);
        let output = boiler.calc_loads(&heating_request).unwrap();

        assert_relative_eq!(output.fossils_in, expected_fossils, max_relative = 1e-9);
        assert_eq!(output.electricity_in, 0.);
        assert_eq!(output.electricity_out, 0.);
        assert!(output.cop.is_nan());
    }

    #[rstest]
    fn should_refuse_cooling(heating_request: SupplyRequest) {
        let boiler = Boiler::new(SupplySystemType::OilBoilerStandardBefore1986, BoilerFuel::Oil);
        let request = SupplyRequest {
            demand: DemandState::CoolingActive,
            ..heating_request
        };

        let error = boiler.calc_loads(&request).unwrap_err();
        assert_eq!(error.technology.as_str(), "OilBoilerStandardBefore1986");
        assert_eq!(error.demand, DemandState::CoolingActive);
    }
}

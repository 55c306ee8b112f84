use crate::core::cooling_systems::air_conditioning::{AbsorptionChiller, Chiller, DistrictCooling};
use crate::core::heating_systems::boiler::{Boiler, BoilerFuel};
use crate::core::heating_systems::chp::CombinedHeatPower;
use crate::core::heating_systems::heat_network::DistrictHeating;
use crate::core::heating_systems::heat_pump::{HeatPump, HeatPumpSource};
use crate::core::heating_systems::instant_elec_heater::ElectricHeating;
use crate::core::space_heat_demand::thermal_network::DemandState;
use serde::{Deserialize, Serialize};
use smartstring::alias::String;
use strum_macros::{Display, EnumIter, EnumString};
use thiserror::Error;

use SupplySystemType as T;

/// A supply or emission technology was asked to serve a demand direction it is not configured
/// for.
#[derive(Clone, Debug, Error, PartialEq)]
#[error("Technology {technology} cannot serve demand state {demand:?}")]
pub struct TechnologyMismatchError {
    pub technology: String,
    pub demand: DemandState,
}

impl TechnologyMismatchError {
    pub(crate) fn new(technology: impl std::fmt::Display, demand: DemandState) -> Self {
        Self {
            technology: technology.to_string().into(),
            demand,
        }
    }
}

/// Which demand directions a technology can serve.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SupplyRole {
    Heating,
    Cooling,
    HeatingAndCooling,
}

impl SupplyRole {
    pub fn serves(&self, demand: DemandState) -> bool {
        matches!(
            (self, demand),
            (SupplyRole::Heating, DemandState::HeatingActive)
                | (SupplyRole::Cooling, DemandState::CoolingActive)
                | (
                    SupplyRole::HeatingAndCooling,
                    DemandState::HeatingActive | DemandState::CoolingActive
                )
        )
    }
}

/// Names of the plant technologies that convert fuel or electricity into useful heat or
/// cooling. The names are the ones used by the building parameter record.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize,
)]
pub enum SupplySystemType {
    OilBoilerStandardBefore1986,
    OilBoilerStandardFrom1995,
    OilBoilerLowTemperatureBefore1987,
    OilBoilerLowTemperatureFrom1995,
    OilBoilerCondensingBefore1995,
    OilBoilerCondensingFrom1995,
    GasBoilerStandardBefore1986,
    GasBoilerStandardFrom1995,
    GasBoilerLowTemperatureBefore1987,
    GasBoilerLowTemperatureFrom1995,
    GasBoilerCondensingBefore1995,
    GasBoilerCondensingFrom1995,
    BiomassBoilerBefore1995,
    BiomassBoilerFrom1995,
    CoalBoilerStandard,
    DistrictHeating,
    CombinedHeatPower,
    ElectricHeating,
    HeatPumpAir,
    HeatPumpWater,
    AirCooledPistonScroll,
    AirCooledScrew,
    WaterCooledPistonScroll,
    WaterCooledScrew,
    AbsorptionChiller,
    DistrictCooling,
    NoHeating,
    NoCooling,
}

impl SupplySystemType {
    pub fn role(&self) -> SupplyRole {
        match self {
            T::HeatPumpAir | T::HeatPumpWater => SupplyRole::HeatingAndCooling,
            T::AirCooledPistonScroll
            | T::AirCooledScrew
            | T::WaterCooledPistonScroll
            | T::WaterCooledScrew
            | T::AbsorptionChiller
            | T::DistrictCooling
            | T::NoCooling => SupplyRole::Cooling,
            _ => SupplyRole::Heating,
        }
    }

    pub fn is_dummy(&self) -> bool {
        matches!(self, SupplySystemType::NoHeating | SupplySystemType::NoCooling)
    }
}

/// Inputs for one supply calculation. The load is always a non-negative magnitude; cooling
/// loads are passed in with their sign removed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SupplyRequest {
    /// Useful energy to be delivered, in Wh
    pub load: f64,
    /// Outdoor air temperature, in deg C
    pub temp_out: f64,
    /// Supply temperature of the heating emission system, in deg C
    pub heating_supply_temperature: f64,
    /// Supply temperature of the cooling emission system, in deg C
    pub cooling_supply_temperature: f64,
    pub demand: DemandState,
}

/// Final energy drawn (and exported) by a supply technology for one hour, in Wh.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SupplyOutput {
    pub fossils_in: f64,
    pub electricity_in: f64,
    pub electricity_out: f64,
    /// Coefficient of performance; NaN where the technology has none
    pub cop: f64,
}

impl SupplyOutput {
    pub fn nothing_supplied() -> Self {
        Self {
            fossils_in: 0.,
            electricity_in: 0.,
            electricity_out: 0.,
            cop: f64::NAN,
        }
    }

    pub(crate) fn from_fossils(fossils_in: f64) -> Self {
        Self {
            fossils_in,
            ..Self::nothing_supplied()
        }
    }

    pub(crate) fn from_electricity(electricity_in: f64, cop: f64) -> Self {
        Self {
            electricity_in,
            cop,
            ..Self::nothing_supplied()
        }
    }
}

/// Converts a useful energy load into final fuel and electricity.
pub trait EnergyConverter {
    fn technology(&self) -> SupplySystemType;

    /// Calculate the final energy needed to deliver `request.load`.
    ///
    /// Implementations must reject a demand direction outside their role rather than report zero.
    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError>;

    fn ensure_serves(&self, demand: DemandState) -> Result<(), TechnologyMismatchError> {
        if self.technology().role().serves(demand) {
            Ok(())
        } else {
            Err(TechnologyMismatchError::new(self.technology(), demand))
        }
    }
}

/// Placeholder for buildings without a heating or cooling plant.
#[derive(Clone, Copy, Debug)]
pub struct NoSupply {
    technology: SupplySystemType,
}

impl EnergyConverter for NoSupply {
    fn technology(&self) -> SupplySystemType {
        self.technology
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        self.ensure_serves(request.demand)?;
        Ok(SupplyOutput::nothing_supplied())
    }
}

/// The supply technology selected for one direction of a building, resolved once when the
/// building is loaded.
#[derive(Clone, Copy, Debug)]
pub enum SupplySystem {
    Boiler(Boiler),
    DistrictHeating(DistrictHeating),
    CombinedHeatPower(CombinedHeatPower),
    ElectricHeating(ElectricHeating),
    HeatPump(HeatPump),
    Chiller(Chiller),
    AbsorptionChiller(AbsorptionChiller),
    DistrictCooling(DistrictCooling),
    NoSupply(NoSupply),
}

impl From<SupplySystemType> for SupplySystem {
    fn from(technology: SupplySystemType) -> Self {
        match technology {
            T::OilBoilerStandardBefore1986
            | T::OilBoilerStandardFrom1995
            | T::OilBoilerLowTemperatureBefore1987
            | T::OilBoilerLowTemperatureFrom1995
            | T::OilBoilerCondensingBefore1995
            | T::OilBoilerCondensingFrom1995 => {
                SupplySystem::Boiler(Boiler::new(technology, BoilerFuel::Oil))
            }
            T::GasBoilerStandardBefore1986
            | T::GasBoilerStandardFrom1995
            | T::GasBoilerLowTemperatureBefore1987
            | T::GasBoilerLowTemperatureFrom1995
            | T::GasBoilerCondensingBefore1995
            | T::GasBoilerCondensingFrom1995 => {
                SupplySystem::Boiler(Boiler::new(technology, BoilerFuel::Gas))
            }
            T::BiomassBoilerBefore1995 | T::BiomassBoilerFrom1995 => {
                SupplySystem::Boiler(Boiler::new(technology, BoilerFuel::Biomass))
            }
            T::CoalBoilerStandard => SupplySystem::Boiler(Boiler::new(technology, BoilerFuel::Coal)),
            T::DistrictHeating => SupplySystem::DistrictHeating(Default::default()),
            T::CombinedHeatPower => SupplySystem::CombinedHeatPower(Default::default()),
            T::ElectricHeating => SupplySystem::ElectricHeating(Default::default()),
            T::HeatPumpAir => SupplySystem::HeatPump(HeatPump::new(HeatPumpSource::OutdoorAir)),
            T::HeatPumpWater => SupplySystem::HeatPump(HeatPump::new(HeatPumpSource::Ground)),
            T::AirCooledPistonScroll | T::AirCooledScrew | T::WaterCooledPistonScroll
            | T::WaterCooledScrew => SupplySystem::Chiller(Chiller::new(technology)),
            T::AbsorptionChiller => SupplySystem::AbsorptionChiller(Default::default()),
            T::DistrictCooling => SupplySystem::DistrictCooling(Default::default()),
            T::NoHeating | T::NoCooling => SupplySystem::NoSupply(NoSupply { technology }),
        }
    }
}

impl EnergyConverter for SupplySystem {
    fn technology(&self) -> SupplySystemType {
        match self {
            SupplySystem::Boiler(system) => system.technology(),
            SupplySystem::DistrictHeating(system) => system.technology(),
            SupplySystem::CombinedHeatPower(system) => system.technology(),
            SupplySystem::ElectricHeating(system) => system.technology(),
            SupplySystem::HeatPump(system) => system.technology(),
            SupplySystem::Chiller(system) => system.technology(),
            SupplySystem::AbsorptionChiller(system) => system.technology(),
            SupplySystem::DistrictCooling(system) => system.technology(),
            SupplySystem::NoSupply(system) => system.technology(),
        }
    }

    fn calc_loads(&self, request: &SupplyRequest) -> Result<SupplyOutput, TechnologyMismatchError> {
        match self {
            SupplySystem::Boiler(system) => system.calc_loads(request),
            SupplySystem::DistrictHeating(system) => system.calc_loads(request),
            SupplySystem::CombinedHeatPower(system) => system.calc_loads(request),
            SupplySystem::ElectricHeating(system) => system.calc_loads(request),
            SupplySystem::HeatPump(system) => system.calc_loads(request),
            SupplySystem::Chiller(system) => system.calc_loads(request),
            SupplySystem::AbsorptionChiller(system) => system.calc_loads(request),
            SupplySystem::DistrictCooling(system) => system.calc_loads(request),
            SupplySystem::NoSupply(system) => system.calc_loads(request),
        }
    }
}

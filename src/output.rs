use crate::core::space_heat_demand::thermal_network::DemandState;
use crate::core::space_heat_demand::window::Orientation;
use indexmap::IndexMap;
use serde::Serialize;

/// Result of one simulated hour. Energies are in Wh, temperatures in deg C. Demands are signed,
/// cooling negative; consumption figures are always non-negative.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct HourlyResult {
    /// Hour of the year, 0 being the first hour of January
    pub hour: u32,
    pub hour_of_day: u32,
    /// Whether the sun is above the horizon
    pub daytime: bool,
    pub temp_out: f64,
    pub temp_air: f64,
    pub temp_surface: f64,
    pub temp_mass: f64,
    pub temp_operative: f64,
    pub heating_setpoint: f64,
    pub demand_state: DemandState,
    pub unrestricted_demand: f64,
    pub heating_demand: f64,
    pub cooling_demand: f64,
    pub heating_sys_electricity: f64,
    pub heating_sys_fossils: f64,
    pub cooling_sys_electricity: f64,
    pub cooling_sys_fossils: f64,
    /// Electricity co-generated and exported
    pub electricity_out: f64,
    pub heating_energy: f64,
    pub cooling_energy: f64,
    pub total_energy: f64,
    /// NaN (serialized as null) when no heat pump or chiller ran
    pub cop: f64,
    pub supply_temperature: f64,
    pub return_temperature: f64,
    pub lighting_demand: f64,
    pub internal_gains: f64,
    pub solar_gains: f64,
    pub solar_gains_by_orientation: IndexMap<Orientation, f64>,
    /// Ventilation heat transfer coefficient, in W / K
    pub h_ve_adj: f64,
    pub night_flushing_on: bool,
}

impl HourlyResult {
    pub fn is_heating(&self) -> bool {
        self.demand_state == DemandState::HeatingActive
    }

    pub fn is_cooling(&self) -> bool {
        self.demand_state == DemandState::CoolingActive
    }
}

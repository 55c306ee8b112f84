use crate::core::space_heat_demand::internal_gains::InternalGains;
use crate::core::space_heat_demand::thermal_network::{
    DemandState, HourOutcome, HourlyForcing, ThermalNetwork, ThermalState,
};
use crate::core::space_heat_demand::ventilation::Ventilation;
use crate::core::space_heat_demand::window::{Orientation, Window};
use crate::errors::{CalculationError, HbemError};
use crate::external_conditions::calc_sun_position;
use crate::input::{BuildingParameters, HourlyFeed};
use crate::output::HourlyResult;
use crate::simulation_time::{SimulationTime, SimulationTimeIteration};
use indexmap::IndexMap;
use smartstring::alias::String;

/// One building assembled for simulation: windows, ventilation, gains and the thermal network
/// with its emission and supply technologies, all resolved from the parameter record once.
#[derive(Clone, Debug)]
pub struct Corpus {
    building_id: String,
    simulation_time: SimulationTime,
    t_start: f64,
    windows: IndexMap<Orientation, Window>,
    ventilation: Ventilation,
    internal_gains: InternalGains,
    network: ThermalNetwork,
}

impl Corpus {
    pub fn from_inputs(building: &BuildingParameters) -> Self {
        let windows = Orientation::ALL
            .into_iter()
            .map(|orientation| {
                (
                    orientation,
                    Window::facing(
                        orientation,
                        &building.glazing,
                        building.envelope.window_area.get(orientation),
                    ),
                )
            })
            .collect();

        Self {
            building_id: building.building_id.clone(),
            simulation_time: SimulationTime::full_year(),
            t_start: building.heating_setpoint,
            windows,
            ventilation: Ventilation::new(&building.ventilation, building.volume()),
            internal_gains: InternalGains::new(&building.gains, building.energy_ref_area),
            network: ThermalNetwork::new(building),
        }
    }

    pub fn building_id(&self) -> &str {
        &self.building_id
    }

    /// Simulate every hour of the year in order. The run aborts at the first hour that fails.
    pub fn run(&self, feed: &HourlyFeed) -> Result<Vec<HourlyResult>, HbemError> {
        let mut state = ThermalState::new(self.t_start);
        let mut results = Vec::with_capacity(self.simulation_time.total_steps());

        for simtime in self.simulation_time.iter() {
            let result = self
                .run_hour(feed, &mut state, &simtime)
                .map_err(|source| HbemError::FailureInCalculation {
                    building_id: self.building_id.clone(),
                    hour: simtime.index,
                    source,
                })?;
            results.push(result);
        }

        Ok(results)
    }

    fn run_hour(
        &self,
        feed: &HourlyFeed,
        state: &mut ThermalState,
        simtime: &SimulationTimeIteration,
    ) -> Result<HourlyResult, CalculationError> {
        let missing_sample = || CalculationError::MissingSample {
            hour: simtime.index,
        };
        let weather = feed.weather.get(simtime.index).ok_or_else(missing_sample)?;
        let occupancy = feed
            .occupancy
            .get(simtime.index)
            .ok_or_else(missing_sample)?;

        let sun = calc_sun_position(feed.latitude, feed.longitude, weather.year, simtime.hour)?;
        let prev_temp_air = state.t_air;

        let mut solar_gains_by_orientation = IndexMap::with_capacity(self.windows.len());
        let mut transmitted_illuminance = 0.;
        for (orientation, window) in &self.windows {
            let gains = window.calc_solar_gains(
                &sun,
                weather.direct_normal_irradiance,
                weather.diffuse_horizontal_irradiance,
                prev_temp_air,
                simtime,
            );
            solar_gains_by_orientation.insert(*orientation, gains.solar_gains);
            transmitted_illuminance += window.calc_illuminance(
                &sun,
                weather.direct_normal_illuminance,
                weather.diffuse_horizontal_illuminance,
            );
        }
        let solar_gains = solar_gains_by_orientation.values().sum::<f64>();

        let lighting_demand = self
            .internal_gains
            .lighting_demand(transmitted_illuminance, occupancy);
        let internal_gains = self
            .internal_gains
            .total_internal_gain_in_w(occupancy, lighting_demand);

        let ventilation = self
            .ventilation
            .calc(simtime, prev_temp_air, weather.temp_out);

        let forcing = HourlyForcing {
            temp_out: weather.temp_out,
            internal_gains,
            solar_gains,
            h_ve_adj: ventilation.h_ve_adj,
            night_flushing_on: ventilation.night_flushing_on,
        };
        let outcome = self.network.solve_hour(state, &forcing)?;

        Ok(hourly_result(
            simtime,
            sun.is_above_horizon(),
            &forcing,
            &outcome,
            lighting_demand,
            solar_gains_by_orientation,
        ))
    }
}

fn hourly_result(
    simtime: &SimulationTimeIteration,
    daytime: bool,
    forcing: &HourlyForcing,
    outcome: &HourOutcome,
    lighting_demand: f64,
    solar_gains_by_orientation: IndexMap<Orientation, f64>,
) -> HourlyResult {
    let supply = &outcome.supply;
    let (heating_demand, cooling_demand) = match outcome.demand {
        DemandState::HeatingActive => (outcome.energy_demand, 0.),
        DemandState::CoolingActive => (0., outcome.energy_demand),
        DemandState::NoDemand => (0., 0.),
    };
    let (heating_sys_electricity, heating_sys_fossils, cooling_sys_electricity, cooling_sys_fossils) =
        match outcome.demand {
            DemandState::HeatingActive => (supply.electricity_in, supply.fossils_in, 0., 0.),
            DemandState::CoolingActive => (0., 0., supply.electricity_in, supply.fossils_in),
            DemandState::NoDemand => (0., 0., 0., 0.),
        };
    let heating_energy = heating_sys_electricity + heating_sys_fossils;
    let cooling_energy = cooling_sys_electricity + cooling_sys_fossils;

    HourlyResult {
        hour: simtime.hour,
        hour_of_day: simtime.hour_of_day(),
        daytime,
        temp_out: forcing.temp_out,
        temp_air: outcome.temperatures.t_air,
        temp_surface: outcome.temperatures.t_s,
        temp_mass: outcome.temperatures.t_m,
        temp_operative: outcome.temperatures.t_op,
        heating_setpoint: outcome.heating_setpoint,
        demand_state: outcome.demand,
        unrestricted_demand: outcome.unrestricted_demand,
        heating_demand,
        cooling_demand,
        heating_sys_electricity,
        heating_sys_fossils,
        cooling_sys_electricity,
        cooling_sys_fossils,
        electricity_out: supply.electricity_out,
        heating_energy,
        cooling_energy,
        total_energy: heating_energy + cooling_energy,
        cop: supply.cop,
        supply_temperature: outcome.emission_temperatures.supply,
        return_temperature: outcome.emission_temperatures.r#return,
        lighting_demand,
        internal_gains: forcing.internal_gains,
        solar_gains: forcing.solar_gains,
        solar_gains_by_orientation,
        h_ve_adj: forcing.h_ve_adj,
        night_flushing_on: forcing.night_flushing_on,
    }
}

// This module provides the 5R1C thermal network of a single-zone building: one thermal
// capacitance (the building mass) linked to the air, surface and outdoor nodes by five heat
// transfer coefficients. The mass node is integrated with a Crank-Nicolson scheme over hourly
// steps; surface and air temperatures follow algebraically.

use crate::core::energy_supply::{EnergyConverter, SupplyOutput, SupplyRequest, SupplySystem};
use crate::core::heating_systems::emitters::{
    EmissionFlows, EmissionSystemType, EmissionTemperatures, HeatFlowSplitter, NodeGeometry,
};
use crate::core::units::{series_conductance, SECONDS_PER_HOUR};
use crate::errors::CalculationError;
use crate::input::BuildingParameters;
use serde::Serialize;
use strum_macros::Display;
use tracing::debug;

/// Ratio of the area of all surfaces facing the zone to the energy reference area
const TOTAL_AREA_RATIO: f64 = 4.5;
/// Heat transfer coefficient between air and surface node, in W / (m2.K)
const H_IS: f64 = 3.45;
/// Heat transfer coefficient between surface and mass node, in W / (m2.K)
const H_MS: f64 = 9.1;
/// Calibration load used to interpolate the demand, in W per m2 of energy reference area
const CALIBRATION_LOAD_PER_AREA: f64 = 10.;

/// Direction of the energy demand in the current hour. Exactly one holds at any time.
#[derive(Clone, Copy, Debug, Display, Eq, Hash, PartialEq, Serialize)]
pub enum DemandState {
    NoDemand,
    HeatingActive,
    CoolingActive,
}

/// Effective mass area per unit of energy reference area for an internal heat capacity, in
/// J / (m2.K). Light (<= 165000), medium (<= 260000) and heavy construction.
pub fn effective_mass_area_factor(thermal_capacitance: f64) -> f64 {
    if thermal_capacitance <= 165_000. {
        2.5
    } else if thermal_capacitance <= 260_000. {
        3.
    } else {
        3.5
    }
}

/// Fixed conductances and capacitance of the network.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NetworkProperties {
    /// Energy reference area, in m2
    pub floor_area: f64,
    /// Effective mass area A_m, in m2
    pub mass_area: f64,
    /// Area of all surfaces facing the zone A_t, in m2
    pub total_area: f64,
    /// Transmission through opaque elements, in W / K
    pub h_tr_em: f64,
    /// Transmission through windows, in W / K
    pub h_tr_w: f64,
    /// Coupling of air and surface node, in W / K
    pub h_tr_is: f64,
    /// Coupling of surface and mass node, in W / K
    pub h_tr_ms: f64,
    /// Internal heat capacity, in J / K
    pub c_m: f64,
}

impl NetworkProperties {
    pub fn from_building(building: &BuildingParameters) -> Self {
        let envelope = &building.envelope;
        let floor_area = building.energy_ref_area;

        let opaque_wall_area =
            (envelope.wall_area.total() - envelope.window_area.total()).max(0.);
        let h_tr_em = envelope.u_wall * opaque_wall_area
            + envelope.u_roof * building.roof_area() * envelope.b_roof
            + envelope.u_floor * building.ground_floor_area() * envelope.b_floor;
        let h_tr_w = envelope.u_window * envelope.window_area.total();

        let mass_area_factor = effective_mass_area_factor(building.thermal_capacitance);
        let mass_area = mass_area_factor * floor_area;
        let total_area = TOTAL_AREA_RATIO * floor_area;

        let properties = Self {
            floor_area,
            mass_area,
            total_area,
            h_tr_em,
            h_tr_w,
            h_tr_is: H_IS * total_area,
            h_tr_ms: H_MS * mass_area,
            c_m: building.thermal_capacitance * floor_area,
        };

        debug!(
            building_id = %building.building_id,
            mass_area_factor,
            h_tr_em = properties.h_tr_em,
            h_tr_w = properties.h_tr_w,
            h_tr_is = properties.h_tr_is,
            h_tr_ms = properties.h_tr_ms,
            c_m = properties.c_m,
            "Derived thermal network"
        );

        properties
    }

    pub fn node_geometry(&self) -> NodeGeometry {
        NodeGeometry {
            mass_area: self.mass_area,
            total_area: self.total_area,
            h_tr_w: self.h_tr_w,
        }
    }

    /// Shares of the radiative gains (half the internal gains plus solar) received by the
    /// surface and the mass node.
    fn radiative_shares(&self) -> (f64, f64) {
        if self.total_area > 0. {
            let mass_share = self.mass_area / self.total_area;
            let surface_share = 1. - mass_share - self.h_tr_w / (H_MS * self.total_area);
            (surface_share, mass_share)
        } else {
            (0., 0.)
        }
    }
}

/// External forcing of the network for one hour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourlyForcing {
    /// Outdoor air temperature, also used as supply air temperature, in deg C
    pub temp_out: f64,
    /// in W
    pub internal_gains: f64,
    /// in W
    pub solar_gains: f64,
    /// Ventilation heat transfer coefficient, in W / K
    pub h_ve_adj: f64,
    pub night_flushing_on: bool,
}

/// Node temperatures resulting from one solve of the network, in deg C.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct NodeTemperatures {
    pub t_air: f64,
    pub t_s: f64,
    /// Mean of the mass temperature over the hour
    pub t_m: f64,
    /// Mass temperature at the end of the hour
    pub t_m_next: f64,
    /// Operative temperature
    pub t_op: f64,
}

impl NodeTemperatures {
    fn ensure_finite(self, context: &str) -> Result<Self, CalculationError> {
        if [self.t_air, self.t_s, self.t_m, self.t_m_next, self.t_op]
            .iter()
            .all(|t| t.is_finite())
        {
            Ok(self)
        } else {
            Err(CalculationError::NumericalDegeneracy(format!(
                "non-finite node temperature while solving {context}: {self:?}"
            )))
        }
    }
}

/// Mutable state of the network, carried from hour to hour for the length of one run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThermalState {
    pub t_air: f64,
    pub t_s: f64,
    pub t_m: f64,
    pub t_op: f64,
    /// Mass temperature at the end of the previous hour
    pub t_m_prev: f64,
    pub h_ve_adj: f64,
    pub demand: DemandState,
}

impl ThermalState {
    /// All nodes start at `t_start`.
    pub fn new(t_start: f64) -> Self {
        Self {
            t_air: t_start,
            t_s: t_start,
            t_m: t_start,
            t_op: t_start,
            t_m_prev: t_start,
            h_ve_adj: 0.,
            demand: DemandState::NoDemand,
        }
    }
}

/// Everything the network resolved for one hour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HourOutcome {
    pub demand: DemandState,
    /// Demand needed to hold the setpoint exactly, in Wh (cooling negative)
    pub unrestricted_demand: f64,
    /// Demand actually delivered after the power limits, in Wh (cooling negative)
    pub energy_demand: f64,
    pub heating_setpoint: f64,
    pub temperatures: NodeTemperatures,
    pub emission_temperatures: EmissionTemperatures,
    pub supply: SupplyOutput,
}

/// The thermal network of one building together with the technologies that serve it.
#[derive(Clone, Debug)]
pub struct ThermalNetwork {
    properties: NetworkProperties,
    heating_setpoint: f64,
    cooling_setpoint: f64,
    /// in Wh
    max_heating_energy: f64,
    /// in Wh, zero or negative
    max_cooling_energy: f64,
    heating_emission: EmissionSystemType,
    cooling_emission: EmissionSystemType,
    heating_supply: SupplySystem,
    cooling_supply: SupplySystem,
}

impl ThermalNetwork {
    pub fn new(building: &BuildingParameters) -> Self {
        let floor_area = building.energy_ref_area;

        Self {
            properties: NetworkProperties::from_building(building),
            heating_setpoint: building.heating_setpoint,
            cooling_setpoint: building.cooling_setpoint,
            max_heating_energy: building
                .max_heating_power_per_floor_area
                .map_or(f64::INFINITY, |power| power * floor_area),
            max_cooling_energy: building
                .max_cooling_power_per_floor_area
                .map_or(f64::NEG_INFINITY, |power| power * floor_area),
            heating_emission: building.heating_emission_system,
            cooling_emission: building.cooling_emission_system,
            heating_supply: SupplySystem::from(building.heating_supply_system),
            cooling_supply: SupplySystem::from(building.cooling_supply_system),
        }
    }

    pub fn properties(&self) -> &NetworkProperties {
        &self.properties
    }

    /// Heating setpoint for the hour; heating is disabled while the building is flushed.
    pub fn heating_setpoint(&self, night_flushing_on: bool) -> f64 {
        if night_flushing_on {
            0.
        } else {
            self.heating_setpoint
        }
    }

    fn emission_for(&self, demand: DemandState) -> EmissionSystemType {
        match demand {
            DemandState::CoolingActive => self.cooling_emission,
            _ => self.heating_emission,
        }
    }

    fn supply_for(&self, demand: DemandState) -> &SupplySystem {
        match demand {
            DemandState::CoolingActive => &self.cooling_supply,
            _ => &self.heating_supply,
        }
    }

    /// Limit a demand to the installed heating and cooling power. Clamping twice gives the same
    /// result as clamping once.
    pub fn clamp_energy_demand(&self, unrestricted_demand: f64) -> f64 {
        unrestricted_demand
            .min(self.max_heating_energy)
            .max(self.max_cooling_energy)
    }

    /// Solve the node temperatures for one hour with the given emission onto the nodes.
    ///
    /// ## Arguments
    /// * `forcing` - outdoor temperature, gains and ventilation for the hour
    /// * `t_m_prev` - mass temperature at the end of the previous hour, in deg C
    /// * `flows` - heating (positive) or cooling (negative) emitted onto each node, in W
    pub fn calc_temperatures_crank_nicolson(
        &self,
        forcing: &HourlyForcing,
        t_m_prev: f64,
        flows: &EmissionFlows,
    ) -> NodeTemperatures {
        let p = &self.properties;
        let h_ve = forcing.h_ve_adj;
        let t_out = forcing.temp_out;
        let t_sup = forcing.temp_out;

        let h_tr_1 = series_conductance(h_ve, p.h_tr_is);
        let h_tr_2 = h_tr_1 + p.h_tr_w;
        let h_tr_3 = series_conductance(h_tr_2, p.h_tr_ms);

        let radiative_gains = 0.5 * forcing.internal_gains + forcing.solar_gains;
        let (surface_share, mass_share) = p.radiative_shares();
        let phi_ia = 0.5 * forcing.internal_gains + flows.phi_ia_plus;
        let phi_st = surface_share * radiative_gains + flows.phi_st_plus;
        let phi_m = mass_share * radiative_gains + flows.phi_m_plus;

        // Share of the air node gains passed on to the surface node; equals h_tr_1 * phi_ia / h_ve
        let phi_ia_to_surface = if h_ve + p.h_tr_is > 0. {
            phi_ia * p.h_tr_is / (h_ve + p.h_tr_is)
        } else {
            0.
        };

        let phi_m_tot = phi_m
            + p.h_tr_em * t_out
            + p.h_tr_ms / (h_tr_2 + p.h_tr_ms)
                * (phi_st + p.h_tr_w * t_out + h_tr_1 * t_sup + phi_ia_to_surface);

        let c_m_per_hour = p.c_m / SECONDS_PER_HOUR as f64;
        let t_m_next = (t_m_prev * (c_m_per_hour - 0.5 * (h_tr_3 + p.h_tr_em)) + phi_m_tot)
            / (c_m_per_hour + 0.5 * (h_tr_3 + p.h_tr_em));
        let t_m = 0.5 * (t_m_next + t_m_prev);

        let t_s = (p.h_tr_ms * t_m
            + phi_st
            + p.h_tr_w * t_out
            + h_tr_1 * t_sup
            + phi_ia_to_surface)
            / (p.h_tr_ms + p.h_tr_w + h_tr_1);

        let t_air = (p.h_tr_is * t_s + h_ve * t_sup + phi_ia) / (p.h_tr_is + h_ve);

        NodeTemperatures {
            t_air,
            t_s,
            t_m,
            t_m_next,
            t_op: 0.3 * t_air + 0.7 * t_s,
        }
    }

    /// Resolve demand, node temperatures and the consumption of the serving technologies for
    /// one hour, and advance `state` to the end of the hour.
    pub fn solve_hour(
        &self,
        state: &mut ThermalState,
        forcing: &HourlyForcing,
    ) -> Result<HourOutcome, CalculationError> {
        let mut solver = HourSolver::new(self, forcing, state.t_m_prev);

        let demand = solver.has_demand()?;
        let (unrestricted_demand, energy_demand, temperatures) = match demand {
            DemandState::NoDemand => (0., 0., solver.free_floating()?),
            // Nothing can be delivered, so the zone floats
            _ if self.emission_for(demand).is_dummy() => (0., 0., solver.free_floating()?),
            _ => {
                let unrestricted_demand = solver.calc_energy_demand()?;
                let energy_demand = self.clamp_energy_demand(unrestricted_demand);
                let temperatures = solver.calc_temperatures(energy_demand)?;
                (unrestricted_demand, energy_demand, temperatures)
            }
        };

        let (emission_temperatures, supply) = self.dispatch(demand, energy_demand, forcing)?;

        state.t_air = temperatures.t_air;
        state.t_s = temperatures.t_s;
        state.t_m = temperatures.t_m;
        state.t_op = temperatures.t_op;
        state.t_m_prev = temperatures.t_m_next;
        state.h_ve_adj = forcing.h_ve_adj;
        state.demand = demand;

        Ok(HourOutcome {
            demand,
            unrestricted_demand,
            energy_demand,
            heating_setpoint: self.heating_setpoint(forcing.night_flushing_on),
            temperatures,
            emission_temperatures,
            supply,
        })
    }

    /// Route the final demand through the emission system to the supply system.
    fn dispatch(
        &self,
        demand: DemandState,
        energy_demand: f64,
        forcing: &HourlyForcing,
    ) -> Result<(EmissionTemperatures, SupplyOutput), CalculationError> {
        if demand == DemandState::NoDemand {
            return Ok((
                EmissionTemperatures::undefined(),
                SupplyOutput::nothing_supplied(),
            ));
        }

        let emission_temperatures = self.emission_for(demand).temperatures(demand)?;
        let (heating_supply_temperature, cooling_supply_temperature) = match demand {
            DemandState::CoolingActive => (f64::NAN, emission_temperatures.supply),
            _ => (emission_temperatures.supply, f64::NAN),
        };

        let supply = self.supply_for(demand).calc_loads(&SupplyRequest {
            load: energy_demand.abs(),
            temp_out: forcing.temp_out,
            heating_supply_temperature,
            cooling_supply_temperature,
            demand,
        })?;

        Ok((emission_temperatures, supply))
    }
}

#[derive(Clone, Copy, Debug)]
enum SolverPhase {
    AwaitingDirection,
    DirectionKnown {
        demand: DemandState,
        free_floating: NodeTemperatures,
    },
    DemandResolved {
        demand: DemandState,
    },
}

/// Solves one hour of the network. The demand direction has to be established with
/// `has_demand` before the energy demand can be calculated.
pub struct HourSolver<'a> {
    network: &'a ThermalNetwork,
    forcing: &'a HourlyForcing,
    t_m_prev: f64,
    phase: SolverPhase,
}

impl<'a> HourSolver<'a> {
    pub fn new(network: &'a ThermalNetwork, forcing: &'a HourlyForcing, t_m_prev: f64) -> Self {
        Self {
            network,
            forcing,
            t_m_prev,
            phase: SolverPhase::AwaitingDirection,
        }
    }

    /// Solve the network without heating or cooling and compare the air temperature with the
    /// setpoints.
    pub fn has_demand(&mut self) -> Result<DemandState, CalculationError> {
        if !matches!(self.phase, SolverPhase::AwaitingDirection) {
            return Err(CalculationError::StateMachineMisuse(
                "demand direction was already determined for this hour".into(),
            ));
        }

        let free_floating = self
            .network
            .calc_temperatures_crank_nicolson(self.forcing, self.t_m_prev, &Default::default())
            .ensure_finite("free-floating temperatures")?;

        let demand = if free_floating.t_air
            < self.network.heating_setpoint(self.forcing.night_flushing_on)
        {
            DemandState::HeatingActive
        } else if free_floating.t_air > self.network.cooling_setpoint {
            DemandState::CoolingActive
        } else {
            DemandState::NoDemand
        };

        self.phase = SolverPhase::DirectionKnown {
            demand,
            free_floating,
        };
        Ok(demand)
    }

    /// Node temperatures without heating or cooling.
    pub fn free_floating(&self) -> Result<NodeTemperatures, CalculationError> {
        match self.phase {
            SolverPhase::DirectionKnown { free_floating, .. } => Ok(free_floating),
            _ => Err(CalculationError::StateMachineMisuse(
                "free-floating temperatures requested before the demand direction".into(),
            )),
        }
    }

    /// Calculate the demand that holds the air temperature exactly at the setpoint, in Wh.
    ///
    /// The network is linear in the emitted load, so the air temperatures at zero load and at a
    /// calibration load of 10 W per m2 of floor area determine the load hitting the setpoint
    /// by linear interpolation.
    pub fn calc_energy_demand(&mut self) -> Result<f64, CalculationError> {
        let (demand, free_floating) = match self.phase {
            SolverPhase::DirectionKnown {
                demand: demand @ (DemandState::HeatingActive | DemandState::CoolingActive),
                free_floating,
            } => (demand, free_floating),
            SolverPhase::DirectionKnown {
                demand: DemandState::NoDemand,
                ..
            } => {
                return Err(CalculationError::StateMachineMisuse(
                    "energy demand requested in an hour without demand".into(),
                ))
            }
            _ => {
                return Err(CalculationError::StateMachineMisuse(
                    "energy demand requested before the demand direction was determined".into(),
                ))
            }
        };

        let (calibration_load, setpoint) = match demand {
            DemandState::CoolingActive => (
                -CALIBRATION_LOAD_PER_AREA * self.network.properties.floor_area,
                self.network.cooling_setpoint,
            ),
            _ => (
                CALIBRATION_LOAD_PER_AREA * self.network.properties.floor_area,
                self.network.heating_setpoint(self.forcing.night_flushing_on),
            ),
        };

        let t_air_calibration = self.solve_with_load(demand, calibration_load)?.t_air;
        let temp_response = t_air_calibration - free_floating.t_air;
        if temp_response == 0. {
            return Err(CalculationError::NumericalDegeneracy(format!(
                "air temperature does not respond to a load of {calibration_load} W"
            )));
        }

        let unrestricted_demand =
            calibration_load * (setpoint - free_floating.t_air) / temp_response;
        if !unrestricted_demand.is_finite() {
            return Err(CalculationError::NumericalDegeneracy(format!(
                "unrestricted demand is {unrestricted_demand}"
            )));
        }

        self.phase = SolverPhase::DemandResolved { demand };
        Ok(unrestricted_demand)
    }

    /// Node temperatures with `energy_demand` emitted in the current demand direction.
    pub fn calc_temperatures(&self, energy_demand: f64) -> Result<NodeTemperatures, CalculationError> {
        let demand = match self.phase {
            SolverPhase::DirectionKnown { demand, .. } | SolverPhase::DemandResolved { demand } => {
                demand
            }
            SolverPhase::AwaitingDirection => {
                return Err(CalculationError::StateMachineMisuse(
                    "temperatures requested before the demand direction was determined".into(),
                ))
            }
        };

        if demand == DemandState::NoDemand {
            return self.free_floating();
        }

        self.solve_with_load(demand, energy_demand)
    }

    fn solve_with_load(
        &self,
        demand: DemandState,
        load: f64,
    ) -> Result<NodeTemperatures, CalculationError> {
        let flows = self.network.emission_for(demand).heat_flows(
            load,
            demand,
            &self.network.properties.node_geometry(),
        )?;

        self.network
            .calc_temperatures_crank_nicolson(self.forcing, self.t_m_prev, &flows)
            .ensure_finite("temperatures under load")
    }
}

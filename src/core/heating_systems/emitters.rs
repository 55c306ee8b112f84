// This module provides the emission systems that deliver heating or cooling into the thermal
// network. An emission system decides which node (air, surface or mass) receives the
// energy and at which flow and return temperatures the supply system has to run.

use crate::core::energy_supply::TechnologyMismatchError;
use crate::core::space_heat_demand::thermal_network::DemandState;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, EnumString, Eq, Hash, PartialEq, Serialize,
)]
pub enum EmissionSystemType {
    /// Heated or cooled supply air, delivered to the air node
    AirConditioning,
    /// High temperature radiators, delivered to the surface node
    OldRadiators,
    /// Low temperature radiators, delivered to the surface node
    NewRadiators,
    ChilledBeams,
    /// Underfloor system, shared between surface and mass node
    FloorHeating,
    /// Pipes embedded in the structure, delivered to the mass node
    ThermallyActivated,
    NoHeating,
    NoCooling,
}

/// Geometry of the thermal network needed to split a load between surface and mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    /// Effective mass area A_m, in m2
    pub mass_area: f64,
    /// Area of all surfaces facing the zone A_t, in m2
    pub total_area: f64,
    /// Heat transfer coefficient of windows, in W / K
    pub h_tr_w: f64,
}

/// Emission of one hour's energy demand onto the three nodes, in W (positive heats).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EmissionFlows {
    pub phi_ia_plus: f64,
    pub phi_st_plus: f64,
    pub phi_m_plus: f64,
}

/// Flow and return temperatures of an emission system, in deg C.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct EmissionTemperatures {
    pub supply: f64,
    pub r#return: f64,
}

impl EmissionTemperatures {
    const fn new(supply: f64, r#return: f64) -> Self {
        Self { supply, r#return }
    }

    pub fn undefined() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }
}

/// Routes an energy demand into the thermal network.
pub trait HeatFlowSplitter {
    /// Split `energy_demand` (W, cooling negative) onto the network nodes.
    fn heat_flows(
        &self,
        energy_demand: f64,
        demand: DemandState,
        geometry: &NodeGeometry,
    ) -> Result<EmissionFlows, TechnologyMismatchError>;

    /// Flow and return temperatures for the given demand direction.
    fn temperatures(
        &self,
        demand: DemandState,
    ) -> Result<EmissionTemperatures, TechnologyMismatchError>;
}

impl EmissionSystemType {
    /// Dummy systems stand in for a direction the building cannot serve.
    pub fn is_dummy(&self) -> bool {
        matches!(
            self,
            EmissionSystemType::NoHeating | EmissionSystemType::NoCooling
        )
    }

    pub fn serves(&self, demand: DemandState) -> bool {
        match (self, demand) {
            (_, DemandState::NoDemand) => false,
            (EmissionSystemType::NoHeating, demand) => demand == DemandState::HeatingActive,
            (EmissionSystemType::NoCooling, demand) => demand == DemandState::CoolingActive,
            _ => true,
        }
    }

    fn ensure_serves(&self, demand: DemandState) -> Result<(), TechnologyMismatchError> {
        if self.serves(demand) {
            Ok(())
        } else {
            Err(TechnologyMismatchError::new(self, demand))
        }
    }
}

impl HeatFlowSplitter for EmissionSystemType {
    fn heat_flows(
        &self,
        energy_demand: f64,
        demand: DemandState,
        geometry: &NodeGeometry,
    ) -> Result<EmissionFlows, TechnologyMismatchError> {
        self.ensure_serves(demand)?;

        let flows = match self {
            EmissionSystemType::AirConditioning => EmissionFlows {
                phi_ia_plus: energy_demand,
                ..Default::default()
            },
            EmissionSystemType::OldRadiators
            | EmissionSystemType::NewRadiators
            | EmissionSystemType::ChilledBeams => EmissionFlows {
                phi_st_plus: energy_demand,
                ..Default::default()
            },
            EmissionSystemType::FloorHeating => {
                if geometry.total_area > 0. {
                    let mass_share = geometry.mass_area / geometry.total_area;
                    let surface_share =
                        1. - mass_share - geometry.h_tr_w / (9.1 * geometry.total_area);
                    EmissionFlows {
                        phi_ia_plus: 0.,
                        phi_st_plus: energy_demand * surface_share,
                        phi_m_plus: energy_demand * mass_share,
                    }
                } else {
                    EmissionFlows {
                        phi_st_plus: energy_demand,
                        ..Default::default()
                    }
                }
            }
            EmissionSystemType::ThermallyActivated => EmissionFlows {
                phi_m_plus: energy_demand,
                ..Default::default()
            },
            EmissionSystemType::NoHeating | EmissionSystemType::NoCooling => {
                EmissionFlows::default()
            }
        };

        Ok(flows)
    }

    fn temperatures(
        &self,
        demand: DemandState,
    ) -> Result<EmissionTemperatures, TechnologyMismatchError> {
        self.ensure_serves(demand)?;

        let heating = demand == DemandState::HeatingActive;
        Ok(match self {
            EmissionSystemType::AirConditioning if heating => EmissionTemperatures::new(40., 20.),
            EmissionSystemType::OldRadiators if heating => EmissionTemperatures::new(65., 45.),
            EmissionSystemType::NewRadiators | EmissionSystemType::ChilledBeams if heating => {
                EmissionTemperatures::new(50., 35.)
            }
            EmissionSystemType::FloorHeating if heating => EmissionTemperatures::new(40., 35.),
            EmissionSystemType::ThermallyActivated if heating => {
                EmissionTemperatures::new(28., 25.)
            }
            EmissionSystemType::ChilledBeams | EmissionSystemType::ThermallyActivated => {
                EmissionTemperatures::new(18., 21.)
            }
            EmissionSystemType::NoHeating | EmissionSystemType::NoCooling => {
                EmissionTemperatures::undefined()
            }
            _ => EmissionTemperatures::new(12., 21.),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[fixture]
    fn geometry() -> NodeGeometry {
        // 100 m2 floor area, medium construction
        NodeGeometry {
            mass_area: 250.,
            total_area: 450.,
            h_tr_w: 40.95,
        }
    }

    #[rstest]
    #[case(EmissionSystemType::AirConditioning, 1000., 0., 0.)]
    #[case(EmissionSystemType::OldRadiators, 0., 1000., 0.)]
    #[case(EmissionSystemType::NewRadiators, 0., 1000., 0.)]
    #[case(EmissionSystemType::ChilledBeams, 0., 1000., 0.)]
    #[case(EmissionSystemType::ThermallyActivated, 0., 0., 1000.)]
    fn should_route_demand_to_single_node(
        geometry: NodeGeometry,
        #[case] emission: EmissionSystemType,
        #[case] air: f64,
        #[case] surface: f64,
        #[case] mass: f64,
    ) {
        let flows = emission
            .heat_flows(1000., DemandState::HeatingActive, &geometry)
            .unwrap();

        assert_eq!(
            flows,
            EmissionFlows {
                phi_ia_plus: air,
                phi_st_plus: surface,
                phi_m_plus: mass,
            }
        );
    }

    #[rstest]
    fn should_split_floor_heating_between_surface_and_mass(geometry: NodeGeometry) {
        let flows = EmissionSystemType::FloorHeating
            .heat_flows(900., DemandState::HeatingActive, &geometry)
            .unwrap();

        assert_eq!(flows.phi_ia_plus, 0.);
        assert_relative_eq!(flows.phi_m_plus, 500., max_relative = 1e-9);
        // 900 * (1 - 250/450 - 40.95/(9.1*450)) = 900 * (1 - 0.5556 - 0.01)
        assert_relative_eq!(flows.phi_st_plus, 391., max_relative = 1e-9);
    }

    #[rstest]
    fn should_keep_sign_of_cooling_demand(geometry: NodeGeometry) {
        let flows = EmissionSystemType::AirConditioning
            .heat_flows(-700., DemandState::CoolingActive, &geometry)
            .unwrap();

        assert_eq!(flows.phi_ia_plus, -700.);
    }

    #[rstest]
    fn should_emit_nothing_from_dummy_systems(geometry: NodeGeometry) {
        assert_eq!(
            EmissionSystemType::NoHeating
                .heat_flows(1000., DemandState::HeatingActive, &geometry)
                .unwrap(),
            EmissionFlows::default()
        );
        assert_eq!(
            EmissionSystemType::NoCooling
                .heat_flows(-1000., DemandState::CoolingActive, &geometry)
                .unwrap(),
            EmissionFlows::default()
        );
    }

    #[rstest]
    fn should_reject_direction_outside_role(geometry: NodeGeometry) {
        assert!(EmissionSystemType::NoHeating
            .heat_flows(-10., DemandState::CoolingActive, &geometry)
            .is_err());
        assert!(EmissionSystemType::NoCooling
            .temperatures(DemandState::HeatingActive)
            .is_err());
        for emission in EmissionSystemType::iter() {
            assert!(emission
                .heat_flows(0., DemandState::NoDemand, &geometry)
                .is_err());
        }
    }

    #[rstest]
    #[case(EmissionSystemType::AirConditioning, DemandState::HeatingActive, 40., 20.)]
    #[case(EmissionSystemType::AirConditioning, DemandState::CoolingActive, 12., 21.)]
    #[case(EmissionSystemType::OldRadiators, DemandState::HeatingActive, 65., 45.)]
    #[case(EmissionSystemType::NewRadiators, DemandState::HeatingActive, 50., 35.)]
    #[case(EmissionSystemType::ChilledBeams, DemandState::CoolingActive, 18., 21.)]
    #[case(EmissionSystemType::FloorHeating, DemandState::HeatingActive, 40., 35.)]
    #[case(EmissionSystemType::ThermallyActivated, DemandState::HeatingActive, 28., 25.)]
    #[case(EmissionSystemType::ThermallyActivated, DemandState::CoolingActive, 18., 21.)]
    fn should_report_supply_and_return_temperatures(
        #[case] emission: EmissionSystemType,
        #[case] demand: DemandState,
        #[case] supply: f64,
        #[case] r#return: f64,
    ) {
        assert_eq!(
            emission.temperatures(demand).unwrap(),
            EmissionTemperatures { supply, r#return }
        );
    }

    #[rstest]
    fn should_parse_technology_names() {
        assert_eq!(
            EmissionSystemType::from_str("FloorHeating").unwrap(),
            EmissionSystemType::FloorHeating
        );
        assert_eq!(EmissionSystemType::NoCooling.to_string(), "NoCooling");
    }
}

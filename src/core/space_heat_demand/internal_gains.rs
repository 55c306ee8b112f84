use crate::input::{GainsInput, OccupancySample};

/// Heat gains from occupants, appliances and artificial lighting.
///
/// Arguments:
/// * `gains` - specific gains and lighting parameters per unit of floor area
/// * `floor_area` - energy reference area, in m2
#[derive(Clone, Copy, Debug)]
pub struct InternalGains {
    occupant_gains: f64,
    appliance_gains: f64,
    lighting_load: f64,
    lighting_control: f64,
    lighting_utilisation_factor: f64,
    lighting_maintenance_factor: f64,
    floor_area: f64,
}

impl InternalGains {
    pub fn new(gains: &GainsInput, floor_area: f64) -> Self {
        Self {
            occupant_gains: gains.occupant_gains,
            appliance_gains: gains.appliance_gains,
            lighting_load: gains.lighting_load,
            lighting_control: gains.lighting_control,
            lighting_utilisation_factor: gains.lighting_utilisation_factor,
            lighting_maintenance_factor: gains.lighting_maintenance_factor,
            floor_area,
        }
    }

    /// Electric lighting demand for the hour, in W
    ///
    /// ## Arguments
    /// * `transmitted_illuminance` - daylight entering through all windows, in lumens
    /// * `occupancy` - presence multipliers for the hour
    pub fn lighting_demand(&self, transmitted_illuminance: f64, occupancy: &OccupancySample) -> f64 {
        if occupancy.people > 0. && self.indoor_illuminance(transmitted_illuminance) < self.lighting_control
        {
            self.lighting_load * self.floor_area
        } else {
            0.
        }
    }

    /// Average daylight illuminance on the working plane, in lux
    fn indoor_illuminance(&self, transmitted_illuminance: f64) -> f64 {
        if self.floor_area > 0. {
            transmitted_illuminance
                * self.lighting_utilisation_factor
                * self.lighting_maintenance_factor
                / self.floor_area
        } else {
            0.
        }
    }

    /// Total internal heat gain for the hour, in W, with the lighting demand counted as heat.
    pub fn total_internal_gain_in_w(&self, occupancy: &OccupancySample, lighting_demand: f64) -> f64 {
        occupancy.people * self.occupant_gains * self.floor_area
            + occupancy.appliances * self.appliance_gains * self.floor_area
            + lighting_demand
    }
}

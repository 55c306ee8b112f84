// This module provides an object to represent the air exchange of the building with outside:
// infiltration, mechanical ventilation with heat recovery, window ventilation and summer night
// flushing.

use crate::core::units::ach_to_heat_transfer_coefficient;
use crate::input::VentilationInput;
use crate::simulation_time::SimulationTimeIteration;

/// Indoor air temperature the previous hour must exceed for night flushing, in deg C
const NIGHT_FLUSHING_MIN_TEMP_AIR: f64 = 21.;
/// Minimum excess of indoor over outdoor air temperature for night flushing, in K
const NIGHT_FLUSHING_MIN_TEMP_DIFF: f64 = 2.;

/// Ventilation heat transfer for one hour.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VentilationState {
    /// Ventilation heat transfer coefficient after heat recovery, in W / K
    pub h_ve_adj: f64,
    pub night_flushing_on: bool,
}

#[derive(Clone, Copy, Debug)]
pub struct Ventilation {
    infiltration_ach: f64,
    mechanical_ach: f64,
    window_ach: f64,
    night_flushing_ach: f64,
    heat_recovery_efficiency: f64,
    usage_start_hour: u32,
    usage_end_hour: u32,
    /// Conditioned air volume, in m3
    volume: f64,
}

impl Ventilation {
    pub fn new(input: &VentilationInput, volume: f64) -> Self {
        Self {
            infiltration_ach: input.infiltration_ach,
            mechanical_ach: input.mechanical_ach,
            window_ach: input.window_ach,
            night_flushing_ach: input.night_flushing_ach,
            heat_recovery_efficiency: input.heat_recovery_efficiency,
            usage_start_hour: input.usage_start_hour,
            usage_end_hour: input.usage_end_hour,
            volume,
        }
    }

    /// Whether the building is flushed with cool night air this hour.
    ///
    /// ## Arguments
    /// * `simtime` - current step
    /// * `prev_temp_air` - indoor air temperature of the previous hour, in deg C
    /// * `temp_out` - outdoor air temperature, in deg C
    pub fn night_flushing_on(
        &self,
        simtime: &SimulationTimeIteration,
        prev_temp_air: f64,
        temp_out: f64,
    ) -> bool {
        self.night_flushing_ach > 0.
            && simtime.is_cooling_season()
            && simtime.is_night()
            && prev_temp_air > NIGHT_FLUSHING_MIN_TEMP_AIR
            && prev_temp_air > temp_out + NIGHT_FLUSHING_MIN_TEMP_DIFF
    }

    /// Ventilation heat transfer coefficient for the hour, in W / K.
    ///
    /// Without mechanical or window ventilation only infiltration counts, whatever the hour.
    /// Otherwise night flushing overrides the usage-window rates.
    pub fn h_ve_adj(&self, simtime: &SimulationTimeIteration, night_flushing_on: bool) -> f64 {
        if self.mechanical_ach == 0. && self.window_ach == 0. {
            return self.infiltration_only();
        }

        if night_flushing_on {
            ach_to_heat_transfer_coefficient(self.night_flushing_ach, self.volume)
        } else if simtime.in_usage_window(self.usage_start_hour, self.usage_end_hour) {
            let total_ach = self.infiltration_ach + self.mechanical_ach + self.window_ach;
            // Temperature adjustment factor for the heat recovered from extract air
            let b_ek = 1. - (self.mechanical_ach / total_ach) * self.heat_recovery_efficiency;
            b_ek * ach_to_heat_transfer_coefficient(total_ach, self.volume)
        } else {
            self.infiltration_only()
        }
    }

    pub fn calc(
        &self,
        simtime: &SimulationTimeIteration,
        prev_temp_air: f64,
        temp_out: f64,
    ) -> VentilationState {
        let night_flushing_on = self.night_flushing_on(simtime, prev_temp_air, temp_out);

        VentilationState {
            h_ve_adj: self.h_ve_adj(simtime, night_flushing_on),
            night_flushing_on,
        }
    }

    fn infiltration_only(&self) -> f64 {
        ach_to_heat_transfer_coefficient(self.infiltration_ach, self.volume)
    }
}

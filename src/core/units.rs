pub const SECONDS_PER_HOUR: u32 = 3_600;

/// Volumetric heat capacity of air, in J / (m3.K)
pub const VOLUMETRIC_HEAT_CAPACITY_AIR: f64 = 1_200.;

/// Convert an air change rate, in 1/h, into a ventilation heat transfer coefficient, in W / K
pub(crate) fn ach_to_heat_transfer_coefficient(air_changes_per_hour: f64, volume: f64) -> f64 {
    VOLUMETRIC_HEAT_CAPACITY_AIR * volume * air_changes_per_hour / SECONDS_PER_HOUR as f64
}

/// Heat transfer coefficient of two conductances in series, in W / K.
///
/// Written in product form so that a zero conductance on either side gives zero rather than
/// dividing by zero.
pub(crate) fn series_conductance(first: f64, second: f64) -> f64 {
    let sum = first + second;
    if sum == 0. {
        0.
    } else {
        first * second / sum
    }
}

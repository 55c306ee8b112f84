use crate::external_conditions::SunPosition;
use crate::input::Glazing;
use crate::simulation_time::SimulationTimeIteration;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter};

/// Indoor air temperature above which automatic solar shading is assumed to be deployed, in
/// deg C. This approximates occupant or controller behaviour, it is not derived from physics.
const SHADING_ACTIVATION_TEMP: f64 = 24.;

/// Cardinal direction a facade faces.
#[derive(
    Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize,
)]
pub enum Orientation {
    North,
    East,
    South,
    West,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::North,
        Orientation::East,
        Orientation::South,
        Orientation::West,
    ];

    /// Azimuth of the facade normal in the solar azimuth convention, in degrees (south 0, east
    /// 90, north 180, west 270)
    pub fn azimuth_tilt(&self) -> f64 {
        match self {
            Orientation::South => 0.,
            Orientation::East => 90.,
            Orientation::North => 180.,
            Orientation::West => 270.,
        }
    }
}

/// Solar radiation on a window for one hour, in W.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SolarGains {
    /// Radiation incident on the outside of the glazing
    pub incident_solar: f64,
    /// Radiation transmitted into the zone
    pub solar_gains: f64,
}

/// All glazing on one facade, treated as a single window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Window {
    /// in degrees, south 0 and east positive
    azimuth_tilt: f64,
    /// in degrees from horizontal, 90 = vertical
    altitude_tilt: f64,
    glass_solar_transmittance: f64,
    /// 0 when no shading device is fitted
    glass_solar_shading_transmittance: f64,
    glass_light_transmittance: f64,
    /// in m2
    area: f64,
}

impl Window {
    pub fn new(
        azimuth_tilt: f64,
        altitude_tilt: f64,
        glass_solar_transmittance: f64,
        glass_solar_shading_transmittance: f64,
        glass_light_transmittance: f64,
        area: f64,
    ) -> Self {
        Self {
            azimuth_tilt,
            altitude_tilt,
            glass_solar_transmittance,
            glass_solar_shading_transmittance,
            glass_light_transmittance,
            area,
        }
    }

    pub fn facing(orientation: Orientation, glazing: &Glazing, area: f64) -> Self {
        Self::new(
            orientation.azimuth_tilt(),
            glazing.altitude_tilt,
            glazing.solar_transmittance,
            glazing.shading_transmittance,
            glazing.light_transmittance,
            area,
        )
    }

    pub fn area(&self) -> f64 {
        self.area
    }

    /// Calculate the solar radiation incident on and transmitted through the window.
    ///
    /// The shaded transmittance is used when the previous hour's indoor air was above 24 deg C
    /// inside the cooling season. This is a rule for when automatic shading is deployed, not a
    /// physical law.
    ///
    /// ## Arguments
    /// * `sun` - position of the sun
    /// * `direct_irradiance` - direct normal irradiance, in W / m2
    /// * `diffuse_irradiance` - diffuse horizontal irradiance, in W / m2
    /// * `prev_temp_air` - indoor air temperature of the previous hour, in deg C
    /// * `simtime` - current step
    pub fn calc_solar_gains(
        &self,
        sun: &SunPosition,
        direct_irradiance: f64,
        diffuse_irradiance: f64,
        prev_temp_air: f64,
        simtime: &SimulationTimeIteration,
    ) -> SolarGains {
        let incident_solar = (self.direct_factor(sun) * direct_irradiance
            + self.diffuse_factor() * diffuse_irradiance)
            * self.area;

        let transmittance = if prev_temp_air > SHADING_ACTIVATION_TEMP
            && simtime.is_cooling_season()
            && self.glass_solar_shading_transmittance > 0.
        {
            self.glass_solar_shading_transmittance
        } else {
            self.glass_solar_transmittance
        };

        SolarGains {
            incident_solar,
            solar_gains: incident_solar * transmittance,
        }
    }

    /// Calculate the illuminance transmitted through the window, in lumens.
    pub fn calc_illuminance(
        &self,
        sun: &SunPosition,
        direct_illuminance: f64,
        diffuse_illuminance: f64,
    ) -> f64 {
        (self.direct_factor(sun) * direct_illuminance
            + self.diffuse_factor() * diffuse_illuminance)
            * self.glass_light_transmittance
            * self.area
    }

    /// Cosine of the angle of incidence of beam radiation on the glazing, zero when the sun is
    /// behind the plane of the window.
    fn direct_factor(&self, sun: &SunPosition) -> f64 {
        let altitude = sun.altitude.to_radians();
        let tilt = self.altitude_tilt.to_radians();
        let relative_azimuth = (sun.azimuth - self.azimuth_tilt).to_radians();

        let direct_factor = altitude.cos() * tilt.sin() * relative_azimuth.cos()
            + altitude.sin() * tilt.cos();

        if direct_factor > 0. {
            direct_factor
        } else {
            0.
        }
    }

    /// Share of the sky dome seen by the glazing
    fn diffuse_factor(&self) -> f64 {
        (1. + self.altitude_tilt.to_radians().cos()) / 2.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::*;

    #[fixture]
    fn south_window() -> Window {
        Window::new(0., 90., 0.78, 0.2, 0.82, 1.)
    }

    #[rstest]
    fn should_have_no_gains_with_sun_below_horizon(south_window: Window) {
        let sun = SunPosition {
            altitude: -60.96,
            azimuth: 160.66,
        };

        let gains = south_window.calc_solar_gains(
            &sun,
            0.,
            0.,
            21.,
            &SimulationTimeIteration::at_hour(0),
        );

        assert_eq!(gains.incident_solar, 0.);
        assert_eq!(gains.solar_gains, 0.);
    }

    #[rstest]
    fn should_calc_morning_gains_on_south_facade(south_window: Window) {
        let sun = SunPosition {
            altitude: 3.97,
            azimuth: 44.92,
        };

        let gains = south_window.calc_solar_gains(
            &sun,
            10.,
            31.66,
            21.,
            &SimulationTimeIteration::at_hour(8),
        );

        assert_relative_eq!(gains.incident_solar, 22.89, max_relative = 1e-3);
        assert_relative_eq!(gains.solar_gains, 17.86, max_relative = 1e-3);
    }

    #[rstest]
    fn should_ignore_direct_radiation_from_behind(south_window: Window) {
        let sun = SunPosition {
            altitude: 20.,
            azimuth: 180.,
        };

        let gains = south_window.calc_solar_gains(
            &sun,
            500.,
            0.,
            21.,
            &SimulationTimeIteration::at_hour(4000),
        );

        assert_eq!(gains.incident_solar, 0.);
    }

    #[rstest]
    #[case(25., 4000, 0.2)]
    #[case(24., 4000, 0.78)]
    #[case(25., 100, 0.78)]
    fn should_use_shaded_transmittance_when_hot_in_cooling_season(
        south_window: Window,
        #[case] prev_temp_air: f64,
        #[case] hour: u32,
        #[case] expected_transmittance: f64,
    ) {
        let sun = SunPosition {
            altitude: 40.,
            azimuth: 0.,
        };

        let gains = south_window.calc_solar_gains(
            &sun,
            600.,
            100.,
            prev_temp_air,
            &SimulationTimeIteration::at_hour(hour),
        );

        assert_relative_eq!(
            gains.solar_gains,
            gains.incident_solar * expected_transmittance
        );
    }

    #[rstest]
    fn should_not_shade_without_shading_device() {
        let window = Window::new(0., 90., 0.78, 0., 0.82, 1.);
        let sun = SunPosition {
            altitude: 40.,
            azimuth: 0.,
        };

        let gains =
            window.calc_solar_gains(&sun, 600., 100., 30., &SimulationTimeIteration::at_hour(4000));

        assert_relative_eq!(gains.solar_gains, gains.incident_solar * 0.78);
    }

    #[rstest]
    fn should_scale_illuminance_by_light_transmittance_and_area() {
        let window = Window::new(0., 90., 0.78, 0., 0.5, 2.);
        let sun = SunPosition {
            altitude: 3.97,
            azimuth: 44.92,
        };

        // (0.7063943 * 1000 + 0.5 * 3000) * 0.5 * 2
        assert_relative_eq!(
            window.calc_illuminance(&sun, 1000., 3000.),
            2206.3943,
            max_relative = 1e-6
        );
    }

    #[rstest]
    fn should_see_whole_sky_from_horizontal_window() {
        let roof_light = Window::new(0., 0., 0.6, 0., 0.7, 1.);
        let sun = SunPosition {
            altitude: 30.,
            azimuth: 100.,
        };

        let gains =
            roof_light.calc_solar_gains(&sun, 0., 200., 20., &SimulationTimeIteration::at_hour(0));
        assert_relative_eq!(gains.incident_solar, 200.);
    }

    #[rstest]
    fn should_map_orientation_to_solar_azimuth() {
        assert_eq!(Orientation::South.azimuth_tilt(), 0.);
        assert_eq!(Orientation::East.azimuth_tilt(), 90.);
        assert_eq!(Orientation::North.azimuth_tilt(), 180.);
        assert_eq!(Orientation::West.azimuth_tilt(), 270.);
    }
}

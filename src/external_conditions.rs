use chrono::{Datelike, Duration, NaiveDate, Timelike};
use serde::Deserialize;
use thiserror::Error;

/// External conditions for a single hour, as supplied by the weather collaborator.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct WeatherSample {
    /// Outdoor dry-bulb temperature, in deg C
    pub temp_out: f64,
    /// Direct normal irradiance, in W / m2
    pub direct_normal_irradiance: f64,
    /// Diffuse horizontal irradiance, in W / m2
    pub diffuse_horizontal_irradiance: f64,
    /// Direct normal illuminance, in lux
    pub direct_normal_illuminance: f64,
    /// Diffuse horizontal illuminance, in lux
    pub diffuse_horizontal_illuminance: f64,
    /// Calendar year the sample belongs to
    pub year: i32,
}

/// Position of the sun in the sky.
///
/// Azimuth is measured from south, positive towards east (morning) and negative towards west.
/// When the sun is north of the east-west line the azimuth is reflected and can range up to 270.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SunPosition {
    /// Solar altitude angle, in degrees (negative below the horizon)
    pub altitude: f64,
    /// Solar azimuth angle, in degrees
    pub azimuth: f64,
}

impl SunPosition {
    pub fn is_above_horizon(&self) -> bool {
        self.altitude > 0.
    }
}

#[derive(Debug, Error)]
#[error("year {0} cannot be represented as a calendar date")]
pub struct UnrepresentableYearError(pub i32);

/// Calculate the position of the sun for an hour of the year.
///
/// ## Arguments
/// * `latitude` - latitude of the site, in degrees (north positive)
/// * `longitude` - longitude of the site, in degrees (east positive)
/// * `year` - calendar year
/// * `hour_of_year` - hours elapsed since 1 January 00:00 UTC of `year`
///
/// Declination is approximated with a sinusoid of the axial tilt and the equation of time is the
/// usual three-term fit; both work on the day of the year of the UTC timestamp.
pub fn calc_sun_position(
    latitude: f64,
    longitude: f64,
    year: i32,
    hour_of_year: u32,
) -> Result<SunPosition, UnrepresentableYearError> {
    let latitude_rad = latitude.to_radians();

    let start_of_year = NaiveDate::from_ymd_opt(year, 1, 1)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or(UnrepresentableYearError(year))?;
    let utc_datetime = start_of_year
        .checked_add_signed(Duration::hours(hour_of_year as i64))
        .ok_or(UnrepresentableYearError(year))?;

    let day_of_year = utc_datetime.ordinal() as f64;

    // Angular distance of the sun north or south of the equator
    let declination_rad =
        (23.45 * ((2. * std::f64::consts::PI / 365.) * (day_of_year - 81.)).sin()).to_radians();

    let angle_of_day = (day_of_year - 81.) * (2. * std::f64::consts::PI / 364.);
    // Deviation between local standard time and true solar time, in minutes
    let equation_of_time = 9.87 * (2. * angle_of_day).sin()
        - 7.53 * angle_of_day.cos()
        - 1.5 * angle_of_day.sin();

    let solar_time = ((utc_datetime.hour() * 60 + utc_datetime.minute()) as f64
        + 4. * longitude
        + equation_of_time)
        / 60.;

    let hour_angle_rad = (15. * (12. - solar_time)).to_radians();

    let altitude_rad = (latitude_rad.cos() * declination_rad.cos() * hour_angle_rad.cos()
        + latitude_rad.sin() * declination_rad.sin())
    .asin();

    let azimuth_rad =
        (declination_rad.cos() * hour_angle_rad.sin() / altitude_rad.cos()).asin();

    // asin only covers the southern half of the sky; reflect when the sun is past the
    // east-west line
    let azimuth = if hour_angle_rad.cos() >= declination_rad.tan() / latitude_rad.tan() {
        azimuth_rad.to_degrees()
    } else {
        180. - azimuth_rad.to_degrees()
    };

    Ok(SunPosition {
        altitude: altitude_rad.to_degrees(),
        azimuth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::*;

    const ZURICH_LATITUDE: f64 = 47.480;
    const ZURICH_LONGITUDE: f64 = 8.536;

    #[rstest]
    #[case(0, -64.779715, 163.323331)]
    #[case(8, 5.262757, 47.053746)]
    #[case(12, 19.173546, -7.438352)]
    #[case(3993, 52.228372, 63.271872)]
    #[case(4000, 31.355482, 268.719351)]
    fn should_calc_sun_position_for_zurich(
        #[case] hour_of_year: u32,
        #[case] expected_altitude: f64,
        #[case] expected_azimuth: f64,
    ) {
        let sun =
            calc_sun_position(ZURICH_LATITUDE, ZURICH_LONGITUDE, 2015, hour_of_year).unwrap();

        assert_relative_eq!(sun.altitude, expected_altitude, max_relative = 1e-5);
        assert_relative_eq!(sun.azimuth, expected_azimuth, max_relative = 1e-5);
    }

    #[rstest]
    fn should_be_below_horizon_at_midnight_in_winter() {
        let sun = calc_sun_position(ZURICH_LATITUDE, ZURICH_LONGITUDE, 2015, 0).unwrap();
        assert!(!sun.is_above_horizon());
    }

    #[rstest]
    fn should_be_deterministic() {
        let first = calc_sun_position(ZURICH_LATITUDE, ZURICH_LONGITUDE, 2015, 5000).unwrap();
        let second = calc_sun_position(ZURICH_LATITUDE, ZURICH_LONGITUDE, 2015, 5000).unwrap();
        assert_eq!(first, second);
    }

    #[rstest]
    fn should_reject_unrepresentable_year() {
        assert!(calc_sun_position(ZURICH_LATITUDE, ZURICH_LONGITUDE, i32::MAX, 0).is_err());
    }

    #[rstest]
    fn should_deserialize_weather_sample() {
        let sample: WeatherSample = serde_json::from_str(
            r#"{
                "temp_out": -3.5,
                "direct_normal_irradiance": 120.0,
                "diffuse_horizontal_irradiance": 45.0,
                "direct_normal_illuminance": 11000.0,
                "diffuse_horizontal_illuminance": 5200.0,
                "year": 2015
            }"#,
        )
        .unwrap();

        assert_eq!(sample.temp_out, -3.5);
        assert_eq!(sample.year, 2015);
    }
}

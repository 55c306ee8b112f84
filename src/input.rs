use crate::core::energy_supply::{SupplyRole, SupplySystemType};
use crate::core::heating_systems::emitters::EmissionSystemType;
use crate::core::space_heat_demand::thermal_network::DemandState;
use crate::core::space_heat_demand::window::Orientation;
use crate::external_conditions::WeatherSample;
use anyhow::{anyhow, bail};
use serde::Deserialize;
use serde_valid::Validate;
use smartstring::alias::String;
use std::io::{BufReader, Read};
use tracing::warn;

/// Parse and validate one building parameter record from JSON.
pub fn ingest_building(json: impl Read) -> anyhow::Result<BuildingParameters> {
    let reader = BufReader::new(json);

    let building: BuildingParameters = serde_json::from_reader(reader)?;
    building
        .validate()
        .map_err(|errors| anyhow!("building {} is invalid: {errors}", building.building_id))?;

    Ok(building)
}

/// Parse an hourly weather and occupancy feed from JSON.
pub fn ingest_hourly_feed(json: impl Read) -> anyhow::Result<HourlyFeed> {
    let reader = BufReader::new(json);

    let feed: HourlyFeed = serde_json::from_reader(reader)?;
    feed.validate()
        .map_err(|errors| anyhow!("hourly feed is invalid: {errors}"))?;
    if !(-90. ..=90.).contains(&feed.latitude) || !(-180. ..=180.).contains(&feed.longitude) {
        bail!(
            "site location ({}, {}) is not a valid latitude and longitude",
            feed.latitude,
            feed.longitude
        );
    }
    if feed.weather.len() != feed.occupancy.len() {
        bail!(
            "hourly feed has {} weather samples but {} occupancy samples",
            feed.weather.len(),
            feed.occupancy.len()
        );
    }

    Ok(feed)
}

/// Static description of one building, immutable for the duration of a run.
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct BuildingParameters {
    pub building_id: String,
    /// Energy reference (heated floor) area, in m2. Buildings with no area are skipped, so this
    /// is not bounded here.
    pub energy_ref_area: f64,
    /// Clear room height, in m
    #[validate(exclusive_minimum = 0.)]
    pub room_height: f64,
    /// Number of storeys above ground
    pub floors: u32,
    /// Internal heat capacity per unit of energy reference area, in J / (m2.K)
    #[validate(exclusive_minimum = 0.)]
    pub thermal_capacitance: f64,
    #[validate]
    pub envelope: Envelope,
    #[validate]
    pub glazing: Glazing,
    #[validate]
    pub ventilation: VentilationInput,
    #[validate]
    pub gains: GainsInput,
    /// in deg C
    pub heating_setpoint: f64,
    /// in deg C
    pub cooling_setpoint: f64,
    /// in W / m2; absent means unrestricted
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub max_heating_power_per_floor_area: Option<f64>,
    /// in W / m2, zero or negative; absent means unrestricted
    #[serde(default)]
    #[validate(maximum = 0.)]
    pub max_cooling_power_per_floor_area: Option<f64>,
    pub heating_emission_system: EmissionSystemType,
    pub cooling_emission_system: EmissionSystemType,
    pub heating_supply_system: SupplySystemType,
    pub cooling_supply_system: SupplySystemType,
}

/// Areas per cardinal orientation, in m2.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct OrientedAreas {
    #[validate(minimum = 0.)]
    pub north: f64,
    #[validate(minimum = 0.)]
    pub east: f64,
    #[validate(minimum = 0.)]
    pub south: f64,
    #[validate(minimum = 0.)]
    pub west: f64,
}

impl OrientedAreas {
    pub fn get(&self, orientation: Orientation) -> f64 {
        match orientation {
            Orientation::North => self.north,
            Orientation::East => self.east,
            Orientation::South => self.south,
            Orientation::West => self.west,
        }
    }

    pub fn total(&self) -> f64 {
        self.north + self.east + self.south + self.west
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct Envelope {
    /// Gross wall area including windows
    #[validate]
    pub wall_area: OrientedAreas,
    #[validate]
    pub window_area: OrientedAreas,
    /// in m2; defaults to the base area (energy reference area over number of floors)
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub roof_area: Option<f64>,
    /// Area of the floor against ground or unheated space, in m2; defaults to the base area
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub ground_floor_area: Option<f64>,
    /// U-values, in W / (m2.K)
    #[validate(minimum = 0.)]
    pub u_wall: f64,
    #[validate(minimum = 0.)]
    pub u_roof: f64,
    #[validate(minimum = 0.)]
    pub u_floor: f64,
    #[validate(minimum = 0.)]
    pub u_window: f64,
    /// Temperature adjustment factor for heat loss through the roof
    #[serde(default = "default_adjustment_factor")]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub b_roof: f64,
    /// Temperature adjustment factor for heat loss through the floor
    #[serde(default = "default_adjustment_factor")]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub b_floor: f64,
}

fn default_adjustment_factor() -> f64 {
    1.
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct Glazing {
    /// Total solar energy transmittance (g-value)
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub solar_transmittance: f64,
    /// g-value with shading activated; 0 means no shading device
    #[serde(default)]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub shading_transmittance: f64,
    /// Visible light transmittance
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub light_transmittance: f64,
    /// Tilt of the glazing from horizontal, in degrees (90 = vertical)
    #[serde(default = "default_glazing_tilt")]
    #[validate(minimum = 0.)]
    #[validate(maximum = 180.)]
    pub altitude_tilt: f64,
}

fn default_glazing_tilt() -> f64 {
    90.
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct VentilationInput {
    /// Air change rates, in 1/h
    #[validate(minimum = 0.)]
    pub infiltration_ach: f64,
    #[validate(minimum = 0.)]
    pub mechanical_ach: f64,
    #[validate(minimum = 0.)]
    pub window_ach: f64,
    /// Air change rate during night flushing; 0 disables night flushing
    #[serde(default)]
    #[validate(minimum = 0.)]
    pub night_flushing_ach: f64,
    /// Heat recovery efficiency of the mechanical ventilation
    #[serde(default)]
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub heat_recovery_efficiency: f64,
    /// Start of the occupied-usage window, hour of day
    #[validate(maximum = 23)]
    pub usage_start_hour: u32,
    /// End of the occupied-usage window (exclusive), hour of day; may be before the start
    #[validate(maximum = 23)]
    pub usage_end_hour: u32,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct GainsInput {
    /// Heat gains from occupants at full presence, in W / m2
    #[validate(minimum = 0.)]
    pub occupant_gains: f64,
    /// Heat gains from appliances at full usage, in W / m2
    #[validate(minimum = 0.)]
    pub appliance_gains: f64,
    /// Installed lighting load, in W / m2
    #[validate(minimum = 0.)]
    pub lighting_load: f64,
    /// Indoor illuminance below which lights are switched on, in lux
    #[validate(minimum = 0.)]
    pub lighting_control: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub lighting_utilisation_factor: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub lighting_maintenance_factor: f64,
}

/// Occupancy schedule multipliers for one hour.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct OccupancySample {
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub people: f64,
    #[validate(minimum = 0.)]
    #[validate(maximum = 1.)]
    pub appliances: f64,
}

/// Hour-indexed weather and occupancy feed for one site. Sample `i` belongs to hour `i` of the
/// year, hour 0 starting on 1 January at 00:00 UTC.
#[derive(Clone, Debug, Deserialize, PartialEq, Validate)]
#[serde(deny_unknown_fields)]
pub struct HourlyFeed {
    /// in degrees, north positive
    pub latitude: f64,
    /// in degrees, east positive
    pub longitude: f64,
    pub weather: Vec<WeatherSample>,
    #[validate]
    pub occupancy: Vec<OccupancySample>,
}

impl BuildingParameters {
    /// Buildings without a heated floor area or without any heating plant never enter the
    /// simulation.
    pub fn is_eligible(&self) -> bool {
        self.energy_ref_area > 0. && self.heating_supply_system != SupplySystemType::NoHeating
    }

    pub fn volume(&self) -> f64 {
        self.energy_ref_area * self.room_height
    }

    /// Footprint of the building, used for roof and ground floor when those are not given.
    pub fn base_area(&self) -> f64 {
        if self.floors == 0 {
            warn!(
                building_id = %self.building_id,
                "Building has no floors, base area taken as zero"
            );
            0.
        } else {
            self.energy_ref_area / self.floors as f64
        }
    }

    pub fn roof_area(&self) -> f64 {
        self.envelope
            .roof_area
            .unwrap_or_else(|| self.base_area())
    }

    pub fn ground_floor_area(&self) -> f64 {
        self.envelope
            .ground_floor_area
            .unwrap_or_else(|| self.base_area())
    }

    /// Cross-field rules that cannot be expressed as per-field bounds.
    pub fn check_contract(&self) -> Result<(), String> {
        for orientation in Orientation::ALL {
            let window_area = self.envelope.window_area.get(orientation);
            let wall_area = self.envelope.wall_area.get(orientation);
            if window_area > wall_area {
                return Err(format!(
                    "window area {window_area} m2 exceeds wall area {wall_area} m2 facing {orientation}"
                )
                .into());
            }
        }

        let ventilation = &self.ventilation;
        if ventilation.infiltration_ach + ventilation.mechanical_ach + ventilation.window_ach <= 0. {
            return Err("total air change rate must be greater than zero".into());
        }
        if ventilation.heat_recovery_efficiency > 0. && ventilation.mechanical_ach == 0. {
            return Err(format!(
                "heat recovery efficiency {} given without mechanical ventilation",
                ventilation.heat_recovery_efficiency
            )
            .into());
        }

        if self.heating_setpoint > self.cooling_setpoint {
            return Err(format!(
                "heating setpoint {} deg C is above cooling setpoint {} deg C",
                self.heating_setpoint, self.cooling_setpoint
            )
            .into());
        }

        check_role(
            self.heating_emission_system.serves(DemandState::HeatingActive),
            self.heating_emission_system,
            "heating emission",
        )?;
        check_role(
            self.cooling_emission_system.serves(DemandState::CoolingActive),
            self.cooling_emission_system,
            "cooling emission",
        )?;
        check_role(
            self.heating_supply_system.role() != SupplyRole::Cooling,
            self.heating_supply_system,
            "heating supply",
        )?;
        check_role(
            self.cooling_supply_system.role() != SupplyRole::Heating,
            self.cooling_supply_system,
            "cooling supply",
        )?;

        Ok(())
    }
}

fn check_role(
    serves: bool,
    technology: impl std::fmt::Display,
    slot: &str,
) -> Result<(), String> {
    if serves {
        Ok(())
    } else {
        Err(format!("{technology} cannot be used as {slot} system").into())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;
    use serde_json::json;

    pub(crate) fn building_json() -> serde_json::Value {
        json!({
            "building_id": "B-001",
            "energy_ref_area": 200.0,
            "room_height": 2.5,
            "floors": 2,
            "thermal_capacitance": 165000.0,
            "envelope": {
                "wall_area": {"north": 60.0, "east": 40.0, "south": 60.0, "west": 40.0},
                "window_area": {"north": 8.0, "east": 6.0, "south": 16.0, "west": 6.0},
                "u_wall": 0.4,
                "u_roof": 0.3,
                "u_floor": 0.5,
                "u_window": 1.4,
                "b_floor": 0.6
            },
            "glazing": {
                "solar_transmittance": 0.6,
                "shading_transmittance": 0.2,
                "light_transmittance": 0.7
            },
            "ventilation": {
                "infiltration_ach": 0.3,
                "mechanical_ach": 0.5,
                "window_ach": 0.2,
                "night_flushing_ach": 2.0,
                "heat_recovery_efficiency": 0.7,
                "usage_start_hour": 7,
                "usage_end_hour": 19
            },
            "gains": {
                "occupant_gains": 3.5,
                "appliance_gains": 4.0,
                "lighting_load": 8.0,
                "lighting_control": 300.0,
                "lighting_utilisation_factor": 0.45,
                "lighting_maintenance_factor": 0.9
            },
            "heating_setpoint": 20.0,
            "cooling_setpoint": 26.0,
            "max_heating_power_per_floor_area": 50.0,
            "max_cooling_power_per_floor_area": -40.0,
            "heating_emission_system": "NewRadiators",
            "cooling_emission_system": "AirConditioning",
            "heating_supply_system": "GasBoilerCondensingFrom1995",
            "cooling_supply_system": "AirCooledScrew"
        })
    }

    #[fixture]
    pub(crate) fn building() -> BuildingParameters {
        ingest_building(building_json().to_string().as_bytes()).unwrap()
    }

    #[rstest]
    fn should_ingest_building_with_defaults(building: BuildingParameters) {
        assert_eq!(building.building_id.as_str(), "B-001");
        assert_eq!(building.envelope.b_roof, 1.);
        assert_eq!(building.envelope.b_floor, 0.6);
        assert_eq!(building.glazing.altitude_tilt, 90.);
        assert_eq!(
            building.heating_supply_system,
            SupplySystemType::GasBoilerCondensingFrom1995
        );
        assert_eq!(building.roof_area(), 100.);
        assert_eq!(building.volume(), 500.);
        assert!(building.check_contract().is_ok());
    }

    #[rstest]
    fn should_reject_unknown_fields() {
        let mut json = building_json();
        json["colour"] = json!("red");

        assert!(ingest_building(json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn should_reject_unknown_technology() {
        let mut json = building_json();
        json["heating_supply_system"] = json!("PerpetualMotion");

        assert!(ingest_building(json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    #[case("/glazing/solar_transmittance", json!(1.2))]
    #[case("/envelope/window_area/south", json!(-1.0))]
    #[case("/ventilation/usage_end_hour", json!(24))]
    #[case("/max_cooling_power_per_floor_area", json!(10.0))]
    fn should_reject_out_of_bounds_fields(#[case] pointer: &str, #[case] value: serde_json::Value) {
        let mut json = building_json();
        *json.pointer_mut(pointer).unwrap() = value;

        assert!(ingest_building(json.to_string().as_bytes()).is_err());
    }

    #[rstest]
    fn should_reject_window_larger_than_wall(mut building: BuildingParameters) {
        building.envelope.window_area.east = 41.;

        let reason = building.check_contract().unwrap_err();
        assert!(reason.contains("East"));
    }

    #[rstest]
    fn should_reject_zero_total_air_change(mut building: BuildingParameters) {
        building.ventilation.infiltration_ach = 0.;
        building.ventilation.mechanical_ach = 0.;
        building.ventilation.window_ach = 0.;

        assert!(building.check_contract().is_err());
    }

    #[rstest]
    fn should_reject_heat_recovery_without_mechanical_ventilation(
        mut building: BuildingParameters,
    ) {
        building.ventilation.mechanical_ach = 0.;
        building.ventilation.heat_recovery_efficiency = 0.7;

        let reason = building.check_contract().unwrap_err();
        assert!(reason.contains("heat recovery"));

        building.ventilation.heat_recovery_efficiency = 0.;
        assert!(building.check_contract().is_ok());
    }

    #[rstest]
    fn should_reject_inverted_setpoints(mut building: BuildingParameters) {
        building.heating_setpoint = 27.;

        assert!(building.check_contract().is_err());
    }

    #[rstest]
    fn should_reject_technology_in_wrong_slot(mut building: BuildingParameters) {
        building.heating_supply_system = SupplySystemType::WaterCooledScrew;
        assert!(building.check_contract().is_err());

        building.heating_supply_system = SupplySystemType::HeatPumpAir;
        building.cooling_supply_system = SupplySystemType::HeatPumpAir;
        assert!(building.check_contract().is_ok());

        building.cooling_emission_system = EmissionSystemType::NoHeating;
        assert!(building.check_contract().is_err());
    }

    #[rstest]
    fn should_take_zero_base_area_without_floors(mut building: BuildingParameters) {
        building.floors = 0;

        assert_eq!(building.base_area(), 0.);
        assert_eq!(building.ground_floor_area(), 0.);
    }

    #[rstest]
    #[case(200., SupplySystemType::OilBoilerStandardBefore1986, true)]
    #[case(-8., SupplySystemType::OilBoilerStandardBefore1986, false)]
    #[case(0., SupplySystemType::OilBoilerStandardBefore1986, false)]
    #[case(200., SupplySystemType::NoHeating, false)]
    fn should_decide_eligibility(
        mut building: BuildingParameters,
        #[case] energy_ref_area: f64,
        #[case] heating_supply_system: SupplySystemType,
        #[case] expected: bool,
    ) {
        building.energy_ref_area = energy_ref_area;
        building.heating_supply_system = heating_supply_system;

        assert_eq!(building.is_eligible(), expected);
    }

    #[rstest]
    fn should_reject_feed_of_mismatched_lengths() {
        let json = json!({
            "latitude": 47.48,
            "longitude": 8.536,
            "weather": [{
                "temp_out": 1.0,
                "direct_normal_irradiance": 0.0,
                "diffuse_horizontal_irradiance": 0.0,
                "direct_normal_illuminance": 0.0,
                "diffuse_horizontal_illuminance": 0.0,
                "year": 2015
            }],
            "occupancy": []
        });

        assert!(ingest_hourly_feed(json.to_string().as_bytes()).is_err());
    }
}

pub const HOURS_IN_DAY: u32 = 24;
pub const HOURS_IN_YEAR: u32 = 8760;

// Cooling season used for night flushing and automatic shading, roughly April to October.
// Tied to a Central-European calendar; not configurable per climate zone.
const COOLING_SEASON_START_HOUR: u32 = 2170;
const COOLING_SEASON_END_HOUR: u32 = 6560;

// Local night is hours 0-5 and 23.
const NIGHT_ENDS_HOUR_OF_DAY: u32 = 6;
const NIGHT_STARTS_HOUR_OF_DAY: u32 = 23;

/// Hourly simulation window, in hours of the year (end exclusive).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationTime {
    start_hour: u32,
    end_hour: u32,
}

impl SimulationTime {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }

    /// A full non-leap year of hourly steps.
    pub fn full_year() -> Self {
        Self::new(0, HOURS_IN_YEAR)
    }

    pub fn total_steps(&self) -> usize {
        self.end_hour.saturating_sub(self.start_hour) as usize
    }

    pub fn iter(&self) -> SimulationTimeIterator {
        SimulationTimeIterator {
            current_index: 0,
            simulation_time: *self,
        }
    }
}

#[derive(Clone, Debug)]
pub struct SimulationTimeIterator {
    current_index: usize,
    simulation_time: SimulationTime,
}

impl Iterator for SimulationTimeIterator {
    type Item = SimulationTimeIteration;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_index >= self.simulation_time.total_steps() {
            return None;
        }
        let item = SimulationTimeIteration {
            index: self.current_index,
            hour: self.simulation_time.start_hour + self.current_index as u32,
        };
        self.current_index += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.simulation_time.total_steps() - self.current_index;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for SimulationTimeIterator {}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimulationTimeIteration {
    /// Position of this step within the run
    pub index: usize,
    /// Hour of the year, 0 being the first hour of January
    pub hour: u32,
}

impl SimulationTimeIteration {
    pub fn new(index: usize, hour: u32) -> Self {
        Self { index, hour }
    }

    /// Convenience for a step addressed only by its hour of the year.
    pub fn at_hour(hour: u32) -> Self {
        Self::new(hour as usize, hour)
    }

    pub fn hour_of_day(&self) -> u32 {
        self.hour % HOURS_IN_DAY
    }

    pub fn is_cooling_season(&self) -> bool {
        (COOLING_SEASON_START_HOUR..=COOLING_SEASON_END_HOUR).contains(&self.hour)
    }

    pub fn is_night(&self) -> bool {
        let hour_of_day = self.hour_of_day();
        hour_of_day < NIGHT_ENDS_HOUR_OF_DAY || hour_of_day >= NIGHT_STARTS_HOUR_OF_DAY
    }

    /// Whether the hour of day falls inside an occupied-usage window. A window whose start is
    /// after its end wraps around midnight (e.g. 22 to 6).
    pub fn in_usage_window(&self, start_hour_of_day: u32, end_hour_of_day: u32) -> bool {
        let hour_of_day = self.hour_of_day();
        if start_hour_of_day <= end_hour_of_day {
            (start_hour_of_day..end_hour_of_day).contains(&hour_of_day)
        } else {
            hour_of_day >= start_hour_of_day || hour_of_day < end_hour_of_day
        }
    }
}

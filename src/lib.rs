pub mod core;
pub mod corpus;
pub mod errors;
pub mod external_conditions;
pub mod input;
pub mod output;
pub mod simulation_time;

use crate::corpus::Corpus;
pub use crate::errors::{CalculationError, HbemError};
use crate::input::{ingest_building, ingest_hourly_feed, BuildingParameters, HourlyFeed};
pub use crate::output::HourlyResult;
use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use smartstring::alias::String;
use std::io::Read;
use tracing::{error, info};

/// Parse one building and its hourly feed from JSON and simulate the year.
pub fn run_project(
    building_json: impl Read,
    feed_json: impl Read,
) -> Result<Vec<HourlyResult>, HbemError> {
    let building = ingest_building(building_json)?;
    let feed = ingest_hourly_feed(feed_json)?;

    run_building(&building, &feed)
}

/// Simulate one building for a full year.
///
/// A building without energy reference area or without a heating technology is not simulated
/// and produces no rows.
pub fn run_building(
    building: &BuildingParameters,
    feed: &HourlyFeed,
) -> Result<Vec<HourlyResult>, HbemError> {
    if !building.is_eligible() {
        info!(
            building_id = building.building_id.as_str(),
            "skipping building without energy reference area or heating system"
        );
        return Ok(vec![]);
    }

    building
        .check_contract()
        .map_err(|reason| HbemError::InputContract {
            building_id: building.building_id.clone(),
            reason,
        })?;

    let corpus = Corpus::from_inputs(building);
    corpus.run(feed).inspect_err(|err| {
        error!(building_id = corpus.building_id(), "run aborted: {err}");
    })
}

/// Simulate many buildings against the same feed, one building per worker.
///
/// Results are keyed by building id in input order. Ineligible buildings are left out. Building
/// ids must be unique within the batch.
pub fn run_buildings(
    buildings: &[BuildingParameters],
    feed: &HourlyFeed,
) -> Result<IndexMap<String, Vec<HourlyResult>>, HbemError> {
    let mut building_ids = IndexSet::with_capacity(buildings.len());
    for building in buildings {
        if !building_ids.insert(building.building_id.as_str()) {
            return Err(HbemError::InputContract {
                building_id: building.building_id.clone(),
                reason: "building id appears more than once in the batch".into(),
            });
        }
    }

    let results = buildings
        .par_iter()
        .map(|building| {
            run_building(building, feed).map(|results| (building.building_id.clone(), results))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(results
        .into_iter()
        .filter(|(_, results)| !results.is_empty())
        .collect())
}

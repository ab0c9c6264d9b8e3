use crate::domain::{ScheduleItem, Trip};
use crate::persistence::{atomic_write, backup_file, read_file};
use anyhow::{Context, Result};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

const SEED_SCHEDULE: &str = include_str!("../../data/seed_schedule.json");
const SEED_TRIP: &str = include_str!("../../data/seed_trip.json");

/// Built-in sample schedule used when nothing usable is stored
pub fn seed_schedule() -> Vec<ScheduleItem> {
    match parse_schedule(SEED_SCHEDULE) {
        Ok(items) => items,
        Err(e) => {
            error!("built-in schedule is unreadable: {:#}", e);
            Vec::new()
        }
    }
}

/// Built-in sample trip metadata
pub fn seed_trip() -> Trip {
    match serde_json::from_str(SEED_TRIP) {
        Ok(trip) => trip,
        Err(e) => {
            error!("built-in trip is unreadable: {}", e);
            Trip::default()
        }
    }
}

/// Parse a stored collection, repairing duplicate ids
pub fn parse_schedule(content: &str) -> Result<Vec<ScheduleItem>> {
    let mut items: Vec<ScheduleItem> =
        serde_json::from_str(content).context("Failed to parse schedule")?;

    let mut seen = HashSet::new();
    for item in items.iter_mut() {
        if !seen.insert(item.id) {
            let fresh = Uuid::new_v4();
            warn!(old = %item.id, new = %fresh, name = %item.name, "duplicate item id, reassigning");
            item.id = fresh;
            seen.insert(fresh);
        }
    }

    Ok(items)
}

/// Load the schedule; anything missing, empty or unparsable yields the seed.
/// An unparsable file is backed up before it can be overwritten.
pub fn load_schedule(path: &Path) -> Vec<ScheduleItem> {
    let content = match read_file(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("could not read stored schedule, using seed: {:#}", e);
            return seed_schedule();
        }
    };

    if content.trim().is_empty() {
        info!("no stored schedule, starting from seed");
        return seed_schedule();
    }

    match parse_schedule(&content) {
        Ok(items) if !items.is_empty() => {
            debug!(count = items.len(), "loaded stored schedule");
            items
        }
        Ok(_) => {
            info!("stored schedule is empty, starting from seed");
            seed_schedule()
        }
        Err(e) => {
            warn!("stored schedule is malformed, using seed: {:#}", e);
            match backup_file(path) {
                Ok(backup) => info!(path = %backup.display(), "backed up malformed schedule"),
                Err(e) => warn!("could not back up malformed schedule: {:#}", e),
            }
            seed_schedule()
        }
    }
}

/// Write the full collection
pub fn persist_schedule(path: &Path, items: &[ScheduleItem]) -> Result<()> {
    let json = serde_json::to_string_pretty(items).context("Failed to serialize schedule")?;
    atomic_write(path, &json)
}

/// Load trip metadata, falling back to the built-in trip
pub fn load_trip(path: &Path) -> Trip {
    let content = match read_file(path) {
        Ok(content) if !content.trim().is_empty() => content,
        Ok(_) => return seed_trip(),
        Err(e) => {
            warn!("could not read trip file, using built-in trip: {:#}", e);
            return seed_trip();
        }
    };

    match serde_json::from_str(&content) {
        Ok(trip) => trip,
        Err(e) => {
            warn!("trip file is malformed, using built-in trip: {}", e);
            seed_trip()
        }
    }
}

pub fn save_trip(path: &Path, trip: &Trip) -> Result<()> {
    let json = serde_json::to_string_pretty(trip).context("Failed to serialize trip")?;
    atomic_write(path, &json)
}

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One day tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripDay {
    pub date: String,
    #[serde(default)]
    pub weekday: String,
}

/// One leg of the flight plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FlightLeg {
    pub flight: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub from: String,
    #[serde(default)]
    pub to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Flights {
    #[serde(default)]
    pub outbound: FlightLeg,
    #[serde(default)]
    pub inbound: FlightLeg,
}

/// Where the night is spent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stay {
    pub date: String,
    pub name: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub note: String,
}

/// A travel phrase card
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Phrase {
    pub label: String,
    pub local: String,
    #[serde(default)]
    pub romanized: String,
}

/// Trip-level metadata that is not part of the schedule itself
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub days: Vec<TripDay>,
    /// date -> (branch tag -> branch title)
    #[serde(default)]
    pub plans: BTreeMap<String, BTreeMap<String, String>>,
    #[serde(default)]
    pub flights: Flights,
    #[serde(default)]
    pub accommodations: Vec<Stay>,
    #[serde(default)]
    pub phrases: Vec<Phrase>,
}

impl Trip {
    /// Branches configured for a date, if the day is split into alternatives
    pub fn branches_for(&self, date: &str) -> Option<&BTreeMap<String, String>> {
        self.plans.get(date).filter(|b| !b.is_empty())
    }

    pub fn has_branches(&self, date: &str) -> bool {
        self.branches_for(date).is_some()
    }

    /// Branch selected by default when switching to a day ("A" on split days)
    pub fn default_branch(&self, date: &str) -> Option<String> {
        self.branches_for(date)
            .and_then(|b| b.keys().next().cloned())
    }

    /// Branch after `current` for the date, wrapping around
    pub fn next_branch(&self, date: &str, current: Option<&str>) -> Option<String> {
        let branches = self.branches_for(date)?;
        let tags: Vec<&String> = branches.keys().collect();
        let idx = current
            .and_then(|c| tags.iter().position(|t| t.as_str() == c))
            .map(|i| (i + 1) % tags.len())
            .unwrap_or(0);
        tags.get(idx).map(|t| t.to_string())
    }

    pub fn day_index(&self, date: &str) -> Option<usize> {
        self.days.iter().position(|d| d.date == date)
    }

    pub fn stay_for(&self, date: &str) -> Option<&Stay> {
        self.accommodations.iter().find(|s| s.date == date)
    }

    /// Day labels to show as tabs; falls back to the dates found in the schedule
    pub fn tab_dates(&self, schedule_dates: &[String]) -> Vec<String> {
        if self.days.is_empty() {
            let mut dates: Vec<String> = schedule_dates.to_vec();
            dates.sort();
            dates.dedup();
            dates
        } else {
            self.days.iter().map(|d| d.date.clone()).collect()
        }
    }
}

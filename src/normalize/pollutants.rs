//! Turns a station's raw pollutant readings into the list of canonical
//! pollutant names it currently reports.

use crate::types::station::{CandidateStation, PollutantReading};
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

/// Readings whose end is at or before 00:00 UTC on this date are expired.
pub const DEFAULT_VALIDITY_CUTOFF: NaiveDate = match NaiveDate::from_ymd_opt(2017, 12, 31) {
    Some(date) => date,
    None => panic!("invalid cutoff date"),
};

/// Raw instrument code to display name. Codes not listed pass through unchanged.
pub const CANONICAL_NAMES: &[(&str, &str)] = &[
    ("PM25", "PM2.5"),
    ("GR25", "PM2.5"),
    ("MP10", "PM10"),
    ("GE10", "PM10"),
    ("GR10", "PM10"),
    ("NO2", "Nitrogen dioxide"),
    ("O3", "Ozone"),
    ("SO2", "Sulphur dioxide"),
];

/// Display order for canonical names. Anything else goes last.
pub const PRIORITY_ORDER: [&str; 5] = [
    "PM2.5",
    "PM10",
    "Nitrogen dioxide",
    "Ozone",
    "Sulphur dioxide",
];

pub fn canonical_name(code: &str) -> &str {
    CANONICAL_NAMES
        .iter()
        .find(|(raw, _)| *raw == code)
        .map_or(code, |(_, name)| *name)
}

fn priority(name: &str) -> usize {
    PRIORITY_ORDER
        .iter()
        .position(|listed| *listed == name)
        .unwrap_or(PRIORITY_ORDER.len())
}

/// Sorts canonical names into display order. Unlisted names keep their
/// relative order after all listed ones.
pub fn order_by_priority(mut names: Vec<String>) -> Vec<String> {
    names.sort_by_key(|name| priority(name));
    names
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollutantNormalizer {
    cutoff: DateTime<Utc>,
}

impl Default for PollutantNormalizer {
    fn default() -> Self {
        Self::new(DEFAULT_VALIDITY_CUTOFF)
    }
}

impl PollutantNormalizer {
    pub fn new(cutoff: NaiveDate) -> Self {
        Self {
            cutoff: cutoff.and_time(NaiveTime::MIN).and_utc(),
        }
    }

    fn is_current(&self, end_date: Option<DateTime<Utc>>) -> bool {
        end_date.map_or(true, |end| end > self.cutoff)
    }

    /// A reading is valid when it has not expired and either carries a
    /// positive value, or carries no value but has a start date.
    pub fn is_valid(&self, reading: &PollutantReading) -> bool {
        match reading.value {
            Some(value) => value > 0.0 && self.is_current(reading.end_date),
            None => reading.start_date.is_some() && self.is_current(reading.end_date),
        }
    }

    /// Canonical names of the valid readings, deduplicated, in feed order.
    pub fn collect_canonical(&self, station: &CandidateStation) -> Vec<String> {
        let mut names: Vec<String> = Vec::with_capacity(station.pollutants.len());
        for reading in station.pollutants.iter().filter(|r| self.is_valid(r)) {
            let name = canonical_name(&reading.code);
            if !names.iter().any(|seen| seen == name) {
                names.push(name.to_string());
            }
        }
        names
    }

    /// Canonical names of the valid readings, deduplicated and in display
    /// order. Empty if the station reports nothing valid.
    pub fn normalize_pollutants(&self, station: &CandidateStation) -> Vec<String> {
        order_by_priority(self.collect_canonical(station))
    }
}

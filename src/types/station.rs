//! Defines the candidate station records handed to the locator by the upstream
//! measurements feed, together with their pollutant readings.
//!
//! Records are deserialized leniently: optional fields default instead of
//! failing, so that only genuinely unusable records are rejected (see
//! [`crate::parse_candidates`]). A pollutant entry that cannot be read is kept
//! as an empty reading, which never counts as valid.

use crate::types::lat_lon::LatLon;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A monitoring station as reported by the measurements feed.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateStation {
    /// The region the station belongs to (e.g. "Greater London").
    #[serde(default)]
    pub area: String,
    /// Two space-separated tokens, e.g. "Urban Background".
    #[serde(default)]
    pub area_type: String,
    /// Local site identifier. Stations without one are never reported.
    #[serde(rename = "localSiteID", default)]
    pub local_site_id: Option<String>,
    pub name: String,
    /// Last update timestamp, passed through verbatim.
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub location: Option<StationLocation>,
    /// Readings in the order the feed listed them.
    #[serde(default, deserialize_with = "deserialize_pollutants")]
    pub pollutants: Vec<PollutantReading>,
}

impl CandidateStation {
    /// The station's coordinates, if its location record is usable.
    pub fn point(&self) -> Option<LatLon> {
        self.location.as_ref().and_then(StationLocation::point)
    }
}

/// GeoJSON-like location record. `coordinates` holds `[latitude, longitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationLocation {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub coordinates: Vec<f64>,
}

impl StationLocation {
    pub fn point(&self) -> Option<LatLon> {
        match self.coordinates.as_slice() {
            [lat, lon, ..] => Some(LatLon(*lat, *lon)).filter(LatLon::is_finite),
            _ => None,
        }
    }
}

/// A single pollutant reading keyed by its raw instrument code.
///
/// Dates are instants in UTC; a bare calendar date means its midnight.
#[derive(Debug, Clone, PartialEq)]
pub struct PollutantReading {
    pub code: String,
    pub value: Option<f64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl PollutantReading {
    /// A reading with nothing usable in it.
    pub fn empty(code: String) -> Self {
        Self {
            code,
            value: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawReading {
    #[serde(default)]
    value: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    start_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_lenient_date")]
    end_date: Option<DateTime<Utc>>,
}

impl RawReading {
    fn into_reading(self, code: String) -> PollutantReading {
        PollutantReading {
            code,
            value: self.value,
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

// Walks the map directly so upstream key order is kept.
fn deserialize_pollutants<'de, D>(deserializer: D) -> Result<Vec<PollutantReading>, D::Error>
where
    D: Deserializer<'de>,
{
    struct PollutantsVisitor;

    impl<'de> Visitor<'de> for PollutantsVisitor {
        type Value = Vec<PollutantReading>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of pollutant code to reading")
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut readings = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((code, raw)) = map.next_entry::<String, serde_json::Value>()? {
                let reading = match RawReading::deserialize(raw) {
                    Ok(raw) => raw.into_reading(code),
                    Err(_) => PollutantReading::empty(code),
                };
                readings.push(reading);
            }
            Ok(readings)
        }
    }

    deserializer.deserialize_any(PollutantsVisitor)
}

/// Accepts `null`, a plain `YYYY-MM-DD` date (midnight UTC), an RFC 3339
/// timestamp, or a `YYYY-MM-DD HH:MM:SS` timestamp taken as UTC.
fn deserialize_lenient_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }
    parse_instant(raw)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("unrecognised date '{raw}'")))
}

fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(raw) {
        return Some(timestamp.to_utc());
    }
    if let Ok(local) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(local.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            raw.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        })?;
    Some(date.and_time(NaiveTime::MIN).and_utc())
}

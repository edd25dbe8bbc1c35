//! Place-name lookup results used to resolve the search origin.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which gazetteer produced the place matches, and therefore which fields
/// carry the grid reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LocationKind {
    /// OS Places gazetteer: easting/northing under `GAZETTEER_ENTRY`.
    #[default]
    UkLocation,
    /// Northern Ireland lookup: `xCoordinate` / `yCoordinate` on the match itself.
    NorthernIreland,
}

impl LocationKind {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            LocationKind::UkLocation => "uk-location",
            LocationKind::NorthernIreland => "ni-location",
        }
    }
}

impl fmt::Display for LocationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single place match. Covers both gazetteer shapes; which fields are read
/// depends on the [`LocationKind`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlaceMatch {
    #[serde(rename = "GAZETTEER_ENTRY", default, skip_serializing_if = "Option::is_none")]
    pub gazetteer_entry: Option<GazetteerEntry>,
    #[serde(rename = "xCoordinate", default, skip_serializing_if = "Option::is_none")]
    pub x_coordinate: Option<f64>,
    #[serde(rename = "yCoordinate", default, skip_serializing_if = "Option::is_none")]
    pub y_coordinate: Option<f64>,
}

impl PlaceMatch {
    /// A gazetteer-style match at the given easting/northing.
    pub fn gazetteer(easting: f64, northing: f64) -> Self {
        Self {
            gazetteer_entry: Some(GazetteerEntry {
                name: None,
                geometry_x: Some(easting),
                geometry_y: Some(northing),
            }),
            ..Self::default()
        }
    }

    /// A Northern Ireland style match at the given x/y.
    pub fn grid_point(x: f64, y: f64) -> Self {
        Self {
            x_coordinate: Some(x),
            y_coordinate: Some(y),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct GazetteerEntry {
    #[serde(rename = "NAME1", default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub geometry_x: Option<f64>,
    #[serde(default)]
    pub geometry_y: Option<f64>,
}

//! Geographic points used throughout the locator.

use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are decimal degrees.
///
/// # Examples
///
/// ```
/// use monitor_locate::LatLon;
///
/// let london = LatLon(51.5074, -0.1278);
/// assert_eq!(london.0, 51.5074); // Latitude
/// assert_eq!(london.1, -0.1278); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.0.is_finite() && self.1.is_finite()
    }
}

/// The resolved search origin as reported back to the caller.
///
/// Both fields are unset when the origin could not be resolved, in which case
/// it serializes as an empty object (`{}`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lon: Option<f64>,
}

impl Origin {
    /// An origin with neither coordinate set.
    pub fn unset() -> Self {
        Self::default()
    }

    pub fn is_unset(&self) -> bool {
        self.as_lat_lon().is_none()
    }

    /// Returns the point only if both coordinates are present and finite.
    pub fn as_lat_lon(&self) -> Option<LatLon> {
        match (self.lat, self.lon) {
            (Some(lat), Some(lon)) => Some(LatLon(lat, lon)).filter(LatLon::is_finite),
            _ => None,
        }
    }
}

impl From<LatLon> for Origin {
    fn from(point: LatLon) -> Self {
        Self {
            lat: Some(point.0),
            lon: Some(point.1),
        }
    }
}

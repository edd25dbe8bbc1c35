//! Output records produced by [`crate::StationLocator`].

use crate::types::lat_lon::Origin;
use crate::types::station::StationLocation;
use serde::{Deserialize, Serialize};

/// A station within the search radius, annotated with the pollutants it
/// currently reports under their canonical names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedStation {
    pub region: String,
    /// The feed's `areaType` with its two tokens swapped ("Background Urban").
    pub site_type: String,
    #[serde(rename = "localSiteID")]
    pub local_site_id: String,
    pub location: StationLocation,
    /// The station name with all spaces removed.
    pub id: String,
    pub name: String,
    pub updated: Option<String>,
    /// Great-circle distance from the origin in miles, one decimal place.
    pub distance: String,
    /// Canonical pollutant names, unique and in priority order. Never empty.
    pub pollutants: Vec<String>,
}

impl NormalizedStation {
    /// The numeric value of [`NormalizedStation::distance`].
    pub fn distance_miles(&self) -> f64 {
        self.distance.parse().unwrap_or(f64::INFINITY)
    }
}

/// The result of a nearest-station search.
///
/// Always well formed: when nothing could be resolved `stations` is empty and
/// `origin` serializes as `{}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub stations: Vec<NormalizedStation>,
    pub origin: Origin,
}

impl ResultEnvelope {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

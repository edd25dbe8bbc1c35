//! Finds the air-quality monitoring stations around a UK place and reports
//! which pollutants each one currently measures.
//!
//! ```
//! use monitor_locate::{CandidateStation, LocationKind, PlaceMatch, StationLocator};
//! use serde_json::json;
//!
//! let places = vec![PlaceMatch::gazetteer(530_034.0, 180_381.0)];
//! let stations: Vec<CandidateStation> = serde_json::from_value(json!([{
//!     "area": "Greater London",
//!     "areaType": "Urban Background",
//!     "localSiteID": "BL0",
//!     "name": "London Bloomsbury",
//!     "location": { "type": "Point", "coordinates": [51.52229, -0.125889] },
//!     "pollutants": { "NO2": { "value": 21.0, "startDate": "2020-01-01", "endDate": null } }
//! }]))
//! .unwrap();
//!
//! let result = StationLocator::new().resolve_nearest_stations(
//!     &places,
//!     &stations,
//!     LocationKind::UkLocation,
//!     8_046.72, // 5 miles
//!     0,
//! );
//! assert_eq!(result.stations[0].id, "LondonBloomsbury");
//! assert_eq!(result.stations[0].site_type, "Background Urban");
//! assert_eq!(result.stations[0].pollutants, ["Nitrogen dioxide"]);
//! ```

mod coordinates;
mod diagnostics;
mod error;
mod fetch;
mod normalize;
mod options;
mod stations;
mod types;

pub use error::LocateError;
pub use options::LocatorOptions;

pub use coordinates::error::ConversionError;
pub use coordinates::os_grid::{Datum, GridRef};
pub use coordinates::resolver::{grid_reference_for, resolve_origin};

pub use diagnostics::{DiagnosticSink, LogSink, NoopSink};

pub use normalize::pollutants::{
    canonical_name, order_by_priority, PollutantNormalizer, CANONICAL_NAMES,
    DEFAULT_VALIDITY_CUTOFF, PRIORITY_ORDER,
};
pub use normalize::site::{site_type, station_id};

pub use stations::candidate_selector::{coordinates_total, CandidateSelector, DEFAULT_CANDIDATE_LIMIT};
pub use stations::candidates::parse_candidates;
pub use stations::distance::{DistanceEngine, HaversineEngine, EARTH_RADIUS_M};
pub use stations::locate_station::{resolve_nearest_stations, StationLocator};

pub use types::lat_lon::{LatLon, Origin};
pub use types::normalized::{NormalizedStation, ResultEnvelope};
pub use types::place::{GazetteerEntry, LocationKind, PlaceMatch};
pub use types::station::{CandidateStation, PollutantReading, StationLocation};

pub use fetch::client::{ClientConfig, MonitoringStationClient};
pub use fetch::error::FetchError;
pub use fetch::request::{SearchRequest, METRES_PER_MILE};

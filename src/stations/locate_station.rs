use crate::coordinates::resolver::resolve_origin;
use crate::diagnostics::{DiagnosticSink, LogSink};
use crate::normalize::pollutants::{order_by_priority, PollutantNormalizer};
use crate::normalize::site::{site_type, station_id};
use crate::options::LocatorOptions;
use crate::stations::candidate_selector::{coordinates_total, CandidateSelector};
use crate::stations::distance::{DistanceEngine, HaversineEngine};
use crate::types::lat_lon::LatLon;
use crate::types::normalized::{NormalizedStation, ResultEnvelope};
use crate::types::place::{LocationKind, PlaceMatch};
use crate::types::station::{CandidateStation, StationLocation};
use ordered_float::OrderedFloat;
use std::sync::Arc;

/// Resolves the monitoring stations around a place.
///
/// The locator holds no per-request state and can be shared between threads.
#[derive(Clone)]
pub struct StationLocator<E: DistanceEngine = HaversineEngine> {
    options: LocatorOptions,
    engine: E,
    sink: Arc<dyn DiagnosticSink>,
}

// A station that passed the radius, site-ID and pollutant checks, with its
// pollutant names still in feed order.
struct StationDraft<'a> {
    station: &'a CandidateStation,
    local_site_id: &'a str,
    point: LatLon,
    distance: String,
    sort_key: OrderedFloat<f64>,
    pollutants: Vec<String>,
}

impl StationDraft<'_> {
    fn finalize(self) -> NormalizedStation {
        let station = self.station;
        let kind = station
            .location
            .as_ref()
            .map(|location| location.kind.clone())
            .unwrap_or_default();
        NormalizedStation {
            region: station.area.clone(),
            site_type: site_type(&station.area_type),
            local_site_id: self.local_site_id.to_string(),
            location: StationLocation {
                kind,
                coordinates: vec![self.point.0, self.point.1],
            },
            id: station_id(&station.name),
            name: station.name.clone(),
            updated: station.updated.clone(),
            distance: self.distance,
            pollutants: order_by_priority(self.pollutants),
        }
    }
}

impl Default for StationLocator<HaversineEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl StationLocator<HaversineEngine> {
    pub fn new() -> Self {
        Self::with_options(LocatorOptions::default())
    }

    pub fn with_options(options: LocatorOptions) -> Self {
        Self {
            options,
            engine: HaversineEngine,
            sink: Arc::new(LogSink),
        }
    }
}

impl<E: DistanceEngine> StationLocator<E> {
    /// Replaces the distance engine.
    pub fn with_engine<F: DistanceEngine>(self, engine: F) -> StationLocator<F> {
        StationLocator {
            options: self.options,
            engine,
            sink: self.sink,
        }
    }

    /// Replaces the diagnostic sink (defaults to [`LogSink`]).
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &LocatorOptions {
        &self.options
    }

    /// Finds the stations within `radius_m` metres of the place
    /// `origin_source[index]`, nearest first.
    ///
    /// Stations are only reported if they have a local site ID and at least
    /// one valid pollutant reading. This never fails: unusable input yields
    /// an empty (or partial) result and a diagnostic message.
    pub fn resolve_nearest_stations(
        &self,
        origin_source: &[PlaceMatch],
        stations: &[CandidateStation],
        kind: LocationKind,
        radius_m: f64,
        index: usize,
    ) -> ResultEnvelope {
        if origin_source.is_empty() || stations.is_empty() {
            self.sink.info(&format!(
                "Nothing to search: {} place matches, {} stations",
                origin_source.len(),
                stations.len()
            ));
            return ResultEnvelope::empty();
        }

        let origin = resolve_origin(
            origin_source,
            kind,
            index,
            self.options.datum,
            self.sink.as_ref(),
        );
        let Some(origin_point) = origin.as_lat_lon() else {
            return ResultEnvelope::empty();
        };

        let located = coordinates_total(stations).len();
        if located < stations.len() {
            self.sink.info(&format!(
                "Ignoring {} stations without usable coordinates",
                stations.len() - located
            ));
        }

        let selector = CandidateSelector::new(&self.engine, self.options.candidate_limit);
        let in_range = selector.select_within_radius(origin_point, stations, radius_m);
        let normalizer = PollutantNormalizer::new(self.options.validity_cutoff);

        let mut drafts: Vec<StationDraft<'_>> = in_range
            .into_iter()
            .filter_map(|station| self.draft(origin_point, station, &normalizer))
            .collect();
        // Sort once, then reshape pollutants; the sort key is not touched again.
        drafts.sort_by_key(|draft| draft.sort_key);
        let stations: Vec<NormalizedStation> =
            drafts.into_iter().map(StationDraft::finalize).collect();

        self.sink.info(&format!(
            "Found {} monitoring stations within {:.0} m of ({:.5}, {:.5})",
            stations.len(),
            radius_m,
            origin_point.0,
            origin_point.1
        ));
        ResultEnvelope { stations, origin }
    }

    fn draft<'a>(
        &self,
        origin: LatLon,
        station: &'a CandidateStation,
        normalizer: &PollutantNormalizer,
    ) -> Option<StationDraft<'a>> {
        let local_site_id = station.local_site_id.as_deref()?;
        let point = station.point()?;
        let pollutants = normalizer.collect_canonical(station);
        if pollutants.is_empty() {
            return None;
        }

        let miles = self.engine.distance_miles(origin, point);
        let distance = format!("{miles:.1}");
        let sort_key = OrderedFloat(distance.parse().unwrap_or(miles));
        Some(StationDraft {
            station,
            local_site_id,
            point,
            distance,
            sort_key,
            pollutants,
        })
    }
}

/// [`StationLocator::resolve_nearest_stations`] with default options, logging
/// through the `log` facade.
pub fn resolve_nearest_stations(
    origin_source: &[PlaceMatch],
    stations: &[CandidateStation],
    kind: LocationKind,
    radius_m: f64,
    index: usize,
) -> ResultEnvelope {
    StationLocator::new().resolve_nearest_stations(origin_source, stations, kind, radius_m, index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::testing::{Level, RecordingSink};
    use crate::diagnostics::NoopSink;
    use crate::stations::distance::EARTH_RADIUS_M;
    use crate::types::lat_lon::Origin;
    use serde_json::{json, Value};

    // Grid reference of central London and its OSGB36 lat/lon.
    const ORIGIN_E: f64 = 530_034.0;
    const ORIGIN_N: f64 = 180_381.0;

    fn places() -> Vec<PlaceMatch> {
        vec![PlaceMatch::gazetteer(ORIGIN_E, ORIGIN_N)]
    }

    fn origin_point() -> LatLon {
        resolve_origin(
            &places(),
            LocationKind::UkLocation,
            0,
            Default::default(),
            &NoopSink,
        )
        .as_lat_lon()
        .unwrap()
    }

    fn current(value: f64) -> Value {
        json!({ "value": value, "startDate": "2020-01-01", "endDate": null })
    }

    /// A station `north_km` kilometres due north of the origin.
    fn station(name: &str, site: Option<&str>, north_km: f64, pollutants: Value) -> CandidateStation {
        let origin = origin_point();
        let mut record = json!({
            "area": "Greater London",
            "areaType": "Urban Background",
            "name": name,
            "updated": "2024-05-01T10:00:00Z",
            "location": { "type": "Point", "coordinates": [origin.0 + north_km / 111.2, origin.1] },
            "pollutants": pollutants
        });
        if let Some(site) = site {
            record["localSiteID"] = json!(site);
        }
        serde_json::from_value(record).unwrap()
    }

    fn locator() -> StationLocator {
        StationLocator::new().with_sink(Arc::new(NoopSink))
    }

    fn names(envelope: &ResultEnvelope) -> Vec<&str> {
        envelope.stations.iter().map(|s| s.name.as_str()).collect()
    }

    #[test]
    fn builds_sorted_normalized_stations() {
        let stations = vec![
            station("Far Away", Some("FA1"), 8.0, json!({ "NO2": current(3.0) })),
            station(
                "North Kensington",
                Some("KC1"),
                2.0,
                json!({ "O3": current(5.0), "PM25": current(10.0), "GR25": current(2.0) }),
            ),
            station("Out Of Range", Some("OR1"), 40.0, json!({ "NO2": current(3.0) })),
        ];
        let result =
            locator().resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 16_093.44, 0);

        assert_eq!(names(&result), ["North Kensington", "Far Away"]);
        let first = &result.stations[0];
        assert_eq!(first.id, "NorthKensington");
        assert_eq!(first.site_type, "Background Urban");
        assert_eq!(first.region, "Greater London");
        assert_eq!(first.local_site_id, "KC1");
        assert_eq!(first.pollutants, ["PM2.5", "Ozone"]);
        assert_eq!(first.distance, "1.2");
        assert_eq!(first.location.kind, "Point");
        assert_eq!(first.location.coordinates.len(), 2);
        assert_eq!(first.updated.as_deref(), Some("2024-05-01T10:00:00Z"));
        assert_eq!(result.stations[1].distance, "5.0");
        assert_eq!(result.origin.as_lat_lon(), Some(origin_point()));
    }

    #[test]
    fn station_without_site_id_is_dropped() {
        let stations = vec![
            station("Anonymous", None, 1.0, json!({ "NO2": current(3.0) })),
            station("Named", Some("N1"), 2.0, json!({ "NO2": current(3.0) })),
        ];
        let result =
            locator().resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(names(&result), ["Named"]);
    }

    #[test]
    fn station_with_only_invalid_readings_is_dropped() {
        let stations = vec![
            station(
                "Expired",
                Some("E1"),
                1.0,
                json!({ "SO2": { "value": null, "startDate": null, "endDate": "2010-01-01" } }),
            ),
            station(
                "Zeroed",
                Some("Z1"),
                1.5,
                json!({ "O3": { "value": 0, "startDate": null, "endDate": null } }),
            ),
            station("Empty", Some("M1"), 1.8, json!({})),
        ];
        let result =
            locator().resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert!(result.stations.is_empty());
        assert!(!result.origin.is_unset());
    }

    #[test]
    fn empty_inputs_give_empty_envelope() {
        let stations = vec![station("Only", Some("O1"), 1.0, json!({ "NO2": current(1.0) }))];
        let locator = locator();

        let no_stations =
            locator.resolve_nearest_stations(&places(), &[], LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(no_stations, ResultEnvelope::empty());
        assert_eq!(
            serde_json::to_value(&no_stations).unwrap(),
            json!({ "stations": [], "origin": {} })
        );

        let no_places =
            locator.resolve_nearest_stations(&[], &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(no_places, ResultEnvelope::empty());
    }

    #[test]
    fn conversion_failure_is_logged_and_yields_empty_result() {
        let sink = Arc::new(RecordingSink::default());
        let locator = StationLocator::new().with_sink(sink.clone());
        let stations = vec![station("Only", Some("O1"), 1.0, json!({ "NO2": current(1.0) }))];
        let broken = vec![PlaceMatch::default()];

        let result =
            locator.resolve_nearest_stations(&broken, &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert!(result.stations.is_empty());
        assert_eq!(result.origin, Origin::unset());
        assert_eq!(sink.messages(Level::Error).len(), 1);
    }

    #[test]
    fn malformed_station_does_not_lose_the_rest() {
        let mut broken = station("Broken", Some("B1"), 1.0, json!({ "NO2": current(1.0) }));
        broken.location = None;
        let stations = vec![
            broken,
            station("Fine", Some("F1"), 1.0, json!({ "NO2": current(1.0) })),
        ];
        let sink = Arc::new(RecordingSink::default());
        let result = StationLocator::new().with_sink(sink.clone()).resolve_nearest_stations(
            &places(),
            &stations,
            LocationKind::UkLocation,
            10_000.0,
            0,
        );
        assert_eq!(names(&result), ["Fine"]);
        assert!(sink
            .messages(Level::Info)
            .iter()
            .any(|m| m.contains("Ignoring 1 stations")));
    }

    #[test]
    fn equal_distances_keep_input_order() {
        let stations = vec![
            station("Second Listed", Some("S2"), 3.0, json!({ "NO2": current(1.0) })),
            station("Closest", Some("C1"), 1.0, json!({ "NO2": current(1.0) })),
            station("Twin A", Some("TA"), 2.0, json!({ "NO2": current(1.0) })),
            station("Twin B", Some("TB"), 2.0, json!({ "O3": current(1.0) })),
        ];
        let result =
            locator().resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(names(&result), ["Closest", "Twin A", "Twin B", "Second Listed"]);
    }

    #[test]
    fn candidate_limit_truncates_before_radius_test() {
        let stations: Vec<_> = (1..=6)
            .map(|i| {
                station(
                    &format!("Station {i}"),
                    Some(&format!("S{i}")),
                    i as f64 * 0.5,
                    json!({ "NO2": current(1.0) }),
                )
            })
            .collect();
        let options = LocatorOptions::builder().candidate_limit(4).build();
        let result = StationLocator::with_options(options)
            .with_sink(Arc::new(NoopSink))
            .resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 50_000.0, 0);
        assert_eq!(result.stations.len(), 4);
        assert_eq!(result.stations[3].name, "Station 4");
    }

    #[test]
    fn every_result_is_inside_the_radius_and_sorted() {
        let stations: Vec<_> = (0..30)
            .map(|i| {
                let km = ((i * 7) % 30) as f64 * 0.9 + 0.05;
                station(
                    &format!("S {i}"),
                    Some(&format!("S{i}")),
                    km,
                    json!({ "PM25": current(1.0), "MP10": current(1.0) }),
                )
            })
            .collect();
        let radius_m = 12_000.0;
        let result =
            locator().resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, radius_m, 0);
        assert!(!result.stations.is_empty());

        let origin = origin_point();
        let mut last = f64::MIN;
        for s in &result.stations {
            let point = LatLon(s.location.coordinates[0], s.location.coordinates[1]);
            assert!(HaversineEngine.distance(origin, point) < radius_m);
            assert!(s.distance_miles() >= last);
            last = s.distance_miles();
            assert_eq!(s.pollutants, ["PM2.5", "PM10"]);
        }
    }

    #[test]
    fn repeated_calls_give_identical_results() {
        let stations = vec![
            station("A", Some("A"), 1.0, json!({ "NO2": current(1.0), "PM25": current(2.0) })),
            station("B", Some("B"), 2.0, json!({ "O3": current(1.0) })),
        ];
        let locator = locator();
        let first =
            locator.resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        let second =
            locator.resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(first, second);
    }

    #[test]
    fn northern_ireland_grid_point_resolves_like_gazetteer_entry() {
        let stations = vec![
            station("Near", Some("N1"), 1.0, json!({ "NO2": current(1.0) })),
            station("Far", Some("F1"), 30.0, json!({ "NO2": current(1.0) })),
        ];
        let ni_places = vec![
            PlaceMatch::grid_point(330_000.0, 370_000.0),
            PlaceMatch::grid_point(ORIGIN_E, ORIGIN_N),
        ];
        let result = locator().resolve_nearest_stations(
            &ni_places,
            &stations,
            LocationKind::NorthernIreland,
            10_000.0,
            1,
        );
        assert_eq!(names(&result), ["Near"]);
        assert_eq!(result.origin.as_lat_lon(), Some(origin_point()));

        let gazetteer_only = locator().resolve_nearest_stations(
            &places(),
            &stations,
            LocationKind::NorthernIreland,
            10_000.0,
            0,
        );
        assert_eq!(gazetteer_only, ResultEnvelope::empty());
    }

    #[test]
    fn station_just_beyond_the_radius_is_excluded() {
        let origin = origin_point();
        let at = |metres: f64| vec![origin.0 + (metres / EARTH_RADIUS_M).to_degrees(), origin.1];
        let mut edge = station("Edge", Some("E1"), 0.0, json!({ "NO2": current(1.0) }));
        edge.location.as_mut().unwrap().coordinates = at(8_050.0);
        let mut inside = station("Inside", Some("I1"), 0.0, json!({ "NO2": current(1.0) }));
        inside.location.as_mut().unwrap().coordinates = at(8_040.0);

        let result = locator().resolve_nearest_stations(
            &places(),
            &[edge, inside],
            LocationKind::UkLocation,
            8_046.72,
            0,
        );
        assert_eq!(names(&result), ["Inside"]);
        assert_eq!(result.stations[0].distance, "5.0");
    }

    #[test]
    fn free_function_uses_defaults() {
        let stations = vec![station("Only", Some("O1"), 1.0, json!({ "NO2": current(1.0) }))];
        let result =
            resolve_nearest_stations(&places(), &stations, LocationKind::UkLocation, 10_000.0, 0);
        assert_eq!(names(&result), ["Only"]);
        assert_eq!(result.stations[0].pollutants, ["Nitrogen dioxide"]);
    }
}

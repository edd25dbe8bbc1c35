use crate::stations::distance::DistanceEngine;
use crate::types::lat_lon::LatLon;
use crate::types::station::CandidateStation;

/// Default number of nearest points that are radius-tested.
pub const DEFAULT_CANDIDATE_LIMIT: usize = 40;

/// Picks the stations inside a search radius.
///
/// Stations are ranked by distance first and only the nearest
/// `candidate_limit` points are radius-tested. With dense station sets this
/// can leave out stations that are inside the radius but not among the
/// nearest `candidate_limit`; raise the limit if that matters.
#[derive(Debug, Clone, Copy)]
pub struct CandidateSelector<'e, E: DistanceEngine> {
    engine: &'e E,
    candidate_limit: usize,
}

impl<'e, E: DistanceEngine> CandidateSelector<'e, E> {
    pub fn new(engine: &'e E, candidate_limit: usize) -> Self {
        Self {
            engine,
            candidate_limit,
        }
    }

    /// Returns the stations inside `radius_m` metres of `origin`, in input order.
    pub fn select_within_radius<'s>(
        &self,
        origin: LatLon,
        stations: &'s [CandidateStation],
        radius_m: f64,
    ) -> Vec<&'s CandidateStation> {
        let points = coordinates_total(stations);
        let mut ranked = self.engine.order_by_distance(origin, &points);
        ranked.truncate(self.candidate_limit);

        let in_range: Vec<LatLon> = ranked
            .into_iter()
            .filter(|point| self.engine.is_within_radius(origin, *point, radius_m))
            .collect();

        stations
            .iter()
            .filter(|station| {
                station
                    .point()
                    .is_some_and(|point| in_range.iter().any(|kept| *kept == point))
            })
            .collect()
    }
}

/// The coordinates of every station with a usable location, in input order.
pub fn coordinates_total(stations: &[CandidateStation]) -> Vec<LatLon> {
    stations.iter().filter_map(CandidateStation::point).collect()
}

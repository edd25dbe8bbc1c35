use crate::types::lat_lon::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};
use ordered_float::OrderedFloat;

pub(crate) const MILES_PER_METRE: f64 = 0.000_621_371_192;

/// Equatorial radius used for every reported distance.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

// Radius the haversine crate applies for `Units::Kilometers`.
const HAVERSINE_RADIUS_KM: f64 = 6371.0;

/// Great-circle geometry used to rank and filter stations.
///
/// Only [`DistanceEngine::distance`] is required; radius containment and
/// ordering are derived from it.
pub trait DistanceEngine: Send + Sync {
    /// Distance between two points in metres.
    fn distance(&self, from: LatLon, to: LatLon) -> f64;

    /// Whether `point` lies strictly inside `radius_m` metres of `origin`.
    fn is_within_radius(&self, origin: LatLon, point: LatLon, radius_m: f64) -> bool {
        self.distance(origin, point) < radius_m
    }

    /// Returns `points` ordered by distance from `origin`, nearest first.
    /// Equidistant points keep their input order.
    fn order_by_distance(&self, origin: LatLon, points: &[LatLon]) -> Vec<LatLon> {
        let mut ranked: Vec<(OrderedFloat<f64>, LatLon)> = points
            .iter()
            .map(|point| (OrderedFloat(self.distance(origin, *point)), *point))
            .collect();
        ranked.sort_by_key(|(dist, _)| *dist);
        ranked.into_iter().map(|(_, point)| point).collect()
    }

    fn distance_miles(&self, from: LatLon, to: LatLon) -> f64 {
        self.distance(from, to) * MILES_PER_METRE
    }
}

/// Haversine distance on a sphere of radius [`EARTH_RADIUS_M`], rounded to
/// whole metres.
#[derive(Debug, Clone, Copy, Default)]
pub struct HaversineEngine;

impl DistanceEngine for HaversineEngine {
    fn distance(&self, from: LatLon, to: LatLon) -> f64 {
        let central_angle = distance(
            HaversineLocation {
                latitude: from.0,
                longitude: from.1,
            },
            HaversineLocation {
                latitude: to.0,
                longitude: to.1,
            },
            Units::Kilometers,
        ) / HAVERSINE_RADIUS_KM;
        (central_angle * EARTH_RADIUS_M).round()
    }
}

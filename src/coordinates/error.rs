use crate::types::place::LocationKind;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("No place match at index {index} ({available} available)")]
    MissingCandidate { index: usize, available: usize },

    #[error("Place match {index} has no {kind} grid reference")]
    MissingGridReference { index: usize, kind: LocationKind },

    #[error("Grid reference ({easting}, {northing}) is not a finite number")]
    NonFinite { easting: f64, northing: f64 },

    #[error("Grid reference ({easting}, {northing}) lies outside the National Grid")]
    OutOfGrid { easting: f64, northing: f64 },
}

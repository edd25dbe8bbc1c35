use crate::coordinates::error::ConversionError;
use crate::coordinates::os_grid::{Datum, GridRef};
use crate::diagnostics::DiagnosticSink;
use crate::types::lat_lon::Origin;
use crate::types::place::{LocationKind, PlaceMatch};

/// Reads the grid reference of `candidates[index]` according to `kind`.
pub fn grid_reference_for(
    candidates: &[PlaceMatch],
    kind: LocationKind,
    index: usize,
) -> Result<GridRef, ConversionError> {
    let candidate = candidates
        .get(index)
        .ok_or(ConversionError::MissingCandidate {
            index,
            available: candidates.len(),
        })?;

    let coordinates = match kind {
        LocationKind::UkLocation => candidate
            .gazetteer_entry
            .as_ref()
            .and_then(|entry| entry.geometry_x.zip(entry.geometry_y)),
        LocationKind::NorthernIreland => candidate.x_coordinate.zip(candidate.y_coordinate),
    };

    let (easting, northing) =
        coordinates.ok_or(ConversionError::MissingGridReference { index, kind })?;
    GridRef::new(easting, northing)
}

/// Resolves the search origin from the selected place match.
///
/// Never fails: a missing or malformed match is reported to `sink` and an
/// unset [`Origin`] is returned, which downstream stages treat as "no results".
pub fn resolve_origin(
    candidates: &[PlaceMatch],
    kind: LocationKind,
    index: usize,
    datum: Datum,
    sink: &dyn DiagnosticSink,
) -> Origin {
    match grid_reference_for(candidates, kind, index) {
        Ok(grid) => Origin::from(grid.to_lat_lon(datum)),
        Err(e) => {
            sink.error(&format!("Failed to convert {kind} grid reference to lat/lon: {e}"));
            Origin::unset()
        }
    }
}

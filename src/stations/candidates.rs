use crate::diagnostics::DiagnosticSink;
use crate::types::station::CandidateStation;
use serde_json::Value;

/// Deserializes station records one at a time.
///
/// A record that cannot be read is skipped and reported to `sink`; the rest
/// of the batch is still returned.
pub fn parse_candidates(records: Vec<Value>, sink: &dyn DiagnosticSink) -> Vec<CandidateStation> {
    let total = records.len();
    let stations: Vec<CandidateStation> = records
        .into_iter()
        .enumerate()
        .filter_map(|(i, record)| match serde_json::from_value(record) {
            Ok(station) => Some(station),
            Err(e) => {
                sink.error(&format!("Skipping malformed station record {i}: {e}"));
                None
            }
        })
        .collect();
    if stations.len() < total {
        sink.info(&format!(
            "Parsed {} of {} station records",
            stations.len(),
            total
        ));
    }
    stations
}

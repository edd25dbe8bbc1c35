use crate::coordinates::os_grid::Datum;
use crate::normalize::pollutants::DEFAULT_VALIDITY_CUTOFF;
use crate::stations::candidate_selector::DEFAULT_CANDIDATE_LIMIT;
use bon::Builder;
use chrono::NaiveDate;

/// Tunables for [`crate::StationLocator`].
///
/// # Examples
///
/// ```
/// use monitor_locate::{Datum, LocatorOptions};
///
/// let defaults = LocatorOptions::default();
/// assert_eq!(defaults.candidate_limit, 40);
///
/// let wide = LocatorOptions::builder()
///     .candidate_limit(200)
///     .datum(Datum::Wgs84)
///     .build();
/// assert_eq!(wide.candidate_limit, 200);
/// assert_eq!(wide.validity_cutoff, defaults.validity_cutoff);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Builder)]
pub struct LocatorOptions {
    /// How many of the nearest stations are radius-tested. Stations beyond
    /// this rank are never reported, even if inside the radius.
    #[builder(default = DEFAULT_CANDIDATE_LIMIT)]
    pub candidate_limit: usize,
    /// Pollutant readings that ended on or before this date are ignored.
    #[builder(default = DEFAULT_VALIDITY_CUTOFF)]
    pub validity_cutoff: NaiveDate,
    /// Datum of the resolved origin.
    #[builder(default)]
    pub datum: Datum,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

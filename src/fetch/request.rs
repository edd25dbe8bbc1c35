use crate::error::LocateError;

pub const METRES_PER_MILE: f64 = 1_609.344;

/// A validated user search: free-text place (name or postcode) and a radius in miles.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
    user_location: String,
    user_miles: f64,
}

impl SearchRequest {
    /// Validates raw user input.
    ///
    /// # Errors
    ///
    /// Returns [`LocateError::InvalidRequest`] if the location is blank (or
    /// the literal `''`), or the miles value is not a positive number.
    pub fn new(user_location: &str, user_miles: &str) -> Result<Self, LocateError> {
        let miles = user_miles.trim().parse::<f64>().map_err(|_| {
            LocateError::InvalidRequest(format!("miles '{user_miles}' is not a number"))
        })?;
        Self::from_miles(user_location, miles)
    }

    pub fn from_miles(user_location: &str, user_miles: f64) -> Result<Self, LocateError> {
        let location = user_location.trim();
        if location.is_empty() || location == "''" {
            return Err(LocateError::InvalidRequest(
                "user location is blank".to_string(),
            ));
        }
        if !user_miles.is_finite() || user_miles <= 0.0 {
            return Err(LocateError::InvalidRequest(format!(
                "miles must be a positive number, got {user_miles}"
            )));
        }
        Ok(Self {
            user_location: location.to_string(),
            user_miles,
        })
    }

    /// Parses the single path-parameter form, e.g. `London&miles=5`.
    pub fn from_path_param(param: &str) -> Result<Self, LocateError> {
        let (location, miles) = param.split_once('&').ok_or_else(|| {
            LocateError::InvalidRequest(format!("'{param}' has no miles component"))
        })?;
        let miles = miles.trim();
        let miles = miles.strip_prefix("miles=").unwrap_or(miles);
        Self::new(location, miles)
    }

    pub fn user_location(&self) -> &str {
        &self.user_location
    }

    pub fn user_miles(&self) -> f64 {
        self.user_miles
    }

    pub fn radius_meters(&self) -> f64 {
        self.user_miles * METRES_PER_MILE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn valid_request() {
        let request = SearchRequest::new(" London ", "10").unwrap();
        assert_eq!(request.user_location(), "London");
        assert_eq!(request.user_miles(), 10.0);
        assert_relative_eq!(request.radius_meters(), 16_093.44);
    }

    #[test]
    fn rejects_blank_locations() {
        for location in ["", "   ", "''"] {
            assert!(matches!(
                SearchRequest::new(location, "5"),
                Err(LocateError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn rejects_bad_miles() {
        for miles in ["", "ten", "0", "-3", "NaN", "inf"] {
            assert!(
                SearchRequest::new("London", miles).is_err(),
                "miles '{miles}' should be rejected"
            );
        }
    }

    #[test]
    fn parses_path_parameter() {
        let request = SearchRequest::from_path_param("DA16 1LT&miles=25").unwrap();
        assert_eq!(request.user_location(), "DA16 1LT");
        assert_eq!(request.user_miles(), 25.0);

        let bare = SearchRequest::from_path_param("Leeds&5").unwrap();
        assert_eq!(bare.user_miles(), 5.0);

        assert!(SearchRequest::from_path_param("Leeds").is_err());
        assert!(SearchRequest::from_path_param("&miles=5").is_err());
    }
}

/// Swaps the first two tokens of an `areaType` ("Urban Background" becomes
/// "Background Urban"). Tokens beyond the second are dropped; a single token
/// is returned as is.
pub fn site_type(area_type: &str) -> String {
    let mut tokens = area_type.split(' ');
    match (tokens.next(), tokens.next()) {
        (Some(first), Some(second)) => format!("{second} {first}"),
        _ => area_type.to_string(),
    }
}

/// The station name with every space removed.
pub fn station_id(name: &str) -> String {
    name.replace(' ', "")
}

pub mod lat_lon;
pub mod normalized;
pub mod place;
pub mod station;

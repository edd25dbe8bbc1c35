pub mod candidate_selector;
pub mod candidates;
pub mod distance;
pub mod locate_station;

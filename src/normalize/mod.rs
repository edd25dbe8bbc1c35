pub mod pollutants;
pub mod site;

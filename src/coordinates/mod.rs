pub mod error;
pub mod os_grid;
pub mod resolver;

use crate::fetch::error::FetchError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocateError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),
}

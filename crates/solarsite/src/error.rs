use solarsite_core::filters::FilterParseError;
use solarsite_core::sites::WeightsError;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(String),

    #[error("{context} [{status}]: {body}")]
    HttpStatus {
        context: String,
        status: u16,
        body: String,
    },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Invalid filter: {0}")]
    InvalidFilter(#[from] FilterParseError),

    #[error("Invalid weights: {0}")]
    InvalidWeights(#[from] WeightsError),
}

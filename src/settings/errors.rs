// 3rd party crates
use thiserror::Error;

// Project imports
use cloudstore::store::errors::StoreValidationError;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Invalid log level: {0}. Must be one of: error, warn, info, debug, trace")]
    InvalidLogLevel(String),
    #[error("Rate gate interval must be greater than 0")]
    InvalidRateInterval,
    #[error("Store configuration error: {0}")]
    StoreConfig(#[from] StoreValidationError),
}

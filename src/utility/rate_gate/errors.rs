// 3rd party crates
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RateGateError {
    #[error("The global rate gate has already been installed")]
    AlreadyInstalled,
}

//! Client for the cloud storage service.
//!
//! [`CloudStore`] turns each storage operation into a [`StoreRequest`],
//! spawns a task that waits on the shared rate gate and performs the HTTP
//! exchange, and hands back a [`Pending`] result. Failures never surface at
//! call time; they arrive as a [`StoreError`] inside the result.

pub mod constants;
pub mod errors;
pub mod functions;
pub mod impls;
pub mod traits;
pub mod types;

pub use errors::{
    ClientError, ErrorKind, HttpStatus, StoreError, StoreValidationError, TransportError,
};
pub use traits::Transport;
pub use types::{
    CloudStore, Operation, Pending, RawResponse, ReqwestTransport, RequestBody, StoreConfig,
    StoreOption, StorePayload, StoreRequest, StoreResponse, StoreResult, UploadFile, UploadForm,
};

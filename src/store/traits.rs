// 3rd party crates
use async_trait::async_trait;

// Current module imports
use super::errors::TransportError;
use super::types::{RawResponse, StoreRequest};

/// Performs one HTTP exchange for a built request.
///
/// The dispatcher owns rate limiting and result interpretation; a transport
/// only moves bytes. Any status code is a successful exchange here.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: StoreRequest) -> Result<RawResponse, TransportError>;
}

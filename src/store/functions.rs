// Standard library
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tracing::{debug, error, warn};

// Project imports
use crate::utility::rate_gate::{RateGate, RateLimiter};

// Current module imports
use super::errors::{HttpStatus, StoreError, TransportError};
use super::traits::Transport;
use super::types::{
    RawResponse, RequestBody, StoreConfig, StoreRequest, StoreResponse, StoreResult, UploadForm,
};

/// Creates the reqwest client shared by every request of a store.
pub(super) fn create_reqwest_client(config: &StoreConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()
        .map_err(|e| {
            error!(server = %config.server, "Failed to build HTTP client: {}", e);
            e
        })
}

/// Content-Type header for an upload part.
///
/// The caller's type is sent verbatim, so bare types such as `text` pass;
/// only strings that cannot be header values are refused.
pub(super) fn upload_content_type(mime_type: &str) -> Result<HeaderValue, TransportError> {
    HeaderValue::from_str(mime_type).map_err(|source| TransportError::InvalidMimeType {
        mime_type: mime_type.to_string(),
        source,
    })
}

/// Rejects requests that could never be sent, before a permit is spent on them.
pub(super) fn check_request(request: &StoreRequest) -> Result<(), TransportError> {
    match &request.body {
        RequestBody::Multipart(form) => upload_content_type(&form.file.mime_type).map(|_| ()),
        RequestBody::Json(_) => Ok(()),
    }
}

/// Converts an upload form into a reqwest multipart form.
pub(super) fn build_multipart_form(form: UploadForm) -> Result<Form, TransportError> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, upload_content_type(&form.file.mime_type)?);

    let part = Part::bytes(form.file.bytes)
        .file_name(form.file.name)
        .headers(headers);

    let mut multipart = Form::new().part("file", part).text("key", form.key);
    if let Some(password) = form.password {
        multipart = multipart.text("password", password);
    }

    Ok(multipart)
}

/// Waits for a permit, performs the exchange and normalizes the outcome.
pub(super) async fn execute(
    transport: Arc<dyn Transport>,
    gate: Arc<RateGate>,
    request: StoreRequest,
) -> StoreResult {
    let operation = request.operation;
    if let Err(e) = check_request(&request) {
        warn!(operation = %operation, "Request rejected before sending: {}", e);
        return Err(StoreError::from(e));
    }

    gate.acquire().await;

    debug!(operation = %operation, url = %request.url, "Sending request");

    let result = match transport.send(request).await {
        Ok(response) => interpret(response),
        Err(e) => Err(StoreError::from(e)),
    };

    if let Err(e) = &result {
        warn!(operation = %operation, kind = %e.kind(), "Request failed: {}", e.message());
    }

    result
}

/// Maps a raw response to the result handed to callers.
///
/// Only `200 OK` with a JSON body counts as success.
pub fn interpret(response: RawResponse) -> StoreResult {
    if response.status != StatusCode::OK {
        let message = match response.status.canonical_reason() {
            Some(reason) => reason.to_string(),
            None => response.status.as_str().to_string(),
        };
        return Err(StoreError::Http {
            message,
            source: HttpStatus(response.status),
            response,
        });
    }

    match serde_json::from_slice::<Value>(&response.body) {
        Ok(data) => Ok(StoreResponse { data, response }),
        Err(e) => Err(StoreError::Parse {
            message: e.to_string(),
            response,
            source: e,
        }),
    }
}

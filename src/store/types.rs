// Standard library
use std::sync::Arc;

// 3rd party crates
use reqwest::header::HeaderMap;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::task::JoinHandle;

// Project imports
use crate::utility::rate_gate::RateGate;

// Current module imports
use super::constants::{DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS};
use super::errors::StoreError;
use super::traits::Transport;

/// Outcome of one storage request.
pub type StoreResult = Result<StoreResponse, StoreError>;

/// Connection settings for the storage service.
#[derive(Deserialize, Clone)]
pub struct StoreConfig {
    #[serde(default = "default_server")]
    pub server: String,
    pub api_key: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Client for the storage service.
///
/// Cloning is cheap; clones share the transport and the rate gate.
#[derive(Clone)]
pub struct CloudStore {
    pub(crate) config: StoreConfig,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) gate: Arc<RateGate>,
}

/// Transport backed by a shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    pub(crate) client: Client,
}

/// A logical storage operation, before it is turned into a request.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Save { file: String, value: Value },
    Merge { file: String, value: Value },
    Delete { file: String },
    Load { file: String },
    /// An empty filter matches every file.
    List { filter: String },
    Upload { file: UploadFile },
}

/// Tag sent in the `options` field of a JSON request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreOption {
    Merge,
    Delete,
    List,
}

/// JSON body for the save and load endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorePayload {
    pub key: String,
    pub file: String,
    pub options: Option<StoreOption>,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    pub password: Option<String>,
}

/// File part of an upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
    pub mime_type: String,
}

/// Multipart body for the upload endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadForm {
    pub key: String,
    pub password: Option<String>,
    pub file: UploadFile,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(StorePayload),
    Multipart(UploadForm),
}

/// A fully built request, ready for a transport.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreRequest {
    /// Operation name, for logging
    pub operation: &'static str,
    pub url: String,
    pub body: RequestBody,
}

/// Everything the server sent back.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Successful storage response.
#[derive(Debug, Clone)]
pub struct StoreResponse {
    /// Parsed response body, unmodified
    pub data: Value,
    pub response: RawResponse,
}

/// A request running in the background.
///
/// Await it for the [`StoreResult`], or hand it a callback with
/// [`Pending::on_complete`]. Dropping it does not cancel the request.
#[derive(Debug)]
pub struct Pending {
    pub(crate) handle: JoinHandle<StoreResult>,
    pub(crate) gate: Arc<RateGate>,
}

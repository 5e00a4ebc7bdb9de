// Standard library
use std::borrow::Cow;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

// 3rd party crates
use async_trait::async_trait;
use base64::Engine;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use tokio::task::JoinHandle;

// Project imports
use crate::utility::rate_gate::RateGate;

// Current module imports
use super::constants::{
    API_KEY_PLACEHOLDER, DATA_ID, DEFAULT_SERVER, DEFAULT_TIMEOUT_SECS, JSON_CONTENT_TYPE,
    LOAD_ENDPOINT, SAVE_ENDPOINT, UPLOAD_ENDPOINT,
};
use super::errors::{ClientError, StoreError, StoreValidationError, TransportError};
use super::functions::{build_multipart_form, create_reqwest_client, execute};
use super::traits::Transport;
use super::types::{
    CloudStore, Operation, Pending, RawResponse, ReqwestTransport, RequestBody, StoreConfig,
    StoreOption, StorePayload, StoreRequest, StoreResponse, StoreResult, UploadFile, UploadForm,
};

impl StoreConfig {
    /// Configuration for the default server.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            server: DEFAULT_SERVER.to_string(),
            api_key: api_key.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }

    pub fn with_server(mut self, server: impl Into<String>) -> Self {
        self.server = server.into();
        self
    }

    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn validate(&self) -> Result<(), StoreValidationError> {
        if self.api_key.trim().is_empty() || self.api_key == API_KEY_PLACEHOLDER {
            return Err(StoreValidationError::MissingApiKey);
        }

        match Url::parse(&self.server) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
            _ => return Err(StoreValidationError::InvalidServer(self.server.clone())),
        }

        if self.timeout_secs == 0 {
            return Err(StoreValidationError::InvalidTimeout);
        }

        Ok(())
    }
}

impl fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StoreConfig")
            .field("server", &self.server)
            .field("api_key", &"<redacted>")
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl CloudStore {
    /// Creates a client using reqwest and the process-wide rate gate.
    pub fn new(config: StoreConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = ReqwestTransport::new(create_reqwest_client(&config)?);
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Creates a client over a custom transport, sharing the process-wide gate.
    pub fn with_transport(config: StoreConfig, transport: Arc<dyn Transport>) -> Self {
        Self {
            config,
            transport,
            gate: RateGate::global(),
        }
    }

    /// Replaces the rate gate used by this client and its clones.
    pub fn with_gate(mut self, gate: Arc<RateGate>) -> Self {
        self.gate = gate;
        self
    }

    pub fn server(&self) -> &str {
        &self.config.server
    }

    pub fn gate(&self) -> &Arc<RateGate> {
        &self.gate
    }

    /// Replaces `file` with `value`.
    pub fn save(&self, file: &str, value: Value, password: Option<&str>) -> Pending {
        let operation = Operation::Save {
            file: file.to_string(),
            value,
        };
        self.dispatch(operation, password)
    }

    /// Merges the top-level keys of `value` into `file`.
    pub fn merge(&self, file: &str, value: Value, password: Option<&str>) -> Pending {
        let operation = Operation::Merge {
            file: file.to_string(),
            value,
        };
        self.dispatch(operation, password)
    }

    pub fn delete(&self, file: &str, password: Option<&str>) -> Pending {
        let operation = Operation::Delete {
            file: file.to_string(),
        };
        self.dispatch(operation, password)
    }

    pub fn load(&self, file: &str, password: Option<&str>) -> Pending {
        let operation = Operation::Load {
            file: file.to_string(),
        };
        self.dispatch(operation, password)
    }

    /// Lists files whose names match `filter`; an empty filter matches all.
    pub fn list(&self, filter: &str, password: Option<&str>) -> Pending {
        let operation = Operation::List {
            filter: filter.to_string(),
        };
        self.dispatch(operation, password)
    }

    pub fn upload(&self, file: UploadFile, password: Option<&str>) -> Pending {
        self.dispatch(Operation::Upload { file }, password)
    }

    /// Builds the request for `operation` and sends it in the background.
    ///
    /// Returns immediately. Must be called from within a tokio runtime.
    pub fn dispatch(&self, operation: Operation, password: Option<&str>) -> Pending {
        let request = self.build_request(operation, password);
        let gate = Arc::clone(&self.gate);
        let handle = tokio::spawn(execute(
            Arc::clone(&self.transport),
            Arc::clone(&gate),
            request,
        ));

        Pending { handle, gate }
    }

    /// Builds the HTTP request for `operation` without sending it.
    pub fn build_request(&self, operation: Operation, password: Option<&str>) -> StoreRequest {
        let url = format!(
            "{}{}",
            self.config.server.trim_end_matches('/'),
            operation.endpoint()
        );
        let name = operation.name();
        let options = operation.options();
        let key = self.config.api_key.clone();
        let password = password.map(str::to_string);

        let body = match operation {
            Operation::Save { file, value } | Operation::Merge { file, value } => {
                RequestBody::Json(StorePayload::new(key, file, options, Some(value), password))
            }
            Operation::Delete { file } | Operation::Load { file } => {
                RequestBody::Json(StorePayload::new(key, file, options, None, password))
            }
            Operation::List { filter } => {
                RequestBody::Json(StorePayload::new(key, filter, options, None, password))
            }
            Operation::Upload { file } => RequestBody::Multipart(UploadForm {
                key,
                password,
                file,
            }),
        };

        StoreRequest {
            operation: name,
            url,
            body,
        }
    }
}

impl fmt::Debug for CloudStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CloudStore")
            .field("config", &self.config)
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl Operation {
    pub fn name(&self) -> &'static str {
        match self {
            Operation::Save { .. } => "save",
            Operation::Merge { .. } => "merge",
            Operation::Delete { .. } => "delete",
            Operation::Load { .. } => "load",
            Operation::List { .. } => "list",
            Operation::Upload { .. } => "upload",
        }
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Operation::Save { .. } | Operation::Merge { .. } | Operation::Delete { .. } => {
                SAVE_ENDPOINT
            }
            Operation::Load { .. } | Operation::List { .. } => LOAD_ENDPOINT,
            Operation::Upload { .. } => UPLOAD_ENDPOINT,
        }
    }

    /// Value of the `options` field; `None` is sent as `null`.
    pub fn options(&self) -> Option<StoreOption> {
        match self {
            Operation::Merge { .. } => Some(StoreOption::Merge),
            Operation::Delete { .. } => Some(StoreOption::Delete),
            Operation::List { .. } => Some(StoreOption::List),
            Operation::Save { .. } | Operation::Load { .. } | Operation::Upload { .. } => None,
        }
    }
}

impl StorePayload {
    pub fn new(
        key: String,
        file: String,
        options: Option<StoreOption>,
        value: Option<Value>,
        password: Option<String>,
    ) -> Self {
        Self {
            key,
            file,
            options,
            id: DATA_ID.to_string(),
            value,
            password,
        }
    }
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>, mime_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Decodes standard base64 text into the file contents.
    pub fn from_base64(
        data: &str,
        name: impl Into<String>,
        mime_type: impl Into<String>,
    ) -> Result<Self, base64::DecodeError> {
        let bytes = base64::engine::general_purpose::STANDARD.decode(data.trim())?;
        Ok(Self::new(name, bytes, mime_type))
    }
}

impl ReqwestTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: StoreRequest) -> Result<RawResponse, TransportError> {
        let builder = self.client.post(&request.url);
        let builder = match request.body {
            RequestBody::Json(payload) => builder
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(serde_json::to_vec(&payload)?),
            RequestBody::Multipart(form) => builder.multipart(build_multipart_form(form)?),
        };

        let response = builder.send().await?;
        let url = response.url().to_string();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await?.to_vec();

        Ok(RawResponse {
            url,
            status,
            headers,
            body,
        })
    }
}

impl RawResponse {
    /// Canonical reason phrase of the status, if one exists.
    pub fn reason(&self) -> Option<&'static str> {
        self.status.canonical_reason()
    }

    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

impl StoreResponse {
    /// The `message` field the service puts in most answers.
    pub fn message(&self) -> Option<&str> {
        self.data.get("message").and_then(Value::as_str)
    }
}

impl Pending {
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Delivers the result to `callback` once the request completes.
    ///
    /// Callbacks run one at a time process-wide, under the rate gate's lock:
    /// a blocking callback stalls every other completion and permit.
    pub fn on_complete<F>(self, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(StoreResult) + Send + 'static,
    {
        let gate = Arc::clone(&self.gate);
        tokio::spawn(async move {
            let result = self.await;
            gate.serialize(move || callback(result)).await;
        })
    }
}

impl Future for Pending {
    type Output = StoreResult;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.handle).poll(cx) {
            Poll::Ready(Ok(result)) => Poll::Ready(result),
            Poll::Ready(Err(e)) => Poll::Ready(Err(StoreError::from(TransportError::Task(
                e.to_string(),
            )))),
            Poll::Pending => Poll::Pending,
        }
    }
}

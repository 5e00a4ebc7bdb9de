use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cloudstore::store::{RawResponse, StoreRequest, TransportError};
use cloudstore::{
    CloudStore, ErrorKind, RateGate, RateGateConfig, RateLimiter, StoreConfig, StoreResult,
    Transport, UploadFile,
};
use httpmock::{Method::POST, MockServer};
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::json;
use tokio::time::Instant;

fn fast_gate() -> Arc<RateGate> {
    Arc::new(RateGate::new(RateGateConfig {
        min_interval_ms: 20,
        offset_ms: 1,
    }))
}

fn store_for(server: &MockServer) -> CloudStore {
    CloudStore::new(StoreConfig::new("test-key").with_server(server.base_url()))
        .unwrap()
        .with_gate(fast_gate())
}

#[tokio::test]
async fn save_success_calls_back_once() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/store/save")
                .header("content-type", "application/json; charset=UTF-8")
                .json_body(json!({
                    "key": "test-key",
                    "file": "f",
                    "options": null,
                    "id": "_data",
                    "value": {"a": 1},
                    "password": null
                }));
            then.status(200).json_body(json!({"message": "ok"}));
        })
        .await;

    let store = store_for(&server);
    let calls: Arc<Mutex<Vec<StoreResult>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    store
        .save("f", json!({"a": 1}), None)
        .on_complete(move |result| sink.lock().unwrap().push(result))
        .await
        .unwrap();

    mock.assert_async().await;
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let res = calls[0].as_ref().unwrap();
    assert_eq!(res.data, json!({"message": "ok"}));
    assert_eq!(res.message(), Some("ok"));
    assert_eq!(res.response.status, StatusCode::OK);
}

#[tokio::test]
async fn not_found_is_http_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/store/load");
            then.status(404).body("missing");
        })
        .await;

    let err = store_for(&server).load("nope", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpError);
    assert_eq!(err.kind().to_string(), "HttpError");
    assert_eq!(err.message(), "Not Found");
    let response = err.response().unwrap();
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "missing");
}

#[tokio::test]
async fn http_error_reaches_the_callback() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/store/load");
            then.status(404).body("missing");
        })
        .await;

    let calls: Arc<Mutex<Vec<StoreResult>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&calls);
    store_for(&server)
        .load("nope", None)
        .on_complete(move |result| sink.lock().unwrap().push(result))
        .await
        .unwrap();

    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    let err = calls[0].as_ref().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpError);
    assert_eq!(err.message(), "Not Found");
    let source = std::error::Error::source(err).unwrap();
    assert_eq!(source.to_string(), "HTTP status 404 Not Found");
}

#[tokio::test]
async fn unparsable_body_is_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/store/save");
            then.status(200).body("<html>busy</html>");
        })
        .await;

    let err = store_for(&server)
        .merge("f", json!({"b": 2}), None)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ParseError);
    assert!(!err.message().is_empty());
    assert!(err.response().is_some());
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let store = CloudStore::new(StoreConfig::new("test-key").with_server("http://127.0.0.1:1"))
        .unwrap()
        .with_gate(fast_gate());

    let err = store.list("", None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(err.response().is_none());
}

#[tokio::test]
async fn delete_sends_no_value() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/store/save").json_body(json!({
                "key": "test-key",
                "file": "Shopping_List",
                "options": "delete",
                "id": "_data",
                "password": "pw"
            }));
            then.status(200).json_body(json!({"message": "deleted"}));
        })
        .await;

    let res = store_for(&server)
        .delete("Shopping_List", Some("pw"))
        .await
        .unwrap();
    mock.assert_async().await;
    assert_eq!(res.message(), Some("deleted"));
}

#[tokio::test]
async fn list_goes_to_load_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/store/load").json_body(json!({
                "key": "test-key",
                "file": "",
                "options": "list",
                "id": "_data",
                "password": null
            }));
            then.status(200)
                .json_body(json!({"message": "Shopping_List,Notes"}));
        })
        .await;

    let res = store_for(&server).list("", None).await.unwrap();
    mock.assert_async().await;
    assert_eq!(res.message(), Some("Shopping_List,Notes"));
}

#[tokio::test]
async fn upload_posts_multipart_form() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload-2")
                .header_exists("content-type")
                .body_contains("name=\"key\"")
                .body_contains("test-key")
                .body_contains("name=\"password\"")
                .body_contains("filename=\"file.txt\"")
                .body_contains("myfile");
            then.status(200).json_body(json!({"message": "uploaded"}));
        })
        .await;

    let file = UploadFile::new("file.txt", b"myfile".to_vec(), "text/plain");
    let res = store_for(&server).upload(file, Some("pw")).await.unwrap();
    mock.assert_async().await;
    assert_eq!(res.message(), Some("uploaded"));
}

#[tokio::test]
async fn upload_sends_bare_mime_type_verbatim() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/upload-2")
                .body_contains("filename=\"notes\"")
                .body_contains(": text\r\n");
            then.status(200).json_body(json!({"message": "uploaded"}));
        })
        .await;

    let file = UploadFile::new("notes", b"myfile".to_vec(), "text");
    let res = store_for(&server).upload(file, None).await.unwrap();
    mock.assert_async().await;
    assert_eq!(res.message(), Some("uploaded"));
}

#[tokio::test(start_paused = true)]
async fn unsendable_upload_does_not_spend_a_permit() {
    let transport = Arc::new(RecordingTransport::default());
    let gate = Arc::new(RateGate::new(RateGateConfig::default()));
    let store = CloudStore::with_transport(StoreConfig::new("test-key"), transport.clone())
        .with_gate(Arc::clone(&gate));

    let file = UploadFile::new("notes", b"myfile".to_vec(), "text/plain\r\nx-evil: 1");
    let err = store.upload(file, None).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportError);
    assert!(err.message().contains("MIME type"), "{}", err.message());
    assert!(err.response().is_none());

    assert!(transport.started().is_empty());
    assert!(gate.try_acquire().await);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn callbacks_never_overlap() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/store/load");
            then.status(200).json_body(json!({"message": "ok"}));
        })
        .await;

    let store = CloudStore::new(StoreConfig::new("test-key").with_server(server.base_url()))
        .unwrap()
        .with_gate(Arc::new(RateGate::new(RateGateConfig {
            min_interval_ms: 1,
            offset_ms: 0,
        })));

    let inside = Arc::new(AtomicBool::new(false));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..5)
        .map(|i| {
            let inside = Arc::clone(&inside);
            let overlaps = Arc::clone(&overlaps);
            store
                .load(&format!("file-{}", i), None)
                .on_complete(move |_| {
                    if inside.swap(true, Ordering::SeqCst) {
                        overlaps.fetch_add(1, Ordering::SeqCst);
                    }
                    std::thread::sleep(Duration::from_millis(20));
                    inside.store(false, Ordering::SeqCst);
                })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap();
    }
    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
}

/// Transport that answers `{"message":"ok"}` and records when each request started.
#[derive(Default)]
struct RecordingTransport {
    started: Mutex<Vec<(Instant, StoreRequest)>>,
}

impl RecordingTransport {
    fn started(&self) -> Vec<(Instant, StoreRequest)> {
        self.started.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: StoreRequest) -> Result<RawResponse, TransportError> {
        let url = request.url.clone();
        self.started.lock().unwrap().push((Instant::now(), request));
        Ok(RawResponse {
            url,
            status: StatusCode::OK,
            headers: HeaderMap::new(),
            body: br#"{"message":"ok"}"#.to_vec(),
        })
    }
}

#[tokio::test(start_paused = true)]
async fn back_to_back_saves_are_spaced() {
    let transport = Arc::new(RecordingTransport::default());
    let store = CloudStore::with_transport(StoreConfig::new("test-key"), transport.clone())
        .with_gate(Arc::new(RateGate::new(RateGateConfig::default())));

    let first = store.save("a", json!({"n": 1}), None);
    let second = store.save("b", json!({"n": 2}), None);
    // Nothing is sent before the caller yields.
    assert!(transport.started().is_empty());

    first.await.unwrap();
    second.await.unwrap();

    let started = transport.started();
    assert_eq!(started.len(), 2);
    let (t1, t2) = (started[0].0, started[1].0);
    let gap = if t2 > t1 { t2 - t1 } else { t1 - t2 };
    assert!(gap >= Duration::from_millis(3000), "requests {:?} apart", gap);
}

#[tokio::test(start_paused = true)]
async fn clients_share_the_gate() {
    let gate = Arc::new(RateGate::new(RateGateConfig::default()));
    let transport = Arc::new(RecordingTransport::default());
    let a = CloudStore::with_transport(StoreConfig::new("key-a"), transport.clone())
        .with_gate(Arc::clone(&gate));
    let b = CloudStore::with_transport(StoreConfig::new("key-b"), transport.clone())
        .with_gate(Arc::clone(&gate));

    let start = Instant::now();
    let (ra, rb) = tokio::join!(a.load("x", None), b.load("y", None));
    ra.unwrap();
    rb.unwrap();

    assert!(Instant::now() - start >= Duration::from_millis(3000));
}

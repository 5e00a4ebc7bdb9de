//! Client for the enjine.io cloud storage service.
//!
//! Files are opaque JSON documents addressed by name. Every operation runs in
//! the background and is throttled by a process-wide [`RateGate`], so no
//! matter how many [`CloudStore`] clients exist, requests leave the process
//! at most once per gate interval.
//!
//! ```rust,no_run
//! use cloudstore::{CloudStore, StoreConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = CloudStore::new(StoreConfig::new("my-api-key"))?;
//!
//! let saved = store.save("Shopping_List", json!({"Apples": 8}), None).await?;
//! println!("{:?}", saved.message());
//!
//! store.list("Shopping", None).on_complete(|result| match result {
//!     Ok(res) => println!("files: {:?}", res.message()),
//!     Err(e) => eprintln!("{}: {}", e.kind(), e.message()),
//! });
//! # Ok(())
//! # }
//! ```

pub mod store;
pub mod utility;

pub use store::{
    ClientError, CloudStore, ErrorKind, Operation, Pending, StoreConfig, StoreError,
    StoreResponse, StoreResult, Transport, UploadFile,
};
pub use utility::rate_gate::{RateGate, RateGateConfig, RateLimiter};

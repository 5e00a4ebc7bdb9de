/// Service used when no server is configured
pub const DEFAULT_SERVER: &str = "https://enjine.cloud/cloudstore";

/// Endpoint for save, merge and delete
pub const SAVE_ENDPOINT: &str = "/store/save";
/// Endpoint for load and list
pub const LOAD_ENDPOINT: &str = "/store/load";
/// Endpoint for multipart uploads
pub const UPLOAD_ENDPOINT: &str = "/upload-2";

/// Record id sent with every JSON request
pub const DATA_ID: &str = "_data";

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Placeholder written to the default configuration file
pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

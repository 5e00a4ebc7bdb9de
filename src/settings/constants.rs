/// Environment variable overriding the configuration file location
pub const CONFIG_PATH_ENV: &str = "CLOUDSTORE_CONFIG_PATH";

/// Prefix for environment overrides, e.g. `CLOUDSTORE__STORE__API_KEY`
pub const ENV_PREFIX: &str = "CLOUDSTORE";

/// Example configuration
pub const DEFAULT_CONFIG: &str = r#"
# Logging configuration
[log]
# Level can be "error", "warn", "info", "debug", or "trace"
level = "info"

# Storage service configuration
[store]
server = "https://enjine.cloud/cloudstore"
api_key = "your_api_key_here"
# HTTP timeout in seconds
timeout_secs = 30

# Request throttling, shared by every client in the process
[rate_gate]
# Minimum delay between two requests
min_interval_ms = 3000
# Extra delay added to every wait
offset_ms = 10

# Demo program settings
[demo]
# Optional password protecting the demo file
# password = "secret"
"#;

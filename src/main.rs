// Standard library
use std::sync::Arc;

// 3rd party crates
use tokio::signal::ctrl_c;
use tracing::{error, info, warn};
use tracing_subscriber::{filter::LevelFilter, EnvFilter};

// Project modules
mod functions;
mod settings;

// Project imports
use cloudstore::{CloudStore, RateGate};
use settings::types::ConfigManager;

/// Demo client for the cloud storage service.
///
/// Loads the configuration, installs the process-wide rate gate and runs
/// every storage operation once, logging each result.
#[tokio::main]
async fn main() {
    // loads the .env file from the current directory or parents.
    dotenvy::dotenv_override().ok();

    let config: Arc<ConfigManager> = Arc::new(
        ConfigManager::new()
            .await
            .expect("Failed to initialize configuration"),
    );

    // setup logging.
    let log_level: String = config.get_log_level().await;

    let filter: EnvFilter = EnvFilter::builder()
        .with_default_directive(LevelFilter::ERROR.into())
        .parse_lossy(log_level)
        .add_directive("hyper_util=error".parse().unwrap())
        .add_directive("reqwest=error".parse().unwrap())
        .add_directive("hyper=error".parse().unwrap());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .init();

    info!("⚙️ Settings have been loaded.");

    let settings = config.get_settings().await;
    if let Err(e) = RateGate::install_global(settings.rate_gate.clone()) {
        warn!("Using the existing rate gate: {}", e);
    }

    let store: CloudStore = match CloudStore::new(settings.store.clone()) {
        Ok(store) => store,
        Err(e) => {
            error!("Failed to create storage client: {}", e);
            return;
        }
    };
    let password: Option<String> = settings.demo.password.clone();

    // Drop the settings lock
    drop(settings);

    tokio::select! {
        result = functions::run(store, password) => {
            if let Err(e) = result {
                error!("Application error: {}", e);
            }
        }
        _ = ctrl_c() => {
            info!("Received shutdown signal, abandoning pending requests...");
        }
    }

    info!("Shutdown complete.");
}

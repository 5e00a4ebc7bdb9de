// Standard library
use std::sync::Arc;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use tokio::time::Instant;
use tracing::trace;

// Current module imports
use super::errors::RateGateError;
use super::traits::{Clock, RateLimiter};
use super::types::{default_min_interval_ms, default_offset_ms, RateGate, RateGateConfig, TokioClock};

static GLOBAL_GATE: OnceCell<Arc<RateGate>> = OnceCell::new();

impl Default for RateGateConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval_ms(),
            offset_ms: default_offset_ms(),
        }
    }
}

impl RateGateConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    pub fn offset(&self) -> Duration {
        Duration::from_millis(self.offset_ms)
    }
}

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

impl RateGate {
    /// Create a gate driven by the tokio clock
    pub fn new(config: RateGateConfig) -> Self {
        Self::with_clock(config, Arc::new(TokioClock))
    }

    /// Create a gate driven by a custom clock
    pub fn with_clock(config: RateGateConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            min_interval: config.min_interval(),
            offset: config.offset(),
            last_request: tokio::sync::Mutex::new(None),
            clock,
        }
    }

    /// Returns the process-wide gate, creating it with defaults on first use.
    pub fn global() -> Arc<RateGate> {
        Arc::clone(GLOBAL_GATE.get_or_init(|| Arc::new(RateGate::new(RateGateConfig::default()))))
    }

    /// Installs a configured process-wide gate.
    ///
    /// Must run before anything touches [`RateGate::global`]; afterwards the
    /// global gate is fixed for the life of the process.
    pub fn install_global(config: RateGateConfig) -> Result<Arc<RateGate>, RateGateError> {
        let gate = Arc::new(RateGate::new(config));
        GLOBAL_GATE
            .set(Arc::clone(&gate))
            .map_err(|_| RateGateError::AlreadyInstalled)?;
        Ok(gate)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    pub fn offset(&self) -> Duration {
        self.offset
    }

    /// Runs `f` while holding the gate's lock.
    ///
    /// Permits cannot be granted while `f` runs, so `f` must not block.
    pub async fn serialize<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _guard = self.last_request.lock().await;
        f()
    }
}

#[async_trait]
impl RateLimiter for RateGate {
    async fn try_acquire(&self) -> bool {
        let mut last_request = self.last_request.lock().await;
        let now = self.clock.now();

        match *last_request {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                *last_request = Some(now);
                true
            }
        }
    }

    async fn remaining_wait(&self) -> Duration {
        let last_request = self.last_request.lock().await;
        match *last_request {
            Some(last) => {
                let elapsed = self.clock.now().saturating_duration_since(last);
                self.min_interval.saturating_sub(elapsed)
            }
            None => Duration::ZERO,
        }
    }

    async fn acquire(&self) {
        let mut attempts: u32 = 0;
        while !self.try_acquire().await {
            attempts += 1;
            let wait = self.remaining_wait().await + self.offset;
            trace!(
                attempt = attempts,
                wait_ms = wait.as_millis() as u64,
                "Rate gate closed, waiting"
            );
            self.clock.sleep(wait).await;
        }
    }
}

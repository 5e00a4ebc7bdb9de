// Standard library
use std::fmt::Debug;
use std::time::Duration;

// 3rd party crates
use async_trait::async_trait;
use tokio::time::Instant;

/// Rate limiter trait for implementing different rate limiting strategies
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Take a permit if the window allows it, without waiting.
    async fn try_acquire(&self) -> bool;
    /// Time left until the next permit could be granted.
    async fn remaining_wait(&self) -> Duration;
    /// Wait until a permit is granted.
    async fn acquire(&self);
}

/// Source of time for a rate limiter.
#[async_trait]
pub trait Clock: Debug + Send + Sync {
    fn now(&self) -> Instant;
    async fn sleep(&self, duration: Duration);
}

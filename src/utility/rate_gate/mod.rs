//! Process-wide request throttle.
//!
//! Every outgoing storage request passes through a [`RateGate`] before it
//! touches the network. The gate is a single slot: it remembers when the last
//! permit was granted and refuses new permits until the minimum interval has
//! elapsed. Waiters poll the gate, sleeping for the remaining window plus a
//! small offset between attempts. There is no waiter queue, so no fairness or
//! ordering is promised among concurrent waiters.
//!
//! Time is read and slept through a [`Clock`], which lets tests run the gate
//! against a manual clock or tokio's paused time.

pub mod errors;
pub mod impls;
pub mod traits;
pub mod types;

pub use errors::RateGateError;
pub use traits::{Clock, RateLimiter};
pub use types::{RateGate, RateGateConfig, TokioClock};

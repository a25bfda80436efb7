//! Core infrastructure for nodepool.
//!
//! This crate provides the pieces shared by the pool and its connection
//! implementations:
//! - Event system for observing pool decisions
//! - Clock abstraction so liveness timing can be driven by tests

pub mod clock;
pub mod events;

pub use clock::{Clock, ManualClock, SystemClock};
pub use events::{EventListener, EventListeners, FnListener, PoolEvent};

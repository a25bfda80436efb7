//! Connection pool integration tests.
//!
//! Test organization:
//! - failover.rs: Probing, failover and exhaustion
//! - revival.rs: Dead connections backing off and coming back
//! - selection.rs: Built-in and custom selectors through the pool
//! - concurrency.rs: Many tasks sharing one pool
//! - config.rs: Builder and serde configuration
//! - events.rs: Event listeners and callbacks

mod events;
mod selection;

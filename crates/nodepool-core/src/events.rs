//! Event system for connection pools.
//!
//! Pools report every selection decision (fast-path hits, revivals, nodes
//! marked dead, skipped nodes, exhaustion) as events. Listeners are plain
//! callbacks; nothing here is async.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

/// Trait for events emitted by a pool.
pub trait PoolEvent: Send + Sync + fmt::Debug {
    /// Returns the kind of event (e.g., "marked_dead", "exhausted").
    fn event_type(&self) -> &'static str;

    /// Returns when this event occurred.
    fn timestamp(&self) -> Instant;

    /// Returns the name of the pool that emitted this event.
    fn pool_name(&self) -> &str;
}

/// Trait for listening to pool events.
pub trait EventListener<E: PoolEvent>: Send + Sync {
    /// Called when an event occurs.
    fn on_event(&self, event: &E);
}

/// Type alias for boxed event listeners.
pub type BoxedEventListener<E> = Arc<dyn EventListener<E>>;

/// An ordered collection of event listeners.
#[derive(Clone)]
pub struct EventListeners<E: PoolEvent> {
    listeners: Vec<BoxedEventListener<E>>,
}

impl<E: PoolEvent> EventListeners<E> {
    /// Creates a new empty event listener collection.
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
        }
    }

    /// Adds a listener to the collection.
    pub fn add<L>(&mut self, listener: L)
    where
        L: EventListener<E> + 'static,
    {
        self.listeners.push(Arc::new(listener));
    }

    /// Emits an event to all registered listeners, in registration order.
    ///
    /// A panicking listener is isolated: the panic is caught and the
    /// remaining listeners still see the event. Selection must never fail
    /// because an observer did.
    pub fn emit(&self, event: &E) {
        for listener in &self.listeners {
            let _ = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                listener.on_event(event);
            }));
        }
    }

    /// Returns true if there are no listeners.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Returns the number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }
}

impl<E: PoolEvent> Default for EventListeners<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: PoolEvent> fmt::Debug for EventListeners<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventListeners")
            .field("len", &self.listeners.len())
            .finish()
    }
}

/// A closure-backed event listener.
pub struct FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    f: F,
    _phantom: std::marker::PhantomData<fn(&E)>,
}

impl<E, F> FnListener<E, F>
where
    F: Fn(&E) + Send + Sync,
{
    /// Creates a new function-based listener.
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<E, F> EventListener<E> for FnListener<E, F>
where
    E: PoolEvent,
    F: Fn(&E) + Send + Sync,
{
    fn on_event(&self, event: &E) {
        (self.f)(event)
    }
}

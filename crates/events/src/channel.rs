//! Synchronous domain-event channel (per-variant subscribers).
//!
//! The channel carries lifecycle notifications from an aggregate to
//! interested subscribers, decoupling the aggregate from side effects
//! (notifications, billing, ...). Delivery is fire-and-forget:
//!
//! - handlers run synchronously, in registration order, on the publishing
//!   thread;
//! - a handler failure (panic) is caught and logged, never surfaced back to
//!   the publisher — a misbehaving subscriber must not roll back an
//!   already-committed order;
//! - the channel holds no queue of its own. Pending events live on the
//!   aggregate (an explicit outbox) and are drained by the orchestrator
//!   only after the storage write has committed. If the write fails the
//!   outbox is discarded with the aggregate and nothing reaches the channel.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Mutex;

use crate::event::Event;

type Handler<E> = Box<dyn Fn(&E) + Send + Sync>;

/// Pub/sub channel for one event family `E`.
///
/// Subscribers register per event variant, keyed by the variant's stable
/// `event_type()` identifier.
pub struct EventChannel<E> {
    handlers: Mutex<Vec<(&'static str, Handler<E>)>>,
}

impl<E> core::fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let count = self.handlers.lock().map(|h| h.len()).unwrap_or(0);
        f.debug_struct("EventChannel")
            .field("handlers", &count)
            .finish()
    }
}

impl<E> Default for EventChannel<E> {
    fn default() -> Self {
        Self {
            handlers: Mutex::new(Vec::new()),
        }
    }
}

impl<E: Event> EventChannel<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one event variant.
    ///
    /// `event_type` must match the variant's `Event::event_type()` value;
    /// the handler sees only events of that variant.
    pub fn subscribe(
        &self,
        event_type: &'static str,
        handler: impl Fn(&E) + Send + Sync + 'static,
    ) {
        if let Ok(mut handlers) = self.handlers.lock() {
            handlers.push((event_type, Box::new(handler)));
        }
    }

    /// Dispatch one event to every subscriber of its variant.
    ///
    /// Callers must only publish events drained from an aggregate whose
    /// write has already committed.
    pub fn publish(&self, event: &E) {
        let handlers = match self.handlers.lock() {
            Ok(handlers) => handlers,
            Err(_) => {
                tracing::error!(event_type = event.event_type(), "event channel poisoned");
                return;
            }
        };

        for (event_type, handler) in handlers.iter() {
            if *event_type != event.event_type() {
                continue;
            }
            if catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                tracing::error!(
                    event_type = event.event_type(),
                    "event subscriber panicked; continuing delivery"
                );
            }
        }
    }
}

use chrono::{DateTime, Utc};

/// A domain event: a notification that something happened to an aggregate.
///
/// Events are:
/// - **immutable** (treat them as facts)
/// - **versioned** (schema evolution)
/// - published only **after** the aggregate's write has committed
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name/type identifier (e.g. "orders.order.confirmed").
    ///
    /// Subscribers register against this identifier, so it doubles as the
    /// event-variant key for delivery.
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the event occurred (business time).
    fn occurred_at(&self) -> DateTime<Utc>;
}

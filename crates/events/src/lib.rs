//! `prato-events` — domain event contract and delivery channel.

pub mod channel;
pub mod event;

pub use channel::EventChannel;
pub use event::Event;

//! Event Bus & Telemetry: an in-process typed pub/sub for task and
//! bootstrap lifecycle events, with `tracing` as the structured log sink.

pub mod bus;
pub mod event;

pub use bus::EventBus;
pub use event::Event;

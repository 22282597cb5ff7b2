//! Medika event notification pipeline.
//!
//! This crate carries every state change in the appointment domain from the
//! code that produced it to the external parties that asked to hear about it:
//!
//! - [`DomainEvent`] / [`EventKind`] — the closed catalog of appointment
//!   lifecycle facts.
//! - [`EventBus`] — in-process, synchronous publish/subscribe hub that
//!   decouples domain logic from side effects.
//! - [`handlers`] — the bridge that turns a typed event into a
//!   `(topic, payload)` pair and hands it to delivery.
//! - [`delivery`] — the webhook delivery engine: signed envelopes, bounded
//!   retries with exponential backoff, per-endpoint failure isolation.
//!
//! Delivery is best-effort and fire-and-forget: the caller that published a
//! domain event never waits on, nor learns about, subscriber outcomes.

pub mod bus;
pub mod delivery;
pub mod envelope;
pub mod event;
pub mod handlers;

pub use bus::{EventBus, HandlerError};
pub use delivery::webhook::{DeliveryConfig, DeliveryEngine};
pub use envelope::WebhookEnvelope;
pub use event::{DomainEvent, EventKind};
pub use handlers::register_event_handlers;

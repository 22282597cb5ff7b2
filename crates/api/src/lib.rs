//! HTTP front end for the Medika webhook pipeline.
//!
//! Exposes admin CRUD for webhook subscriptions, the event-type vocabulary,
//! a test-fire endpoint that pushes a synthetic event through the real
//! pipeline, and a health check.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod state;

//! Outbound webhook delivery: signing and the retry engine.

pub mod signing;
pub mod webhook;

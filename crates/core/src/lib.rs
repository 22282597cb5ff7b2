//! Shared domain types and errors for the Medika backend.

pub mod error;
pub mod types;

//! Core types shared across the crate.
//!
//! Currently this hosts the error types; see [`error`] for the full taxonomy
//! of load failures and the propagation policy.

pub mod error;

pub use error::DataLoadError;

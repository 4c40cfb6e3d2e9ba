//! Shared types for the viewing statistics pipeline.
//!
//! Domain records, the error type, timestamp and duration parsing, display
//! formatting and the command-line settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

pub use error::{Result, ViewingError};

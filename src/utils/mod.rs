// src/utils/mod.rs
pub mod error;
pub mod logging;

pub use error::{AppError, EdgarError, TransportError}; // Re-export error types for convenience

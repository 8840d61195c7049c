//! Unified error types for Loquat.
//!
//! A single error type covers both the infrastructure failures (I/O, XML,
//! ZIP) and the domain conditions raised while building or placing
//! document elements.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result};

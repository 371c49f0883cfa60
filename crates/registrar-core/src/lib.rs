//! # Registrar Core
//!
//! Core types, errors, and utilities shared by the registrar portal crates.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`envelope`]: Decoding of the registrar backend's response envelope
//! - [`serde`]: Custom serde deserialization helpers
//!
//! # Example
//!
//! ```ignore
//! use registrar_core::envelope::decode_content;
//! use registrar_core::errors::AppError;
//!
//! let schools: Vec<School> = decode_content(&body)?;
//! let error = AppError::not_found(anyhow::anyhow!("Filter session not found"));
//! ```

pub mod envelope;
pub mod errors;
pub mod serde;

// Re-export commonly used types at crate root
pub use envelope::{ApiEnvelope, EnvelopeError, decode_content};
pub use errors::{AppError, ErrorResponse};

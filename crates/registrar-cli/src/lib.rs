//! # Registrar CLI
//!
//! Catalogue inspection and filter resolution for the registrar portal.
//!
//! This library crate holds the logic behind the `registrar-cli` binary so it
//! can be exercised without a terminal.
//!
//! ## Usage
//!
//! ```ignore
//! use registrar_cli::resolve::{resolve, selection_update};
//!
//! let update = selection_update(Some("1"), Some("10"), None, None)?;
//! let view = resolve(provider, StoreConfig::default(), update).await?;
//! println!("{}", registrar_cli::render::view_summary(&view));
//! ```

pub mod render;
pub mod resolve;

//! # Registrar Config
//!
//! Configuration types loaded from environment variables:
//!
//! - [`catalog`]: Where option lists come from and how they are fetched
//! - [`cors`]: CORS (Cross-Origin Resource Sharing) configuration
//! - [`server`]: Listen address
//! - [`session`]: Filter session eviction limits
//!
//! # Example
//!
//! ```ignore
//! use registrar_config::{CatalogConfig, CorsConfig, ServerConfig};
//!
//! let catalog = CatalogConfig::from_env();
//! let cors = CorsConfig::from_env();
//! let server = ServerConfig::from_env();
//! ```

pub mod catalog;
pub mod cors;
pub mod server;
pub mod session;

pub use catalog::{CatalogConfig, OptionSourceKind};
pub use cors::CorsConfig;
pub use server::ServerConfig;
pub use session::SessionConfig;

/// Reads and parses an environment variable, falling back to `default` when
/// it is unset or unparsable.
pub(crate) fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!(key, value = %raw, "Ignoring unparsable environment variable");
                default
            }
        },
        Err(_) => default,
    }
}

//! # Registrar Filters
//!
//! The cascading school → department → program filter shared by the
//! registrar portal's screens.
//!
//! # Architecture
//!
//! ```text
//! OptionProvider (HTTP backend | static catalogue)
//!     ↓ FetchPolicy (timeout, fallback tagging)
//! FilterStore (FilterState + FilterOptions, watch channel)
//!     ↓ snapshot
//! selectors (filtered pools, current entities) + search
//! ```
//!
//! - [`provider`]: Option providers and the [`OptionProvider`] trait
//! - [`fetch`]: Timeout and fallback policy around provider calls
//! - [`fallback`]: Built-in catalogue used when fallback is enabled
//! - [`sequence`]: Request tokens that discard superseded responses
//! - [`store`]: The [`FilterStore`] and its snapshots
//! - [`selectors`]: Pure derivations over state and pools
//! - [`search`]: Free-text search and consumer record filtering
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use registrar_filters::{FilterStore, StaticOptionProvider, StoreConfig};
//! use registrar_models::{FilterUpdate, Selection};
//!
//! let store = FilterStore::new(
//!     Arc::new(StaticOptionProvider::builtin()),
//!     StoreConfig::default(),
//!     &FilterUpdate::default(),
//! );
//! store.load_options().await;
//! store.update_filters(FilterUpdate::default().school(Selection::one("1")))?;
//! let departments = store.filtered_departments();
//! ```

pub mod error;
pub mod fallback;
pub mod fetch;
pub mod provider;
pub mod search;
pub mod selectors;
pub mod sequence;
pub mod store;

pub use error::{FilterError, ProviderError};
pub use fetch::{DataSource, FetchOutcome, FetchPolicy, OptionKind};
pub use provider::{HttpOptionProvider, OptionProvider, OptionSource, StaticOptionProvider};
pub use search::{HierarchyScoped, ScopedRecord, Searchable, filter_records, matches_search};
pub use sequence::{RequestSequencer, RequestToken};
pub use store::{FilterSnapshot, FilterStore, FilterView, PoolSources, StoreConfig};

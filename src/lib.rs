//! # Registrar Filter API
//!
//! Server-side home of the registrar portal's cascading
//! school → department → program filter.
//!
//! ## Overview
//!
//! Each consumer view (student list, admissions queue, exam schedule) opens a
//! **filter session**. A session owns a [`FilterStore`](registrar_filters::FilterStore)
//! that loads its option pools from the configured source and keeps the
//! selection consistent: choosing a new school clears the department and
//! program, choosing a new department clears the program.
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── modules/
//! │   └── filter_sessions/  # Session lifecycle, filter updates, listings
//! ├── docs.rs               # OpenAPI document
//! ├── router.rs             # Main router, health and metrics endpoints
//! ├── state.rs              # Shared application state and session registry
//! └── validator.rs          # Validated JSON extractor
//! crates/
//! ├── registrar-core/       # AppError, backend envelope decoding
//! ├── registrar-config/     # Environment configuration
//! ├── registrar-models/     # Catalogue entities, ids, filter state
//! ├── registrar-filters/    # Store, providers, selectors, search
//! ├── registrar-observability/ # Logging, tracing, Prometheus
//! └── registrar-cli/        # Catalogue inspection CLI
//! ```
//!
//! The feature module follows the usual layout: `controller.rs` (HTTP
//! handlers), `service.rs` (logic), `model.rs` (DTOs), `router.rs`.
//!
//! ## Quick Start
//!
//! ```bash
//! REGISTRAR_OPTION_SOURCE=static cargo run
//! curl -X POST localhost:3000/api/filter-sessions \
//!      -H 'content-type: application/json' \
//!      -d '{"filters": {"school": "1"}}'
//! ```
//!
//! API documentation is served at `/swagger-ui` and `/scalar`.

pub mod docs;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use registrar_config;
pub use registrar_core;
pub use registrar_filters;
pub use registrar_models;

//! Registrar Observability
//!
//! Provides:
//! - Console, rolling-file and JSON logging via `tracing`
//! - Distributed tracing via OpenTelemetry (when `OTEL_EXPORTER_OTLP_ENDPOINT` is set)
//! - Prometheus metrics and HTTP request metrics
//!
//! Everything except basic console logging sits behind the `observability`
//! feature (on by default). At runtime it can be switched off with
//! `OBSERVABILITY_ENABLED=false`.
//!
//! # Examples
//!
//! ```no_run
//! use registrar_observability::{init_tracing, shutdown_tracer};
//!
//! #[tokio::main]
//! async fn main() {
//!     init_tracing();
//!     // ... application code ...
//!     shutdown_tracer().await;
//! }
//! ```

pub mod basic_logging;
#[cfg(feature = "observability")]
pub mod logging;
#[cfg(feature = "observability")]
pub mod metrics;

pub use basic_logging::init_basic_console_logging;

#[cfg(feature = "observability")]
pub use metrics_exporter_prometheus::PrometheusHandle;

#[cfg(feature = "observability")]
pub use logging::{init_tracing, is_observability_enabled, logging_middleware, shutdown_tracer};
#[cfg(feature = "observability")]
pub use metrics::{
    init_metrics, metrics_middleware, set_active_filter_sessions, track_filter_session_closed,
    track_filter_session_created,
};

// No-op stubs when observability is disabled
#[cfg(not(feature = "observability"))]
pub mod stubs {
    use axum::{extract::Request, middleware::Next, response::Response};

    /// Stand-in for the Prometheus handle so callers keep one signature.
    #[derive(Debug, Clone)]
    pub struct PrometheusHandle;

    impl PrometheusHandle {
        pub fn render(&self) -> String {
            String::new()
        }
    }

    pub fn is_observability_enabled() -> bool {
        false
    }

    pub async fn logging_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub async fn metrics_middleware(req: Request, next: Next) -> Response {
        next.run(req).await
    }

    pub fn init_tracing() {
        super::init_basic_console_logging();
    }

    pub async fn shutdown_tracer() {}

    pub fn init_metrics() -> Option<PrometheusHandle> {
        None
    }

    pub fn track_filter_session_created(_load_mode: &str) {}
    pub fn track_filter_session_closed() {}
    pub fn set_active_filter_sessions(_count: usize) {}
}

#[cfg(not(feature = "observability"))]
pub use stubs::*;

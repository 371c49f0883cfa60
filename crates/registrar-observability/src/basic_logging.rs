use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize console-only logging.
///
/// Used by the CLI and by the service when observability is disabled.
/// Output goes to stderr so command output on stdout stays machine-readable.
///
/// - **Log Level**: `LOG_LEVEL` (default: "info"), or a full `RUST_LOG` directive
/// - **Filtering**: Noisy dependencies are held at warn
pub fn init_basic_console_logging() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&log_level())));

    let console_layer = fmt::layer()
        .compact()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(true)
        .with_line_number(true)
        .with_filter(env_filter);

    // A subscriber may already be installed (tests, embedding binaries).
    let _ = tracing_subscriber::registry().with(console_layer).try_init();
}

pub(crate) fn log_level() -> String {
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string())
}

pub(crate) fn default_directives(level: &str) -> String {
    format!(
        "{level},tower_http=warn,hyper=warn,hyper_util=warn,reqwest=warn,tonic=warn,h2=warn"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_quiet_dependencies() {
        let directives = default_directives("debug");
        assert!(directives.starts_with("debug,"));
        assert!(directives.contains("reqwest=warn"));
        assert!(EnvFilter::try_new(&directives).is_ok());
    }

    #[test]
    fn test_init_twice_does_not_panic() {
        init_basic_console_logging();
        init_basic_console_logging();
    }
}

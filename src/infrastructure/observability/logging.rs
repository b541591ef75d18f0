use tracing_subscriber::EnvFilter;

pub const DEFAULT_LOG_DIRECTIVES: &str = "info";

/// Log filter built from `RUST_LOG`-style directives.
///
/// Directives that are missing, blank or unparseable fall back to `info`.
/// A valid global level such as `debug` is used as given.
pub fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .filter(|d| !d.trim().is_empty())
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_DIRECTIVES))
}

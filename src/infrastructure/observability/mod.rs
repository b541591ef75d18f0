//! Pull-based observability for the exporter
//!
//! Counter state is held in a private Prometheus registry and rendered on
//! demand, either for an HTTP scrape or once to stdout.

pub mod logging;
pub mod metrics;

pub use logging::log_filter;
pub use metrics::{NAMESPACE, TRAFFIC_LABELS, TrafficCounters};

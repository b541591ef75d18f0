//! Prometheus counter families exposed by the exporter
//!
//! All families live in the `hetzner_traffic` namespace and share one label set.

use prometheus::{CounterVec, Opts, Registry, TextEncoder};

pub const NAMESPACE: &str = "hetzner_traffic";

/// Label names, in the order `with_label_values` expects them.
pub const TRAFFIC_LABELS: [&str; 5] = [
    "address",
    "dns_name",
    "server_name",
    "server_number",
    "product",
];

/// The three traffic counter families and the registry they are gathered from
pub struct TrafficCounters {
    registry: Registry,
    /// Input traffic for the current billing period
    pub input_gb: CounterVec,
    /// Output traffic for the current billing period
    pub output_gb: CounterVec,
    /// Input plus output traffic for the current billing period
    pub total_gb: CounterVec,
}

impl TrafficCounters {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let input_gb = CounterVec::new(
            Opts::new("input_gb", "Input traffic in GB").namespace(NAMESPACE),
            &TRAFFIC_LABELS,
        )?;
        registry.register(Box::new(input_gb.clone()))?;

        let output_gb = CounterVec::new(
            Opts::new("output_gb", "Output traffic in GB").namespace(NAMESPACE),
            &TRAFFIC_LABELS,
        )?;
        registry.register(Box::new(output_gb.clone()))?;

        let total_gb = CounterVec::new(
            Opts::new("total_gb", "Used total traffic (input and output) in GB")
                .namespace(NAMESPACE),
            &TRAFFIC_LABELS,
        )?;
        registry.register(Box::new(total_gb.clone()))?;

        Ok(Self {
            registry,
            input_gb,
            output_gb,
            total_gb,
        })
    }

    /// Drop every label combination from all three families
    pub fn reset(&self) {
        self.input_gb.reset();
        self.output_gb.reset();
        self.total_gb.reset();
    }

    /// Render all families in Prometheus text format
    pub fn encode(&self) -> Result<String, prometheus::Error> {
        TextEncoder::new().encode_to_string(&self.registry.gather())
    }
}

use crate::domain::traffic::TrafficInfo;
use crate::infrastructure::observability::TrafficCounters;
use tokio::sync::RwLock;
use tracing::warn;

/// Outcome of folding one snapshot into the counters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReconcileSummary {
    pub entries: usize,
    pub total: f64,
}

/// Owns the exposed counter state.
///
/// There is exactly one writer (`apply`, driven by the scheduler) and any number
/// of concurrent readers (`render`, driven by scrapes). The reset and refill
/// happen under one write guard, so a reader sees either the previous snapshot
/// or the new one, never an empty or half-filled set.
pub struct MetricReconciler {
    counters: RwLock<TrafficCounters>,
}

impl MetricReconciler {
    pub fn new() -> Result<Self, prometheus::Error> {
        Ok(Self {
            counters: RwLock::new(TrafficCounters::new()?),
        })
    }

    /// Replace the exposed state with `snapshot`.
    ///
    /// Counters are additive, so "set" is expressed as reset followed by one
    /// `inc_by` per record. Every label set is created even for a zero value.
    pub async fn apply(&self, snapshot: &[TrafficInfo]) -> ReconcileSummary {
        let counters = self.counters.write().await;
        counters.reset();

        let mut total = 0.0;
        for info in snapshot {
            let server_number = info.server_number().to_string();
            let labels = [
                info.address.as_str(),
                info.dns_name.as_str(),
                info.server_name(),
                server_number.as_str(),
                info.product(),
            ];

            add(&counters.input_gb, &labels, info.traffic.input, "input");
            add(&counters.output_gb, &labels, info.traffic.output, "output");
            add(&counters.total_gb, &labels, info.traffic.total, "total");
            total += info.traffic.total;
        }

        ReconcileSummary {
            entries: snapshot.len(),
            total,
        }
    }

    /// Current state in Prometheus text exposition format
    pub async fn render(&self) -> Result<String, prometheus::Error> {
        self.counters.read().await.encode()
    }
}

fn add(family: &prometheus::CounterVec, labels: &[&str; 5], value: f64, direction: &str) {
    let counter = family.with_label_values(&labels[..]);
    if value >= 0.0 {
        counter.inc_by(value);
    } else {
        warn!(
            "MetricReconciler: Ignoring negative {} value {} for {}",
            direction, value, labels[0]
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::traffic::{AddressKey, ServerLabels, TrafficRecord};

    fn info(address: &str, total: f64) -> TrafficInfo {
        TrafficInfo {
            address: AddressKey::from(address),
            traffic: TrafficRecord {
                input: total / 2.0,
                output: total / 2.0,
                total,
            },
            server: Some(ServerLabels {
                number: 100,
                name: "srv".to_string(),
                product: "EX 41".to_string(),
            }),
            dns_name: String::new(),
        }
    }

    #[tokio::test]
    async fn test_apply_sets_instead_of_accumulating() {
        let reconciler = MetricReconciler::new().unwrap();
        reconciler.apply(&[info("1.2.3.4", 3.0)]).await;
        reconciler.apply(&[info("1.2.3.4", 5.0)]).await;

        let output = reconciler.render().await.unwrap();
        assert!(output.contains(
            r#"hetzner_traffic_total_gb{address="1.2.3.4",dns_name="",product="EX 41",server_name="srv",server_number="100"} 5"#
        ));
    }

    #[tokio::test]
    async fn test_stale_addresses_are_dropped() {
        let reconciler = MetricReconciler::new().unwrap();
        reconciler
            .apply(&[info("1.2.3.4", 1.0), info("5.6.7.8", 1.0)])
            .await;
        reconciler.apply(&[info("5.6.7.8", 2.0)]).await;

        let output = reconciler.render().await.unwrap();
        assert!(!output.contains("1.2.3.4"));
        assert!(output.contains("5.6.7.8"));
    }

    #[tokio::test]
    async fn test_zero_traffic_still_exposes_label_set() {
        let reconciler = MetricReconciler::new().unwrap();
        reconciler.apply(&[info("9.9.9.9", 0.0)]).await;
        let output = reconciler.render().await.unwrap();
        assert!(output.contains(r#"address="9.9.9.9""#));
    }

    #[tokio::test]
    async fn test_summary_aggregates_totals() {
        let reconciler = MetricReconciler::new().unwrap();
        let summary = reconciler
            .apply(&[info("1.2.3.4", 3.0), info("10.0.0.0/24", 9.0)])
            .await;
        assert_eq!(summary.entries, 2);
        assert_eq!(summary.total, 12.0);
    }
}

//! Scrapes racing a reconciliation must always see a complete snapshot.

use hetzner_traffic_exporter::application::MetricReconciler;
use hetzner_traffic_exporter::domain::traffic::{
    AddressKey, ServerLabels, TrafficInfo, TrafficRecord,
};
use std::sync::Arc;

const ENTRIES: usize = 500;
const APPLIES: usize = 200;
const RENDERS: usize = 400;

fn snapshot(generation: usize) -> Vec<TrafficInfo> {
    (0..ENTRIES)
        .map(|i| TrafficInfo {
            address: AddressKey::new(format!("10.{}.{}.1", i / 256, i % 256)),
            traffic: TrafficRecord {
                input: generation as f64,
                output: 1.0,
                total: generation as f64 + 1.0,
            },
            server: Some(ServerLabels {
                number: i as u64,
                name: format!("srv-{}", i),
                product: "EX 41".to_string(),
            }),
            dns_name: String::new(),
        })
        .collect()
}

fn total_samples(output: &str) -> usize {
    output
        .lines()
        .filter(|line| line.starts_with("hetzner_traffic_total_gb{"))
        .count()
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_scrape_during_apply_sees_full_label_set() {
    let reconciler = Arc::new(MetricReconciler::new().unwrap());
    reconciler.apply(&snapshot(0)).await;

    let writer = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move {
            for generation in 1..=APPLIES {
                reconciler.apply(&snapshot(generation)).await;
                tokio::task::yield_now().await;
            }
        })
    };

    let reader = {
        let reconciler = reconciler.clone();
        tokio::spawn(async move {
            let mut seen = Vec::with_capacity(RENDERS);
            for _ in 0..RENDERS {
                let output = reconciler.render().await.unwrap();
                seen.push(total_samples(&output));
                tokio::task::yield_now().await;
            }
            seen
        })
    };

    writer.await.unwrap();
    let seen = reader.await.unwrap();

    assert_eq!(seen.len(), RENDERS);
    assert!(
        seen.iter().all(|&count| count == ENTRIES),
        "partial scrape observed: min={:?}",
        seen.iter().min()
    );
}

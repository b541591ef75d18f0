use crate::domain::errors::RobotError;
use crate::domain::ports::RobotApi;
use crate::domain::traffic::{
    AddressKey, BillingPeriod, ReverseDnsTable, ServerEntry, ServerLabels, TrafficInfo,
    TrafficQuery, TrafficTable,
};
use chrono::Local;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Builds one traffic snapshot from the three Robot endpoints.
///
/// Any failed call aborts the whole build; no partial snapshot is returned.
pub struct SnapshotBuilder {
    api: Arc<dyn RobotApi>,
}

impl SnapshotBuilder {
    pub fn new(api: Arc<dyn RobotApi>) -> Self {
        Self { api }
    }

    pub async fn build(&self) -> Result<Vec<TrafficInfo>, RobotError> {
        self.build_for(BillingPeriod::containing(&Local::now())).await
    }

    pub async fn build_for(&self, period: BillingPeriod) -> Result<Vec<TrafficInfo>, RobotError> {
        let servers = self.api.servers().await?;

        let (index, query) = index_inventory(&servers, period);
        debug!(
            "SnapshotBuilder: {} servers, {} ips, {} subnets for {}",
            servers.len(),
            query.ips.len(),
            query.subnets.len(),
            period
        );

        // Reverse DNS does not depend on the inventory; fetch it alongside the traffic.
        let (rdns, traffic) =
            tokio::try_join!(self.api.reverse_dns(), self.api.traffic(&query))?;

        Ok(join(&traffic, &index, &rdns))
    }
}

/// Join table from address key to owning server, plus the traffic request parameters.
///
/// A key claimed by several servers resolves to the last one listed.
pub fn index_inventory(
    servers: &[ServerEntry],
    period: BillingPeriod,
) -> (HashMap<AddressKey, ServerLabels>, TrafficQuery) {
    let mut index = HashMap::new();
    let mut query = TrafficQuery::new(period);

    for server in servers {
        for ip in &server.ips {
            index.insert(AddressKey::new(ip.as_str()), ServerLabels::from(server));
            query.ips.push(ip.clone());
        }
    }

    for server in servers {
        for subnet in &server.subnets {
            index.insert(subnet.key(), ServerLabels::from(server));
            query.subnets.push(subnet.ip.clone());
        }
    }

    (index, query)
}

/// One record per traffic entry; inventory entries without traffic produce nothing.
pub fn join(
    traffic: &TrafficTable,
    index: &HashMap<AddressKey, ServerLabels>,
    rdns: &ReverseDnsTable,
) -> Vec<TrafficInfo> {
    traffic
        .iter()
        .map(|(address, record)| TrafficInfo {
            address: address.clone(),
            traffic: *record,
            server: index.get(address).cloned(),
            dns_name: rdns.resolve(address).unwrap_or_default().to_string(),
        })
        .collect()
}

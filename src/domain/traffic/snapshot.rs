use super::address::AddressKey;
use super::inventory::ServerEntry;
use super::period::BillingPeriod;
use std::collections::{BTreeMap, HashMap};

/// Period totals for one address or subnet, in whatever unit the provider reports.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrafficRecord {
    pub input: f64,
    pub output: f64,
    pub total: f64,
}

pub type TrafficTable = BTreeMap<AddressKey, TrafficRecord>;

/// PTR records keyed by bare IP address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReverseDnsTable(HashMap<String, String>);

impl ReverseDnsTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ip: impl Into<String>, ptr: impl Into<String>) {
        self.0.insert(ip.into(), ptr.into());
    }

    /// Direct lookup by key, falling back to the IP part of a subnet key.
    pub fn resolve(&self, key: &AddressKey) -> Option<&str> {
        self.0
            .get(key.as_str())
            .or_else(|| self.0.get(key.ip_portion()))
            .map(String::as_str)
    }
}

impl FromIterator<(String, String)> for ReverseDnsTable {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Parameters for the traffic-by-address request.
///
/// Only the network address of a subnet is sent, never its mask.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficQuery {
    pub period: BillingPeriod,
    pub ips: Vec<String>,
    pub subnets: Vec<String>,
}

impl TrafficQuery {
    pub fn new(period: BillingPeriod) -> Self {
        Self {
            period,
            ips: Vec::new(),
            subnets: Vec::new(),
        }
    }

    pub fn form_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("type", "month".to_string()),
            ("from", self.period.from()),
            ("to", self.period.to()),
        ];
        pairs.extend(self.ips.iter().map(|ip| ("ip[]", ip.clone())));
        pairs.extend(self.subnets.iter().map(|ip| ("subnet[]", ip.clone())));
        pairs
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLabels {
    pub number: u64,
    pub name: String,
    pub product: String,
}

impl From<&ServerEntry> for ServerLabels {
    fn from(server: &ServerEntry) -> Self {
        Self {
            number: server.server_number,
            name: server.server_name.clone(),
            product: server.product.clone(),
        }
    }
}

/// Denormalized join of one traffic entry with inventory and reverse DNS data.
#[derive(Debug, Clone, PartialEq)]
pub struct TrafficInfo {
    pub address: AddressKey,
    pub traffic: TrafficRecord,
    pub server: Option<ServerLabels>,
    pub dns_name: String,
}

impl TrafficInfo {
    pub fn server_number(&self) -> u64 {
        self.server.as_ref().map(|s| s.number).unwrap_or_default()
    }

    pub fn server_name(&self) -> &str {
        self.server.as_ref().map(|s| s.name.as_str()).unwrap_or_default()
    }

    pub fn product(&self) -> &str {
        self.server
            .as_ref()
            .map(|s| s.product.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_rdns_direct_match_wins() {
        let mut rdns = ReverseDnsTable::new();
        rdns.insert("5.5.5.5/32", "direct");
        rdns.insert("5.5.5.5", "prefix");
        assert_eq!(rdns.resolve(&AddressKey::from("5.5.5.5/32")), Some("direct"));
    }

    #[test]
    fn test_rdns_subnet_falls_back_to_ip() {
        let rdns: ReverseDnsTable = [("5.5.5.5".to_string(), "foo".to_string())]
            .into_iter()
            .collect();
        assert_eq!(rdns.resolve(&AddressKey::from("5.5.5.5/32")), Some("foo"));
        assert_eq!(rdns.resolve(&AddressKey::from("10.0.0.0/24")), None);
    }

    #[test]
    fn test_query_form_pairs_order() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 0, 0).unwrap();
        let mut query = TrafficQuery::new(BillingPeriod::containing(&now));
        query.ips.push("1.2.3.4".to_string());
        query.subnets.push("10.0.0.0".to_string());

        let pairs = query.form_pairs();
        assert_eq!(
            pairs,
            vec![
                ("type", "month".to_string()),
                ("from", "2026-10-01".to_string()),
                ("to", "2026-10-31".to_string()),
                ("ip[]", "1.2.3.4".to_string()),
                ("subnet[]", "10.0.0.0".to_string()),
            ]
        );
    }

    #[test]
    fn test_unmatched_info_has_empty_server_labels() {
        let info = TrafficInfo {
            address: AddressKey::from("9.9.9.9"),
            traffic: TrafficRecord::default(),
            server: None,
            dns_name: String::new(),
        };
        assert_eq!(info.server_number(), 0);
        assert_eq!(info.server_name(), "");
        assert_eq!(info.product(), "");
    }
}

use crate::domain::errors::RobotError;
use crate::domain::ports::RobotApi;
use crate::domain::traffic::{
    AddressKey, ReverseDnsTable, ServerEntry, Subnet, TrafficQuery, TrafficRecord, TrafficTable,
};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;

/// Failure the mock injects into the next calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Transport,
    Api,
    MalformedErrorBody,
    Decode,
}

impl MockFailure {
    fn to_error(self, endpoint: &str) -> RobotError {
        let endpoint = endpoint.to_string();
        let bad_json = || serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        match self {
            Self::Transport => RobotError::Transport {
                endpoint,
                source: reqwest_middleware::Error::Middleware(anyhow::anyhow!(
                    "connection refused"
                )),
            },
            Self::Api => RobotError::Api {
                endpoint,
                status: 403,
                code: "RATE_LIMIT_EXCEEDED".to_string(),
                message: None,
            },
            Self::MalformedErrorBody => RobotError::MalformedErrorBody {
                endpoint,
                http_status: 502,
                source: bad_json(),
            },
            Self::Decode => RobotError::Decode {
                endpoint,
                source: bad_json(),
            },
        }
    }
}

#[derive(Default)]
struct MockState {
    servers: Vec<ServerEntry>,
    rdns: ReverseDnsTable,
    traffic: TrafficTable,
    failure: Option<(&'static str, MockFailure)>,
    inventory_calls: Vec<Instant>,
    queries: Vec<TrafficQuery>,
}

/// In-memory Robot API for tests and local runs.
#[derive(Default)]
pub struct MockRobotApi {
    state: Mutex<MockState>,
}

impl MockRobotApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_server(self, number: u64, name: &str, ips: &[&str], subnets: &[(&str, &str)]) -> Self {
        self.lock().servers.push(ServerEntry {
            server_number: number,
            server_name: name.to_string(),
            product: format!("Product {}", number),
            ips: ips.iter().map(|ip| ip.to_string()).collect(),
            subnets: subnets
                .iter()
                .map(|(ip, mask)| Subnet {
                    ip: ip.to_string(),
                    mask: mask.to_string(),
                })
                .collect(),
            ..Default::default()
        });
        self
    }

    pub fn with_rdns(self, ip: &str, ptr: &str) -> Self {
        self.lock().rdns.insert(ip, ptr);
        self
    }

    pub fn with_traffic(self, key: &str, input: f64, output: f64, total: f64) -> Self {
        self.set_traffic(key, input, output, total);
        self
    }

    pub fn set_traffic(&self, key: &str, input: f64, output: f64, total: f64) {
        self.lock().traffic.insert(
            AddressKey::from(key),
            TrafficRecord {
                input,
                output,
                total,
            },
        );
    }

    pub fn clear_traffic(&self) {
        self.lock().traffic.clear();
    }

    /// Make calls to `endpoint` (`"/server"`, `"/rdns"` or `"/traffic"`) fail
    /// until `recover` is called.
    pub fn fail(&self, endpoint: &'static str, failure: MockFailure) {
        self.lock().failure = Some((endpoint, failure));
    }

    pub fn recover(&self) {
        self.lock().failure = None;
    }

    /// Instants at which the inventory was requested, one per cycle.
    pub fn inventory_calls(&self) -> Vec<Instant> {
        self.lock().inventory_calls.clone()
    }

    pub fn traffic_queries(&self) -> Vec<TrafficQuery> {
        self.lock().queries.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, endpoint: &str) -> Result<(), RobotError> {
        match self.lock().failure {
            Some((failing, failure)) if failing == endpoint => {
                debug!("MockRobotApi: injecting {:?} on {}", failure, endpoint);
                Err(failure.to_error(endpoint))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl RobotApi for MockRobotApi {
    async fn servers(&self) -> Result<Vec<ServerEntry>, RobotError> {
        self.lock().inventory_calls.push(Instant::now());
        self.check("/server")?;
        Ok(self.lock().servers.clone())
    }

    async fn reverse_dns(&self) -> Result<ReverseDnsTable, RobotError> {
        self.check("/rdns")?;
        Ok(self.lock().rdns.clone())
    }

    async fn traffic(&self, query: &TrafficQuery) -> Result<TrafficTable, RobotError> {
        self.lock().queries.push(query.clone());
        self.check("/traffic")?;
        Ok(self.lock().traffic.clone())
    }
}

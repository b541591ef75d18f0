use crate::domain::errors::RobotError;
use crate::domain::traffic::{ReverseDnsTable, ServerEntry, TrafficQuery, TrafficTable};
use async_trait::async_trait;

/// The three read-only Robot endpoints needed for traffic accounting.
#[async_trait]
pub trait RobotApi: Send + Sync {
    async fn servers(&self) -> Result<Vec<ServerEntry>, RobotError>;
    async fn reverse_dns(&self) -> Result<ReverseDnsTable, RobotError>;
    async fn traffic(&self, query: &TrafficQuery) -> Result<TrafficTable, RobotError>;
}

pub mod address;
pub mod inventory;
pub mod period;
pub mod snapshot;

pub use address::AddressKey;
pub use inventory::{ServerEntry, Subnet};
pub use period::BillingPeriod;
pub use snapshot::{
    ReverseDnsTable, ServerLabels, TrafficInfo, TrafficQuery, TrafficRecord, TrafficTable,
};

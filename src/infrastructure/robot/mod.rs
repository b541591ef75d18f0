pub mod client;
pub mod dto;

pub use client::{RDNS_ENDPOINT, RobotClient, SERVER_ENDPOINT, TRAFFIC_ENDPOINT};

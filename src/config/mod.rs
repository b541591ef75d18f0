//! Configuration module for the traffic exporter.
//!
//! Credentials and transport limits come from the environment (optionally a
//! `.env` file); runtime behaviour comes from command-line flags.

mod exporter_config;
mod robot_config;

pub use exporter_config::{
    DEFAULT_INTERVAL_MINUTES, DEFAULT_LISTEN_ADDR, ExporterConfig, PollInterval,
};
pub use robot_config::{
    DEFAULT_ROBOT_URL, HttpClientSettings, RobotCredentials, RobotEnvConfig,
};

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub robot: RobotEnvConfig,
    pub exporter: ExporterConfig,
}

impl Config {
    /// Load the Robot settings from the environment and combine them with the
    /// already-parsed runtime flags.
    pub fn from_env(exporter: ExporterConfig) -> Result<Self> {
        let robot = RobotEnvConfig::from_env().context("Failed to load Robot credentials")?;
        Ok(Self { robot, exporter })
    }
}

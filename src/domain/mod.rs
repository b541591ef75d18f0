pub mod errors;
pub mod ports;
pub mod traffic;

pub use errors::{ConfigError, RobotError};
pub use ports::RobotApi;

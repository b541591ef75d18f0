pub mod core;
pub mod exposition;
pub mod mock;
pub mod observability;
pub mod robot;

pub use mock::{MockFailure, MockRobotApi};
pub use robot::RobotClient;

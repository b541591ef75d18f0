pub mod reconciler;
pub mod scheduler;
pub mod snapshot_builder;

pub use reconciler::{MetricReconciler, ReconcileSummary};
pub use scheduler::{CycleOutcome, Scheduler, SchedulerHandle};
pub use snapshot_builder::SnapshotBuilder;

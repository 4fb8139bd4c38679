//! Utility functions and helpers

mod cancellation;
mod metrics;
mod timestamp;

pub use cancellation::CancellationToken;
pub use metrics::{Metrics, MetricsSummary};
pub use timestamp::get_timestamp_us;

pub mod aggregator;
pub mod category;
pub mod classifier;
pub mod stats_rollup;

pub use aggregator::Aggregator;
pub use category::{display_type_label, PollutantCategory};
pub use classifier::{flag_status, rate_status, ComplianceClassifier};
pub use stats_rollup::StatsRollup;

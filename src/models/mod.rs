pub mod compliance;
pub mod filter;
pub mod record;
pub mod series;

pub use compliance::{
    ComplianceStatus, DashboardStats, PollutantComplianceSummary, SiteAggregate, StatusFilter,
};
pub use filter::{EndBound, FilterCriteria, TimeWindow};
pub use record::{parse_sample_time, PollutantRecord};
pub use series::{
    axis_margin, BucketKey, Bucketing, SampleStats, SplitBucket, ThresholdSplit, TimeBucket,
    TimeSeries,
};

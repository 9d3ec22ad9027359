use crate::models::ComplianceStatus;
use crate::utils::constants::AXIS_MARGIN_FRACTION;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::fmt;

/// Which key records are grouped under for time-bucketed averages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucketing {
    /// The raw timestamp text, for categorical period comparison
    Raw,
    /// The parsed instant, for continuous time series
    Instant,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(untagged)]
pub enum BucketKey {
    Raw(String),
    Instant(NaiveDateTime),
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BucketKey::Raw(raw) => write!(f, "{}", raw),
            BucketKey::Instant(instant) => write!(f, "{}", instant.format("%Y-%m-%dT%H:%M:%S")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeBucket {
    pub key: BucketKey,
    pub mean: f64,
    pub count: usize,
}

/// Ascending sequence of bucket means with the extremes used for axis scaling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeSeries {
    pub buckets: Vec<TimeBucket>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Sample-weighted mean over every contributing record
    pub period_mean: f64,
    /// Three-tier status of the period mean, used to colour the series
    pub period_status: ComplianceStatus,
}

impl TimeSeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    pub fn sample_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Value-axis range padded by a tenth of the spread; the lower bound never drops below zero
    pub fn axis_range(&self) -> Option<(f64, f64)> {
        let (min, max) = (self.min?, self.max?);
        let margin = axis_margin(min, max);
        Some(((min - margin).max(0.0), max + margin))
    }
}

/// Margin rule shared by every chart: 10% of the spread, or 10% of the value for a flat series
pub fn axis_margin(min: f64, max: f64) -> f64 {
    let margin = (max - min) * AXIS_MARGIN_FRACTION;
    if margin == 0.0 {
        max * AXIS_MARGIN_FRACTION
    } else {
        margin
    }
}

/// Per-timestamp sums split at the comparison threshold
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitBucket {
    pub time: String,
    pub below_sum: f64,
    pub at_or_above_sum: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThresholdSplit {
    pub threshold: f64,
    pub buckets: Vec<SplitBucket>,
    pub max_value: f64,
}

impl ThresholdSplit {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

/// Min / max / mean of raw results under a filter
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct SampleStats {
    pub sample_count: usize,
    pub min_value: f64,
    pub max_value: f64,
    pub average: f64,
}

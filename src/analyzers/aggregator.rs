use crate::analyzers::classifier::{flag_status, ComplianceClassifier};
use crate::models::{
    BucketKey, Bucketing, FilterCriteria, PollutantComplianceSummary, PollutantRecord, SampleStats,
    SiteAggregate, SplitBucket, ThresholdSplit, TimeBucket, TimeSeries,
};
use crate::store::Snapshot;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct SiteAccumulator {
    values: Accumulator,
    compliant: bool,
}

impl Default for SiteAccumulator {
    fn default() -> Self {
        Self {
            values: Accumulator::default(),
            compliant: true,
        }
    }
}

/// Averages over the records of a snapshot selected by a filter
#[derive(Debug, Clone, Copy, Default)]
pub struct Aggregator {
    classifier: ComplianceClassifier,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Aggregator whose time series are coloured with the given value thresholds
    pub fn with_classifier(classifier: ComplianceClassifier) -> Self {
        Self { classifier }
    }

    /// Records matching the filter, in file order
    pub fn matching<'a>(
        &self,
        snapshot: &'a Snapshot,
        filter: &'a FilterCriteria,
    ) -> impl Iterator<Item = &'a PollutantRecord> + 'a {
        snapshot
            .records_for(&filter.pollutant)
            .into_iter()
            .filter(move |record| filter.matches(record))
    }

    /// Mean and count per time bucket, ascending by key
    pub fn time_series(
        &self,
        snapshot: &Snapshot,
        filter: &FilterCriteria,
        bucketing: Bucketing,
    ) -> TimeSeries {
        let mut buckets: BTreeMap<BucketKey, Accumulator> = BTreeMap::new();
        let mut period = Accumulator::default();

        for record in self.matching(snapshot, filter) {
            let key = match bucketing {
                Bucketing::Raw => BucketKey::Raw(record.time.clone()),
                Bucketing::Instant => match record.sampled_at() {
                    Some(instant) => BucketKey::Instant(instant),
                    None => continue,
                },
            };

            buckets.entry(key).or_default().add(record.result);
            period.add(record.result);
        }

        let buckets: Vec<TimeBucket> = buckets
            .into_iter()
            .map(|(key, acc)| TimeBucket {
                key,
                mean: acc.mean(),
                count: acc.count,
            })
            .collect();

        let min = buckets.iter().map(|b| b.mean).reduce(f64::min);
        let max = buckets.iter().map(|b| b.mean).reduce(f64::max);

        let period_mean = period.mean();

        TimeSeries {
            buckets,
            min,
            max,
            period_mean,
            period_status: self.classifier.classify(period_mean),
        }
    }

    /// Mean and AND-combined compliance flag per location, ordered by location
    pub fn site_aggregates(
        &self,
        snapshot: &Snapshot,
        filter: &FilterCriteria,
    ) -> Vec<SiteAggregate> {
        let mut sites: BTreeMap<&str, SiteAccumulator> = BTreeMap::new();

        for record in self.matching(snapshot, filter) {
            let site = sites.entry(record.location.as_str()).or_default();
            site.values.add(record.result);
            // One non-compliant sample condemns the whole site
            site.compliant &= record.is_compliance_sample;
        }

        sites
            .into_iter()
            .map(|(location, site)| SiteAggregate {
                location: location.to_string(),
                mean: site.values.mean(),
                sample_count: site.values.count,
                compliant: site.compliant,
            })
            .collect()
    }

    /// Flag-based compliance rollup of one pollutant across the sites selected by the filter
    pub fn compliance_summary(
        &self,
        snapshot: &Snapshot,
        pollutant: &str,
        filter: &FilterCriteria,
    ) -> PollutantComplianceSummary {
        let unit = snapshot.unit_for(pollutant).unwrap_or_default().to_string();
        let sites = self.site_aggregates(snapshot, &filter.for_pollutant(pollutant));

        if sites.is_empty() {
            return PollutantComplianceSummary::empty(pollutant, unit);
        }

        let non_compliant_locations: Vec<String> = sites
            .iter()
            .filter(|site| !site.compliant)
            .map(|site| site.location.clone())
            .collect();

        // Each site counts once regardless of how many samples it contributed
        let average_value = sites.iter().map(|site| site.mean).sum::<f64>() / sites.len() as f64;

        PollutantComplianceSummary {
            pollutant: pollutant.to_string(),
            total_sites: sites.len(),
            non_compliant_sites: non_compliant_locations.len(),
            status: flag_status(non_compliant_locations.len()),
            non_compliant_locations,
            average_value,
            unit,
            sites,
        }
    }

    pub fn sample_stats(&self, snapshot: &Snapshot, filter: &FilterCriteria) -> SampleStats {
        let mut stats = SampleStats::default();
        let mut values = Accumulator::default();

        for record in self.matching(snapshot, filter) {
            if values.count == 0 {
                stats.min_value = record.result;
                stats.max_value = record.result;
            } else {
                stats.min_value = stats.min_value.min(record.result);
                stats.max_value = stats.max_value.max(record.result);
            }
            values.add(record.result);
        }

        stats.sample_count = values.count;
        stats.average = values.mean();
        stats
    }

    /// Per raw timestamp, sums of results below and at-or-above `threshold`
    pub fn threshold_split(
        &self,
        snapshot: &Snapshot,
        filter: &FilterCriteria,
        threshold: f64,
    ) -> ThresholdSplit {
        let mut buckets: BTreeMap<&str, (f64, f64)> = BTreeMap::new();
        let mut max_value = 0.0_f64;

        for record in self.matching(snapshot, filter) {
            let sums = buckets.entry(record.time.as_str()).or_default();
            if record.result >= threshold {
                sums.1 += record.result;
            } else {
                sums.0 += record.result;
            }
            max_value = max_value.max(record.result);
        }

        ThresholdSplit {
            threshold,
            buckets: buckets
                .into_iter()
                .map(|(time, (below_sum, at_or_above_sum))| SplitBucket {
                    time: time.to_string(),
                    below_sum,
                    at_or_above_sum,
                })
                .collect(),
            max_value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ValueThresholds;
    use crate::models::{ComplianceStatus, EndBound, TimeWindow};
    use chrono::NaiveDate;

    fn record(
        time: &str,
        pollutant: &str,
        location: &str,
        result: f64,
        compliant: bool,
    ) -> PollutantRecord {
        PollutantRecord::new(
            time.to_string(),
            pollutant.to_string(),
            location.to_string(),
            result,
            "mg/l".to_string(),
            "RIVER / RUNNING SURFACE WATER".to_string(),
            String::new(),
            compliant,
        )
    }

    fn lead_filter() -> FilterCriteria {
        FilterCriteria::new().with_pollutant("Lead")
    }

    #[test]
    fn test_time_series_instant_buckets() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-02T09:00:00", "Lead", "A", 4.0, true),
                record("2024-01-01T09:00:00", "Lead", "A", 1.0, true),
                record("2024-01-01T09:00:00", "Lead", "B", 3.0, true),
                record("bad time", "Lead", "A", 100.0, true),
                record("2024-01-01T09:00:00", "Zinc", "A", 50.0, true),
            ],
            1,
        );

        let series = Aggregator::new().time_series(&snapshot, &lead_filter(), Bucketing::Instant);

        assert_eq!(series.buckets.len(), 2);
        assert_eq!(series.buckets[0].mean, 2.0);
        assert_eq!(series.buckets[0].count, 2);
        assert_eq!(series.buckets[1].mean, 4.0);
        assert_eq!(series.min, Some(2.0));
        assert_eq!(series.max, Some(4.0));
        assert!((series.period_mean - 8.0 / 3.0).abs() < 1e-9);
        assert_eq!(series.period_status, ComplianceStatus::Warning);
    }

    #[test]
    fn test_time_series_period_status_uses_thresholds() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01T09:00:00", "Lead", "A", 12.0, true),
                record("2024-01-02T09:00:00", "Lead", "A", 14.0, true),
            ],
            1,
        );

        let series = Aggregator::new().time_series(&snapshot, &lead_filter(), Bucketing::Instant);
        assert_eq!(series.period_status, ComplianceStatus::NonCompliant);

        let lenient = ComplianceClassifier::new(&ValueThresholds {
            warning_above: 10.0,
            non_compliant_above: 50.0,
        });
        let series = Aggregator::with_classifier(lenient).time_series(
            &snapshot,
            &lead_filter(),
            Bucketing::Instant,
        );
        assert_eq!(series.period_mean, 13.0);
        assert_eq!(series.period_status, ComplianceStatus::Warning);

        let empty = Aggregator::new().time_series(
            &snapshot,
            &FilterCriteria::new().with_pollutant("Zinc"),
            Bucketing::Instant,
        );
        assert_eq!(empty.period_status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_time_series_raw_keeps_unparsed_keys_without_window() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01", "Lead", "A", 1.0, true),
                record("bad time", "Lead", "A", 3.0, true),
            ],
            1,
        );

        let series = Aggregator::new().time_series(&snapshot, &lead_filter(), Bucketing::Raw);
        assert_eq!(series.buckets.len(), 2);
        assert_eq!(series.buckets[0].key, BucketKey::Raw("2024-01-01".to_string()));
        assert_eq!(series.buckets[1].key, BucketKey::Raw("bad time".to_string()));
    }

    #[test]
    fn test_time_series_window_drops_unparsed() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01", "Lead", "A", 1.0, true),
                record("bad time", "Lead", "A", 3.0, true),
            ],
            1,
        );
        let window = TimeWindow::from_dates(
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            EndBound::Exclusive,
        );

        let series = Aggregator::new().time_series(
            &snapshot,
            &lead_filter().with_window(window),
            Bucketing::Raw,
        );
        assert_eq!(series.buckets.len(), 1);
    }

    #[test]
    fn test_site_compliance_is_conjunctive() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01", "Lead", "A", 1.0, true),
                record("2024-01-02", "Lead", "A", 1.0, false),
                record("2024-01-03", "Lead", "A", 1.0, true),
                record("2024-01-01", "Lead", "B", 1.0, true),
            ],
            1,
        );

        let sites = Aggregator::new().site_aggregates(&snapshot, &lead_filter());
        assert_eq!(sites.len(), 2);
        assert_eq!(sites[0].location, "A");
        assert!(!sites[0].compliant);
        assert_eq!(sites[0].sample_count, 3);
        assert!(sites[1].compliant);
    }

    #[test]
    fn test_pollutant_average_weights_sites_equally() {
        let mut records: Vec<PollutantRecord> = (0..10)
            .map(|i| record(&format!("2024-01-{:02}", i + 1), "Lead", "A", 1.0, true))
            .collect();
        records.push(record("2024-01-01", "Lead", "B", 9.0, true));
        let snapshot = Snapshot::new(records, 1);

        let summary =
            Aggregator::new().compliance_summary(&snapshot, "Lead", &FilterCriteria::new());
        assert_eq!(summary.total_sites, 2);
        assert!((summary.average_value - 5.0).abs() < 1e-9);
        assert_eq!(summary.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_compliance_summary_for_unknown_pollutant() {
        let snapshot = Snapshot::new(vec![record("2024-01-01", "Lead", "A", 1.0, true)], 1);

        let summary =
            Aggregator::new().compliance_summary(&snapshot, "Mercury", &FilterCriteria::new());
        assert!(!summary.has_sites());
        assert_eq!(summary.average_value, 0.0);
        assert_eq!(summary.unit, "");
        assert_eq!(summary.status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_compliance_summary_respects_location() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01", "Lead", "A", 2.0, false),
                record("2024-01-01", "Lead", "B", 4.0, true),
            ],
            1,
        );

        let summary = Aggregator::new().compliance_summary(
            &snapshot,
            "Lead",
            &FilterCriteria::new().with_location("B"),
        );
        assert_eq!(summary.total_sites, 1);
        assert_eq!(summary.non_compliant_sites, 0);
        assert_eq!(summary.average_value, 4.0);
        assert_eq!(summary.unit, "mg/l");
    }

    #[test]
    fn test_sample_stats() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-01", "Lead", "A", 2.0, true),
                record("2024-01-02", "Lead", "A", 6.0, true),
                record("2024-01-03", "Lead", "B", 1.0, true),
            ],
            1,
        );

        let stats = Aggregator::new().sample_stats(&snapshot, &lead_filter().with_location("A"));
        assert_eq!(stats.sample_count, 2);
        assert_eq!(stats.min_value, 2.0);
        assert_eq!(stats.max_value, 6.0);
        assert_eq!(stats.average, 4.0);

        let none = Aggregator::new().sample_stats(&snapshot, &lead_filter().with_location("Z"));
        assert_eq!(none, SampleStats::default());
    }

    #[test]
    fn test_threshold_split() {
        let snapshot = Snapshot::new(
            vec![
                record("2024-01-02", "Lead", "A", 2.0, true),
                record("2024-01-01", "Lead", "A", 0.5, true),
                record("2024-01-01", "Lead", "A", 0.7, true),
                record("2024-01-01", "Lead", "A", 3.0, true),
            ],
            1,
        );

        let split = Aggregator::new().threshold_split(&snapshot, &lead_filter(), 2.0);
        assert_eq!(split.buckets.len(), 2);
        assert_eq!(split.buckets[0].time, "2024-01-01");
        assert!((split.buckets[0].below_sum - 1.2).abs() < 1e-9);
        assert_eq!(split.buckets[0].at_or_above_sum, 3.0);
        assert_eq!(split.buckets[1].below_sum, 0.0);
        assert_eq!(split.buckets[1].at_or_above_sum, 2.0);
        assert_eq!(split.max_value, 3.0);
    }
}

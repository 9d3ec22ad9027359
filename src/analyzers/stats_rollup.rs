use crate::analyzers::aggregator::Aggregator;
use crate::analyzers::classifier::{rate_status, ComplianceClassifier};
use crate::config::{EngineConfig, RollupThresholds};
use crate::models::{
    ComplianceStatus, DashboardStats, FilterCriteria, PollutantComplianceSummary, StatusFilter,
};
use crate::store::Snapshot;
use tracing::debug;

/// Dashboard-wide rollups across every pollutant in a snapshot
#[derive(Debug, Clone)]
pub struct StatsRollup {
    aggregator: Aggregator,
    classifier: ComplianceClassifier,
    thresholds: RollupThresholds,
}

impl StatsRollup {
    pub fn new(classifier: ComplianceClassifier, thresholds: RollupThresholds) -> Self {
        Self {
            aggregator: Aggregator::with_classifier(classifier),
            classifier,
            thresholds,
        }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(
            ComplianceClassifier::new(&config.values),
            config.rollup.clone(),
        )
    }

    /// One summary per pollutant with at least one site under the filter, ordered by name.
    /// The filter's own pollutant field is ignored.
    pub fn compliance_table(
        &self,
        snapshot: &Snapshot,
        filter: &FilterCriteria,
        status_filter: StatusFilter,
    ) -> Vec<PollutantComplianceSummary> {
        snapshot
            .unique_pollutants()
            .iter()
            .map(|pollutant| self.aggregator.compliance_summary(snapshot, pollutant, filter))
            .filter(|summary| summary.has_sites() && status_filter.accepts(summary.status))
            .collect()
    }

    pub fn dashboard_stats(&self, snapshot: &Snapshot, filter: &FilterCriteria) -> DashboardStats {
        let mut stats = DashboardStats {
            total_pollutants: 0,
            compliant_count: 0,
            warning_count: 0,
            non_compliant_count: 0,
            non_compliant_rate: 0.0,
            site_compliance_rate: 0.0,
            overall_status: ComplianceStatus::Compliant,
        };
        let mut total_sites = 0usize;
        let mut compliant_sites = 0usize;

        for summary in self.compliance_table(snapshot, filter, StatusFilter::All) {
            stats.total_pollutants += 1;
            total_sites += summary.total_sites;
            compliant_sites += summary.compliant_sites();

            // Tier counts come from the numeric average, not from the site flags
            match self.classifier.classify(summary.average_value) {
                ComplianceStatus::NonCompliant => stats.non_compliant_count += 1,
                ComplianceStatus::Warning => stats.warning_count += 1,
                ComplianceStatus::Compliant => stats.compliant_count += 1,
            }
        }

        if stats.total_pollutants > 0 {
            stats.non_compliant_rate =
                stats.non_compliant_count as f64 / stats.total_pollutants as f64;
        }
        if total_sites > 0 {
            stats.site_compliance_rate = compliant_sites as f64 / total_sites as f64;
        }
        stats.overall_status = rate_status(stats.non_compliant_rate, &self.thresholds);

        debug!(
            pollutants = stats.total_pollutants,
            non_compliant = stats.non_compliant_count,
            status = %stats.overall_status,
            "Computed dashboard stats"
        );

        stats
    }
}

impl Default for StatsRollup {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PollutantRecord;
    use pretty_assertions::assert_eq;

    fn record(pollutant: &str, location: &str, result: f64, compliant: bool) -> PollutantRecord {
        PollutantRecord::new(
            "2024-03-01T12:00:00".to_string(),
            pollutant.to_string(),
            location.to_string(),
            result,
            "ug/l".to_string(),
            "SEA WATER".to_string(),
            String::new(),
            compliant,
        )
    }

    /// `non_compliant` pollutants averaging 20.0, one warning at 5.0, the rest at 0.5
    fn snapshot_with(total: usize, non_compliant: usize) -> Snapshot {
        let records = (0..total)
            .map(|i| {
                let value = if i < non_compliant {
                    20.0
                } else if i == non_compliant {
                    5.0
                } else {
                    0.5
                };
                record(&format!("P{:02}", i), "SITE", value, true)
            })
            .collect();
        Snapshot::new(records, 1)
    }

    #[test]
    fn test_empty_snapshot_is_compliant() {
        let stats =
            StatsRollup::default().dashboard_stats(&Snapshot::default(), &FilterCriteria::new());
        assert_eq!(stats.total_pollutants, 0);
        assert_eq!(stats.non_compliant_rate, 0.0);
        assert_eq!(stats.overall_status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_tier_counts_sum_to_retained_pollutants() {
        let mut records = vec![
            record("Lead", "A", 15.0, true),
            record("Zinc", "A", 5.0, true),
            record("Iron", "A", 0.2, false),
        ];
        records.push(record("Copper", "B", 3.0, true));
        let snapshot = Snapshot::new(records, 1);

        let stats = StatsRollup::default().dashboard_stats(
            &snapshot,
            &FilterCriteria::new().with_location("A"),
        );

        assert_eq!(stats.total_pollutants, 3);
        assert_eq!(
            stats.compliant_count + stats.warning_count + stats.non_compliant_count,
            stats.total_pollutants
        );
        assert_eq!(stats.non_compliant_count, 1);
        assert_eq!(stats.warning_count, 1);
        assert_eq!(stats.compliant_count, 1);
        assert!((stats.site_compliance_rate - 2.0 / 3.0).abs() < 1e-9);
        // 1 of 3 pollutants non-compliant
        assert_eq!(stats.overall_status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_overall_status_bands() {
        let rollup = StatsRollup::default();
        let filter = FilterCriteria::new();

        // 1/10 = 0.10
        let stats = rollup.dashboard_stats(&snapshot_with(10, 1), &filter);
        assert_eq!(stats.overall_status, ComplianceStatus::Compliant);

        // 2/10 = 0.20
        let stats = rollup.dashboard_stats(&snapshot_with(10, 2), &filter);
        assert_eq!(stats.overall_status, ComplianceStatus::Warning);

        // 3/10 = 0.30, upper edge of the warning band
        let stats = rollup.dashboard_stats(&snapshot_with(10, 3), &filter);
        assert_eq!(stats.overall_status, ComplianceStatus::Warning);

        // 4/10 = 0.40
        let stats = rollup.dashboard_stats(&snapshot_with(10, 4), &filter);
        assert_eq!(stats.overall_status, ComplianceStatus::NonCompliant);
    }

    #[test]
    fn test_compliance_table_status_filter() {
        let snapshot = Snapshot::new(
            vec![
                record("Lead", "A", 0.5, true),
                record("Lead", "B", 15.0, false),
                record("Zinc", "A", 12.0, true),
            ],
            1,
        );
        let rollup = StatsRollup::default();

        let all = rollup.compliance_table(&snapshot, &FilterCriteria::new(), StatusFilter::All);
        let names: Vec<&str> = all.iter().map(|s| s.pollutant.as_str()).collect();
        assert_eq!(names, vec!["Lead", "Zinc"]);

        let failing = rollup.compliance_table(
            &snapshot,
            &FilterCriteria::new(),
            StatusFilter::Only(ComplianceStatus::NonCompliant),
        );
        assert_eq!(failing.len(), 1);
        assert_eq!(failing[0].non_compliant_locations, vec!["B".to_string()]);

        // The flag-based path never yields a warning
        let warnings = rollup.compliance_table(
            &snapshot,
            &FilterCriteria::new(),
            StatusFilter::Only(ComplianceStatus::Warning),
        );
        assert!(warnings.is_empty());
    }
}

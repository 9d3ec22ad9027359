use crate::analyzers::{Aggregator, ComplianceClassifier, PollutantCategory, StatsRollup};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::models::{
    Bucketing, ComplianceStatus, DashboardStats, FilterCriteria, PollutantComplianceSummary,
    PollutantRecord, SampleStats, StatusFilter, ThresholdSplit, TimeSeries,
};
use crate::readers::{CancelFlag, IngestOutput, RecordReader};
use crate::store::{RecordStore, Snapshot};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Outcome of a successful reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    pub rows_read: usize,
    pub records_loaded: usize,
    pub rows_dropped: usize,
    pub generation: u64,
}

/// Query surface consumed by the dashboard views.
///
/// Every query reads one snapshot, so a reload running alongside never produces a result
/// mixing two datasets.
pub struct DashboardEngine {
    config: EngineConfig,
    store: RecordStore,
    reader: RecordReader,
    aggregator: Aggregator,
    classifier: ComplianceClassifier,
    rollup: StatsRollup,
}

impl DashboardEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.check()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let classifier = ComplianceClassifier::new(&config.values);

        Self {
            reader: RecordReader::with_config(&config),
            aggregator: Aggregator::with_classifier(classifier),
            classifier,
            rollup: StatsRollup::from_config(&config),
            store: RecordStore::new(),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.snapshot()
    }

    pub fn has_data(&self) -> bool {
        !self.store.is_empty()
    }

    /// Replace the dataset with the contents of a CSV file.
    /// On any error the previous dataset stays in place.
    pub fn load(&self, path: &Path) -> Result<LoadReport> {
        self.load_with_cancel(path, &CancelFlag::new())
    }

    pub fn load_with_cancel(&self, path: &Path, cancel: &CancelFlag) -> Result<LoadReport> {
        let started = Instant::now();
        let output = self
            .reader
            .read_records_with_cancel(path, cancel)
            .inspect_err(|e| {
                warn!(path = %path.display(), error = %e, "Load failed, keeping current dataset")
            })?;

        let report = self.commit(output);
        info!(
            path = %path.display(),
            records = report.records_loaded,
            dropped = report.rows_dropped,
            generation = report.generation,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Dataset loaded"
        );
        Ok(report)
    }

    /// Replace the dataset from in-memory CSV content
    pub fn load_bytes(&self, bytes: &[u8], cancel: &CancelFlag) -> Result<LoadReport> {
        let output = self
            .reader
            .read_from_bytes(bytes, cancel)
            .inspect_err(|e| warn!(error = %e, "Load failed, keeping current dataset"))?;
        Ok(self.commit(output))
    }

    /// Replace the dataset from a UTF-8 CSV stream
    pub fn load_reader<R: Read>(&self, input: R, cancel: &CancelFlag) -> Result<LoadReport> {
        let output = self
            .reader
            .read_from_reader(input, cancel)
            .inspect_err(|e| warn!(error = %e, "Load failed, keeping current dataset"))?;
        Ok(self.commit(output))
    }

    /// Replace the dataset with already-built records
    pub fn load_records(&self, records: Vec<PollutantRecord>) -> LoadReport {
        let rows_read = records.len();
        self.commit(IngestOutput {
            records,
            rows_read,
            rows_dropped: 0,
        })
    }

    fn commit(&self, output: IngestOutput) -> LoadReport {
        let records_loaded = output.records.len();
        let generation = self.store.replace(output.records);

        LoadReport {
            rows_read: output.rows_read,
            records_loaded,
            rows_dropped: output.rows_dropped,
            generation,
        }
    }

    pub fn unique_pollutants(&self) -> BTreeSet<String> {
        self.store.unique_pollutants()
    }

    pub fn unique_types(&self) -> BTreeSet<String> {
        self.store.unique_types()
    }

    pub fn unique_locations(&self, material_type: &str) -> BTreeSet<String> {
        self.snapshot().unique_locations(material_type)
    }

    pub fn records_for(&self, pollutant: &str) -> Vec<PollutantRecord> {
        self.store.records_for(pollutant)
    }

    pub fn definition_for(&self, pollutant: &str) -> Option<String> {
        self.store.definition_for(pollutant)
    }

    pub fn pollutants_in(&self, category: PollutantCategory) -> BTreeSet<String> {
        category.pollutants_in(&self.snapshot())
    }

    pub fn time_series(&self, filter: &FilterCriteria, bucketing: Bucketing) -> TimeSeries {
        self.aggregator.time_series(&self.snapshot(), filter, bucketing)
    }

    pub fn site_compliance(
        &self,
        pollutant: &str,
        filter: &FilterCriteria,
    ) -> PollutantComplianceSummary {
        self.aggregator.compliance_summary(&self.snapshot(), pollutant, filter)
    }

    pub fn compliance_table(
        &self,
        filter: &FilterCriteria,
        status_filter: StatusFilter,
    ) -> Vec<PollutantComplianceSummary> {
        self.rollup.compliance_table(&self.snapshot(), filter, status_filter)
    }

    pub fn dashboard_stats(&self, filter: &FilterCriteria) -> DashboardStats {
        self.rollup.dashboard_stats(&self.snapshot(), filter)
    }

    pub fn sample_stats(&self, filter: &FilterCriteria) -> SampleStats {
        self.aggregator.sample_stats(&self.snapshot(), filter)
    }

    /// Per-timestamp sums split at the configured comparison threshold
    pub fn threshold_split(&self, filter: &FilterCriteria) -> ThresholdSplit {
        self.aggregator.threshold_split(&self.snapshot(), filter, self.config.comparison_threshold)
    }

    pub fn classify(&self, value: f64) -> ComplianceStatus {
        self.classifier.classify(value)
    }
}

impl Default for DashboardEngine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}

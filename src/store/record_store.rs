use crate::models::PollutantRecord;
use crate::store::Snapshot;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

/// Owner of the current dataset.
///
/// Readers take an `Arc<Snapshot>` and keep a consistent view for as long as they hold it;
/// `replace` builds the next snapshot off to the side and swaps the pointer in one step.
#[derive(Debug, Default)]
pub struct RecordStore {
    current: RwLock<Arc<Snapshot>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<PollutantRecord>) -> Self {
        let store = Self::new();
        store.replace(records);
        store
    }

    /// Current dataset; unaffected by later reloads
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Swap in a new dataset, returning its generation number
    pub fn replace(&self, records: Vec<PollutantRecord>) -> u64 {
        let next_generation = self.current.read().generation() + 1;
        let next = Arc::new(Snapshot::new(records, next_generation));

        debug!(
            generation = next_generation,
            records = next.len(),
            "Swapping record snapshot"
        );

        *self.current.write() = next;
        next_generation
    }

    pub fn generation(&self) -> u64 {
        self.current.read().generation()
    }

    pub fn is_empty(&self) -> bool {
        self.current.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.current.read().len()
    }

    pub fn unique_pollutants(&self) -> BTreeSet<String> {
        self.snapshot().unique_pollutants()
    }

    pub fn unique_types(&self) -> BTreeSet<String> {
        self.snapshot().unique_types()
    }

    pub fn records_for(&self, pollutant: &str) -> Vec<PollutantRecord> {
        self.snapshot()
            .records_for(pollutant)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn definition_for(&self, pollutant: &str) -> Option<String> {
        self.snapshot().definition_for(pollutant).map(str::to_string)
    }
}

use crate::models::PollutantRecord;
use crate::utils::constants::ALL_TYPES;
use std::collections::{BTreeSet, HashMap};

/// Immutable view of one loaded dataset plus the lookups derived from it.
///
/// Every secondary structure is built in [`Snapshot::new`], so a snapshot is complete
/// before anyone can observe it.
#[derive(Debug, Default)]
pub struct Snapshot {
    generation: u64,
    records: Vec<PollutantRecord>,
    by_pollutant: HashMap<String, Vec<usize>>,
    definitions: HashMap<String, String>,
    units: HashMap<String, String>,
}

impl Snapshot {
    pub fn new(records: Vec<PollutantRecord>, generation: u64) -> Self {
        let mut by_pollutant: HashMap<String, Vec<usize>> = HashMap::new();
        let mut definitions = HashMap::new();
        let mut units = HashMap::new();

        for (position, record) in records.iter().enumerate() {
            by_pollutant
                .entry(record.pollutant.clone())
                .or_default()
                .push(position);

            // First record in file order wins
            definitions
                .entry(record.pollutant.clone())
                .or_insert_with(|| record.definition.clone());
            units
                .entry(record.pollutant.clone())
                .or_insert_with(|| record.unit.clone());
        }

        Self {
            generation,
            records,
            by_pollutant,
            definitions,
            units,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[PollutantRecord] {
        &self.records
    }

    /// Records with an exactly matching pollutant, in file order.
    /// An empty argument returns every record.
    pub fn records_for(&self, pollutant: &str) -> Vec<&PollutantRecord> {
        if pollutant.is_empty() {
            return self.records.iter().collect();
        }

        self.by_pollutant
            .get(pollutant)
            .map(|positions| positions.iter().map(|&i| &self.records[i]).collect())
            .unwrap_or_default()
    }

    pub fn definition_for(&self, pollutant: &str) -> Option<&str> {
        self.definitions.get(pollutant).map(String::as_str)
    }

    pub fn unit_for(&self, pollutant: &str) -> Option<&str> {
        self.units.get(pollutant).map(String::as_str)
    }

    pub fn unique_pollutants(&self) -> BTreeSet<String> {
        self.distinct(|r| &r.pollutant)
    }

    pub fn unique_types(&self) -> BTreeSet<String> {
        self.distinct(|r| &r.material_type)
    }

    /// Distinct locations, optionally restricted to one material type (case-insensitive)
    pub fn unique_locations(&self, material_type: &str) -> BTreeSet<String> {
        let any_type = material_type.is_empty() || material_type == ALL_TYPES;
        self.records
            .iter()
            .filter(|r| any_type || r.matches_material_type(material_type))
            .map(|r| &r.location)
            .filter(|location| !location.is_empty())
            .cloned()
            .collect()
    }

    fn distinct<F>(&self, field: F) -> BTreeSet<String>
    where
        F: Fn(&PollutantRecord) -> &String,
    {
        self.records
            .iter()
            .map(field)
            .filter(|value| !value.is_empty())
            .cloned()
            .collect()
    }
}

use crate::config::{ColumnNames, EngineConfig};
use crate::error::{ProcessingError, Result};
use crate::models::PollutantRecord;
use crate::readers::{coerce_compliance_flag, coerce_result, decode_input, CancelFlag};
use crate::utils::constants::DEFAULT_CANCEL_CHECK_INTERVAL;
use csv::{ReaderBuilder, StringRecord};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Records produced by one ingestion pass, in input order
#[derive(Debug, Clone, Default)]
pub struct IngestOutput {
    pub records: Vec<PollutantRecord>,
    pub rows_read: usize,
    pub rows_dropped: usize,
}

/// Header positions resolved once per input
struct ColumnIndex {
    sample_time: usize,
    pollutant: usize,
    location: usize,
    definition: usize,
    unit: usize,
    material_type: usize,
    result: usize,
    compliance: Option<usize>,
}

pub struct RecordReader {
    columns: ColumnNames,
    cancel_check_interval: usize,
}

impl RecordReader {
    pub fn new() -> Self {
        Self {
            columns: ColumnNames::default(),
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }

    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            columns: config.columns.clone(),
            cancel_check_interval: config.cancel_check_interval.max(1),
        }
    }

    /// Read all records from a CSV file
    pub fn read_records(&self, path: &Path) -> Result<IngestOutput> {
        self.read_records_with_cancel(path, &CancelFlag::new())
    }

    pub fn read_records_with_cancel(
        &self,
        path: &Path,
        cancel: &CancelFlag,
    ) -> Result<IngestOutput> {
        let bytes = std::fs::read(path)?;
        let output = self.read_from_bytes(&bytes, cancel)?;

        info!(
            path = %path.display(),
            records = output.records.len(),
            dropped = output.rows_dropped,
            "Read sample records"
        );

        Ok(output)
    }

    /// Parse CSV content. Malformed rows are dropped; only header problems and
    /// cancellation fail the whole input.
    pub fn read_from_bytes(&self, bytes: &[u8], cancel: &CancelFlag) -> Result<IngestOutput> {
        let text = decode_input(bytes);
        self.read_from_reader(text.as_bytes(), cancel)
    }

    /// Parse UTF-8 CSV content as it arrives from `input`, polling `cancel` between rows
    pub fn read_from_reader<R: Read>(&self, input: R, cancel: &CancelFlag) -> Result<IngestOutput> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(input);

        let headers = reader.headers()?.clone();
        let index = self.resolve_columns(&headers)?;

        let mut output = IngestOutput::default();
        for (row_index, row_result) in reader.records().enumerate() {
            if row_index % self.cancel_check_interval == 0 && cancel.is_cancelled() {
                return Err(ProcessingError::Cancelled);
            }

            output.rows_read += 1;
            let row_number = row_index + 1;

            let parsed = row_result
                .map_err(ProcessingError::from)
                .and_then(|row| self.parse_row(&row, &index, row_number));

            match parsed {
                Ok(record) => output.records.push(record),
                Err(e) => {
                    debug!(row = row_number, error = %e, "Dropping malformed row");
                    output.rows_dropped += 1;
                }
            }
        }

        if cancel.is_cancelled() {
            return Err(ProcessingError::Cancelled);
        }

        Ok(output)
    }

    fn resolve_columns(&self, headers: &StringRecord) -> Result<ColumnIndex> {
        let find = |name: &str| headers.iter().position(|h| h.trim() == name);
        let require = |name: &str| {
            find(name).ok_or_else(|| ProcessingError::MissingColumn(name.to_string()))
        };

        Ok(ColumnIndex {
            sample_time: require(self.columns.sample_time.as_str())?,
            pollutant: require(self.columns.pollutant.as_str())?,
            location: require(self.columns.location.as_str())?,
            definition: require(self.columns.definition.as_str())?,
            unit: require(self.columns.unit.as_str())?,
            material_type: require(self.columns.material_type.as_str())?,
            result: require(self.columns.result.as_str())?,
            compliance: find(self.columns.compliance.as_str()),
        })
    }

    /// Build a record from one row; any missing text field rejects the whole row
    fn parse_row(
        &self,
        row: &StringRecord,
        index: &ColumnIndex,
        row_number: usize,
    ) -> Result<PollutantRecord> {
        let text = |position: usize, field: &'static str| {
            row.get(position)
                .map(str::to_string)
                .ok_or(ProcessingError::MissingField {
                    row: row_number,
                    field,
                })
        };

        let time = text(index.sample_time, "sample time")?;
        let pollutant = text(index.pollutant, "pollutant")?;
        let location = text(index.location, "location")?;
        let definition = text(index.definition, "definition")?;
        let unit = text(index.unit, "unit")?;
        let material_type = text(index.material_type, "material type")?;

        let result = coerce_result(row.get(index.result));
        let is_compliance_sample =
            coerce_compliance_flag(index.compliance.and_then(|position| row.get(position)));

        Ok(PollutantRecord::new(
            time,
            pollutant,
            location,
            result,
            unit,
            material_type,
            definition,
            is_compliance_sample,
        ))
    }
}

impl Default for RecordReader {
    fn default() -> Self {
        Self::new()
    }
}

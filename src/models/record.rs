use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Naive datetime layouts accepted for sample timestamps, tried in order
const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// One observed environmental sample.
///
/// The timestamp is kept as the raw text from the input and only parsed on demand;
/// a record with an unparseable timestamp is still a valid record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantRecord {
    pub time: String,
    pub pollutant: String,
    pub location: String,
    pub result: f64,
    pub unit: String,
    pub material_type: String,
    pub definition: String,
    pub is_compliance_sample: bool,
}

impl PollutantRecord {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: String,
        pollutant: String,
        location: String,
        result: f64,
        unit: String,
        material_type: String,
        definition: String,
        is_compliance_sample: bool,
    ) -> Self {
        Self {
            time,
            pollutant,
            location,
            result,
            unit,
            material_type,
            definition,
            is_compliance_sample,
        }
    }

    /// Parsed sample time, `None` when the raw text is not a recognised ISO-8601 form
    pub fn sampled_at(&self) -> Option<NaiveDateTime> {
        parse_sample_time(&self.time)
    }

    pub fn has_valid_time(&self) -> bool {
        self.sampled_at().is_some()
    }

    pub fn matches_material_type(&self, material_type: &str) -> bool {
        self.material_type.to_uppercase() == material_type.to_uppercase()
    }
}

/// Parse an ISO-8601 timestamp. Offsets are normalised to UTC; a bare date means midnight.
pub fn parse_sample_time(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

use crate::utils::constants::{STATUS_COMPLIANT, STATUS_NON_COMPLIANT, STATUS_WARNING};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ProcessingError;

/// Three-tier compliance status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ComplianceStatus {
    Compliant,
    Warning,
    #[serde(rename = "Non-Compliant")]
    NonCompliant,
}

impl ComplianceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplianceStatus::Compliant => STATUS_COMPLIANT,
            ComplianceStatus::Warning => STATUS_WARNING,
            ComplianceStatus::NonCompliant => STATUS_NON_COMPLIANT,
        }
    }
}

impl fmt::Display for ComplianceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ComplianceStatus {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "compliant" => Ok(ComplianceStatus::Compliant),
            "warning" => Ok(ComplianceStatus::Warning),
            "non-compliant" | "noncompliant" | "non_compliant" => {
                Ok(ComplianceStatus::NonCompliant)
            }
            _ => Err(ProcessingError::InvalidFormat(format!(
                "Unknown compliance status: '{}'",
                s
            ))),
        }
    }
}

/// Row filter for the compliance table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ComplianceStatus),
}

impl StatusFilter {
    pub fn accepts(&self, status: ComplianceStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = ProcessingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(StatusFilter::All)
        } else {
            s.parse().map(StatusFilter::Only)
        }
    }
}

/// Per-site mean and conjunctive compliance for one pollutant under a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SiteAggregate {
    pub location: String,
    pub mean: f64,
    pub sample_count: usize,
    pub compliant: bool,
}

/// Flag-based compliance rollup of one pollutant across sites
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantComplianceSummary {
    pub pollutant: String,
    pub total_sites: usize,
    pub non_compliant_sites: usize,
    pub non_compliant_locations: Vec<String>,
    /// Mean of the per-site means, each site weighted equally
    pub average_value: f64,
    pub unit: String,
    pub status: ComplianceStatus,
    pub sites: Vec<SiteAggregate>,
}

impl PollutantComplianceSummary {
    pub fn empty(pollutant: &str, unit: String) -> Self {
        Self {
            pollutant: pollutant.to_string(),
            total_sites: 0,
            non_compliant_sites: 0,
            non_compliant_locations: Vec::new(),
            average_value: 0.0,
            unit,
            status: ComplianceStatus::Compliant,
            sites: Vec::new(),
        }
    }

    pub fn compliant_sites(&self) -> usize {
        self.total_sites - self.non_compliant_sites
    }

    pub fn has_sites(&self) -> bool {
        self.total_sites > 0
    }
}

/// Dashboard-wide counts across all pollutants under a filter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_pollutants: usize,
    pub compliant_count: usize,
    pub warning_count: usize,
    pub non_compliant_count: usize,
    pub non_compliant_rate: f64,
    /// Compliant sites over all sites, summed across pollutants
    pub site_compliance_rate: f64,
    pub overall_status: ComplianceStatus,
}

impl DashboardStats {
    pub fn summary(&self) -> String {
        format!(
            "Total Pollutants: {}\n\
            Compliant: {}\n\
            Warning: {}\n\
            Non-Compliant: {}\n\
            Non-Compliant Rate: {:.1}%\n\
            Site Compliance Rate: {:.1}%\n\
            Overall Status: {}",
            self.total_pollutants,
            self.compliant_count,
            self.warning_count,
            self.non_compliant_count,
            self.non_compliant_rate * 100.0,
            self.site_compliance_rate * 100.0,
            self.overall_status
        )
    }
}

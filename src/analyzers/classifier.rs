use crate::config::{RollupThresholds, ValueThresholds};
use crate::models::ComplianceStatus;

/// Maps a concentration to a three-tier status.
///
/// This is threshold-based compliance. It is unrelated to the compliance-sample flags
/// carried by records, which feed [`flag_status`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComplianceClassifier {
    warning_above: f64,
    non_compliant_above: f64,
}

impl ComplianceClassifier {
    pub fn new(thresholds: &ValueThresholds) -> Self {
        Self {
            warning_above: thresholds.warning_above,
            non_compliant_above: thresholds.non_compliant_above,
        }
    }

    pub fn classify(&self, value: f64) -> ComplianceStatus {
        if value > self.non_compliant_above {
            ComplianceStatus::NonCompliant
        } else if value > self.warning_above {
            ComplianceStatus::Warning
        } else {
            ComplianceStatus::Compliant
        }
    }
}

impl Default for ComplianceClassifier {
    fn default() -> Self {
        Self::new(&ValueThresholds::default())
    }
}

/// Status of a pollutant from its site flags: any non-compliant site makes it non-compliant.
/// This path has no warning tier.
pub fn flag_status(non_compliant_sites: usize) -> ComplianceStatus {
    if non_compliant_sites == 0 {
        ComplianceStatus::Compliant
    } else {
        ComplianceStatus::NonCompliant
    }
}

/// Overall dashboard status from the share of pollutants classified non-compliant
pub fn rate_status(non_compliant_rate: f64, thresholds: &RollupThresholds) -> ComplianceStatus {
    if non_compliant_rate > thresholds.non_compliant_rate {
        ComplianceStatus::NonCompliant
    } else if non_compliant_rate > thresholds.warning_rate {
        ComplianceStatus::Warning
    } else {
        ComplianceStatus::Compliant
    }
}

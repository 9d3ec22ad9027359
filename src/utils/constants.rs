/// Input column names (Environment Agency water-quality archive export)
pub const COL_SAMPLE_TIME: &str = "sample.sampleDateTime";
pub const COL_POLLUTANT: &str = "determinand.label";
pub const COL_LOCATION: &str = "sample.samplingPoint.label";
pub const COL_DEFINITION: &str = "determinand.definition";
pub const COL_UNIT: &str = "determinand.unit.label";
pub const COL_MATERIAL_TYPE: &str = "sample.sampledMaterialType.label";
pub const COL_RESULT: &str = "result";
pub const COL_COMPLIANCE: &str = "sample.isComplianceSample";

/// Filter wildcards
pub const ALL_LOCATIONS: &str = "All Locations";
pub const ALL_TYPES: &str = "All Types";

/// Marker prefix for results reported below the detection limit
pub const NON_DETECT_PREFIX: char = '<';

/// Three-tier value thresholds
pub const DEFAULT_WARNING_ABOVE: f64 = 1.0;
pub const DEFAULT_NON_COMPLIANT_ABOVE: f64 = 10.0;

/// Dashboard rollup rate thresholds
pub const DEFAULT_WARNING_RATE: f64 = 0.15;
pub const DEFAULT_NON_COMPLIANT_RATE: f64 = 0.30;

/// Split point for the compliant / non-compliant comparison chart
pub const DEFAULT_COMPARISON_THRESHOLD: f64 = 2.0;

/// Fraction of the value range added above and below chart axes
pub const AXIS_MARGIN_FRACTION: f64 = 0.1;

/// Processing defaults
pub const DEFAULT_CANCEL_CHECK_INTERVAL: usize = 1000;
pub const CONFIG_ENV_PREFIX: &str = "POLLUTANT";

/// Status labels
pub const STATUS_COMPLIANT: &str = "Compliant";
pub const STATUS_WARNING: &str = "Warning";
pub const STATUS_NON_COMPLIANT: &str = "Non-Compliant";

use crate::error::{ProcessingError, Result};
use crate::utils::constants::*;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use validator::Validate;

/// Value thresholds for the three-tier classifier
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ValueThresholds {
    #[validate(range(min = 0.0))]
    pub warning_above: f64,

    #[validate(range(min = 0.0))]
    pub non_compliant_above: f64,
}

impl Default for ValueThresholds {
    fn default() -> Self {
        Self {
            warning_above: DEFAULT_WARNING_ABOVE,
            non_compliant_above: DEFAULT_NON_COMPLIANT_ABOVE,
        }
    }
}

/// Rate thresholds for the dashboard-wide overall status
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RollupThresholds {
    #[validate(range(min = 0.0, max = 1.0))]
    pub warning_rate: f64,

    #[validate(range(min = 0.0, max = 1.0))]
    pub non_compliant_rate: f64,
}

impl Default for RollupThresholds {
    fn default() -> Self {
        Self {
            warning_rate: DEFAULT_WARNING_RATE,
            non_compliant_rate: DEFAULT_NON_COMPLIANT_RATE,
        }
    }
}

/// Header names of the input columns
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ColumnNames {
    #[validate(length(min = 1))]
    pub sample_time: String,
    #[validate(length(min = 1))]
    pub pollutant: String,
    #[validate(length(min = 1))]
    pub location: String,
    #[validate(length(min = 1))]
    pub definition: String,
    #[validate(length(min = 1))]
    pub unit: String,
    #[validate(length(min = 1))]
    pub material_type: String,
    #[validate(length(min = 1))]
    pub result: String,
    #[validate(length(min = 1))]
    pub compliance: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            sample_time: COL_SAMPLE_TIME.to_string(),
            pollutant: COL_POLLUTANT.to_string(),
            location: COL_LOCATION.to_string(),
            definition: COL_DEFINITION.to_string(),
            unit: COL_UNIT.to_string(),
            material_type: COL_MATERIAL_TYPE.to_string(),
            result: COL_RESULT.to_string(),
            compliance: COL_COMPLIANCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EngineConfig {
    #[validate(nested)]
    pub values: ValueThresholds,

    #[validate(nested)]
    pub rollup: RollupThresholds,

    #[validate(range(min = 0.0))]
    pub comparison_threshold: f64,

    #[validate(nested)]
    pub columns: ColumnNames,

    #[validate(range(min = 1))]
    pub cancel_check_interval: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            values: ValueThresholds::default(),
            rollup: RollupThresholds::default(),
            comparison_threshold: DEFAULT_COMPARISON_THRESHOLD,
            columns: ColumnNames::default(),
            cancel_check_interval: DEFAULT_CANCEL_CHECK_INTERVAL,
        }
    }
}

impl EngineConfig {
    /// Layer defaults, an optional TOML file and `POLLUTANT__*` environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(&Self::default())?);

        if let Some(path) = path {
            if !path.exists() {
                return Err(ProcessingError::Config(format!(
                    "Config file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        let config: Self = builder
            .add_source(Environment::with_prefix(CONFIG_ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.check()?;
        Ok(config)
    }

    /// Range validation plus the ordering each warning/non-compliant pair must respect
    pub fn check(&self) -> Result<()> {
        self.validate()?;

        if self.values.warning_above >= self.values.non_compliant_above {
            return Err(ProcessingError::Config(format!(
                "Warning threshold {} must be below non-compliant threshold {}",
                self.values.warning_above, self.values.non_compliant_above
            )));
        }

        if self.rollup.warning_rate >= self.rollup.non_compliant_rate {
            return Err(ProcessingError::Config(format!(
                "Warning rate {} must be below non-compliant rate {}",
                self.rollup.warning_rate, self.rollup.non_compliant_rate
            )));
        }

        Ok(())
    }
}

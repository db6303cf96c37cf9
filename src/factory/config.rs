use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors detected while loading or validating a configuration.
///
/// All of them are fatal and are raised before any engine is built.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("{field} must be positive (got {value})")]
    NonPositive { field: &'static str, value: f64 },

    #[error("{field} must be non-negative and finite (got {value})")]
    InvalidRate { field: &'static str, value: f64 },

    #[error("initial spares {initial} exceed spares capacity {capacity}")]
    InitialAboveCapacity { initial: u64, capacity: u64 },

    #[error("invalid {field} distribution: {detail}")]
    Distribution { field: &'static str, detail: String },

    #[error("failed to read {path}: {detail}")]
    Read { path: String, detail: String },

    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

/// Distribution family and parameters for a random duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DurationDistribution {
    Fixed { value: f64 },
    Uniform { low: f64, high: f64 },
    /// Normal truncated to positive values
    Normal { mean: f64, std_dev: f64 },
    Exponential { mean: f64 },
}

impl DurationDistribution {
    pub fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        let bad = |detail: String| Err(ConfigError::Distribution { field, detail });
        match *self {
            DurationDistribution::Fixed { value } => {
                if !(value.is_finite() && value > 0.0) {
                    return bad(format!("fixed value {} must be positive", value));
                }
            }
            DurationDistribution::Uniform { low, high } => {
                if !(low.is_finite() && high.is_finite() && low > 0.0 && low < high) {
                    return bad(format!("uniform needs 0 < low < high (got {}..{})", low, high));
                }
            }
            DurationDistribution::Normal { mean, std_dev } => {
                if !(mean.is_finite() && mean > 0.0) {
                    return bad(format!("normal mean {} must be positive", mean));
                }
                if !(std_dev.is_finite() && std_dev >= 0.0) {
                    return bad(format!("normal std_dev {} must be non-negative", std_dev));
                }
            }
            DurationDistribution::Exponential { mean } => {
                if !(mean.is_finite() && mean > 0.0) {
                    return bad(format!("exponential mean {} must be positive", mean));
                }
            }
        }
        Ok(())
    }

    pub fn mean(&self) -> f64 {
        match *self {
            DurationDistribution::Fixed { value } => value,
            DurationDistribution::Uniform { low, high } => (low + high) / 2.0,
            DurationDistribution::Normal { mean, .. } => mean,
            DurationDistribution::Exponential { mean } => mean,
        }
    }
}

/// Cost rates applied by the accrual and machine processes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Labor cost per technician per time unit
    pub labor_per_technician_hour: f64,
    /// Holding cost per unit of spares capacity per accrual period
    pub spares_holding_per_period: f64,
    /// Penalty per time unit a machine waits for a replacement
    pub downtime_penalty_per_hour: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            labor_per_technician_hour: 3.75,
            spares_holding_per_period: 30.0,
            downtime_penalty_per_hour: 20.0,
        }
    }
}

/// Full description of one repair-shop run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    pub horizon: f64,
    pub machine_count: usize,
    pub technicians: u64,
    pub spares_capacity: u64,
    pub initial_spares: u64,
    pub accrual_period: f64,
    pub seed: u64,
    pub rates: CostRates,
    pub failure_interval: DurationDistribution,
    pub repair_duration: DurationDistribution,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            horizon: 40.0,
            machine_count: 50,
            technicians: 3,
            spares_capacity: 20,
            initial_spares: 20,
            accrual_period: 8.0,
            seed: 0,
            rates: CostRates::default(),
            failure_interval: DurationDistribution::Uniform {
                low: 132.0,
                high: 182.0,
            },
            repair_duration: DurationDistribution::Uniform {
                low: 4.0,
                high: 10.0,
            },
        }
    }
}

impl FactoryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing fields take their defaults
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: FactoryConfig =
            toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a TOML configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            detail: e.to_string(),
        })?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    pub fn with_horizon(mut self, horizon: f64) -> Self {
        self.horizon = horizon;
        self
    }

    pub fn with_machine_count(mut self, count: usize) -> Self {
        self.machine_count = count;
        self
    }

    pub fn with_technicians(mut self, technicians: u64) -> Self {
        self.technicians = technicians;
        self
    }

    /// Set capacity and initial level of the spares store
    pub fn with_spares(mut self, capacity: u64, initial: u64) -> Self {
        self.spares_capacity = capacity;
        self.initial_spares = initial;
        self
    }

    pub fn with_accrual_period(mut self, period: f64) -> Self {
        self.accrual_period = period;
        self
    }

    pub fn with_rates(mut self, rates: CostRates) -> Self {
        self.rates = rates;
        self
    }

    pub fn with_failure_interval(mut self, distribution: DurationDistribution) -> Self {
        self.failure_interval = distribution;
        self
    }

    pub fn with_repair_duration(mut self, distribution: DurationDistribution) -> Self {
        self.repair_duration = distribution;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Reject any configuration the engine could not run faithfully
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("horizon", self.horizon)?;
        positive("accrual_period", self.accrual_period)?;
        positive("machine_count", self.machine_count as f64)?;
        positive("technicians", self.technicians as f64)?;
        positive("spares_capacity", self.spares_capacity as f64)?;

        if self.initial_spares > self.spares_capacity {
            return Err(ConfigError::InitialAboveCapacity {
                initial: self.initial_spares,
                capacity: self.spares_capacity,
            });
        }

        rate("labor_per_technician_hour", self.rates.labor_per_technician_hour)?;
        rate("spares_holding_per_period", self.rates.spares_holding_per_period)?;
        rate("downtime_penalty_per_hour", self.rates.downtime_penalty_per_hour)?;

        self.failure_interval.validate("failure_interval")?;
        self.repair_duration.validate("repair_duration")?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn rate(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidRate { field, value })
    }
}

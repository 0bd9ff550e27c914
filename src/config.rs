use crate::error::{ConfigError, Result as EstimatorResult};
use crate::estimator::FeeSchedule;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Hours in an average month, used for monthly figures
pub const HOURS_PER_MONTH: f64 = 730.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub billing: BillingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    pub region: String,
    pub interval: PricingInterval,
    pub hours_per_month: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BillingConfig {
    /// Monthly savings covered by one optimizer billing step
    pub fee_savings_step: f64,
    pub fee_per_step: f64,
}

/// Period that displayed prices are scaled to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingInterval {
    Hourly,
    Monthly,
}

impl FromStr for PricingInterval {
    type Err = ConfigError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "hourly" => Ok(PricingInterval::Hourly),
            "monthly" => Ok(PricingInterval::Monthly),
            other => Err(ConfigError::UnknownInterval(other.to_string())),
        }
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            interval: PricingInterval::Monthly,
            hours_per_month: HOURS_PER_MONTH,
        }
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        let fees = FeeSchedule::default();
        Self {
            fee_savings_step: fees.savings_step,
            fee_per_step: fees.fee_per_step,
        }
    }
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = if let Some(p) = path {
            p.to_path_buf()
        } else {
            // Try .savings-estimator.toml in current dir, then ~/.config/savings-estimator/config.toml
            let local = PathBuf::from(".savings-estimator.toml");
            if local.exists() {
                local
            } else {
                dirs::config_dir()
                    .map(|d| d.join("savings-estimator").join("config.toml"))
                    .unwrap_or_else(|| PathBuf::from(".savings-estimator.toml"))
            }
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config: {}", config_path.display()))?;
            let config: Config = toml::from_str(&content).with_context(|| {
                let mut err = format!("Failed to parse config: {}", config_path.display());
                err.push_str("\n  Common issues:");
                err.push_str("\n    - Invalid TOML syntax");
                err.push_str("\n    - Incorrect value types");
                err.push_str("\n  Tip: Run 'savings-estimator init' to create a new config file");
                err
            })?;
            config.validate()?;
            Ok(config)
        } else {
            if path.is_some() {
                tracing::warn!(
                    "Config file not found: {}, using default configuration",
                    config_path.display()
                );
            }
            Ok(Config::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    pub fn validate(&self) -> EstimatorResult<()> {
        if !(self.pricing.hours_per_month > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "pricing.hours_per_month".to_string(),
                reason: format!("must be positive, got {}", self.pricing.hours_per_month),
            }
            .into());
        }
        if !(self.billing.fee_savings_step > 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "billing.fee_savings_step".to_string(),
                reason: format!("must be positive, got {}", self.billing.fee_savings_step),
            }
            .into());
        }
        if !(self.billing.fee_per_step >= 0.0) {
            return Err(ConfigError::InvalidValue {
                field: "billing.fee_per_step".to_string(),
                reason: format!("must not be negative, got {}", self.billing.fee_per_step),
            }
            .into());
        }
        Ok(())
    }

    /// Multiplier that turns hourly figures into the given interval
    pub fn multiplier(&self, interval: PricingInterval) -> f64 {
        match interval {
            PricingInterval::Hourly => 1.0,
            PricingInterval::Monthly => self.pricing.hours_per_month,
        }
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            savings_step: self.billing.fee_savings_step,
            fee_per_step: self.billing.fee_per_step,
        }
    }
}

pub fn init_config(output: &Path) -> Result<()> {
    let config = Config::default();
    config.save(output)?;
    println!("Created config file: {}", output.display());
    Ok(())
}

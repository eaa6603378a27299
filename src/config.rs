use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants;
use crate::domain::OrderStatus;
use crate::error::{PipelineError, Result};

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enrichment: EnrichmentConfig,
    pub storage: StorageConfig,
    pub generator: GeneratorConfig,
    pub logging: LoggingConfig,
}

/// Business rules applied by the validator and the metric derivers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Allowed gap between declared and recomputed subtotal
    pub subtotal_tolerance: f64,
    pub value_tiers: ValueTiers,
    pub segments: SegmentRules,
    pub priority: PriorityRules,
    /// Fraction of the unit price treated as cost of goods
    pub cost_ratio: f64,
    pub processor_version: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ValueTiers {
    pub premium: f64,
    pub high_value: f64,
    pub medium_value: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SegmentRules {
    /// Units in one order that make the customer a VIP on their own
    pub bulk_quantity: u32,
    pub vip_amount: f64,
    pub regular_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PriorityRules {
    pub high_value_amount: f64,
    pub high_value_points: u32,
    pub major_cities: Vec<String>,
    pub major_city_points: u32,
    pub expedited_statuses: Vec<OrderStatus>,
    pub status_points: u32,
    pub urgent_score: u32,
    pub normal_score: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_root: PathBuf,
    pub bucket: String,
    pub raw_prefix: String,
    pub processed_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub orders_per_batch: usize,
    pub tax_rate: f64,
    pub free_shipping_threshold: f64,
    pub major_city_shipping: f64,
    pub standard_shipping: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file_name: String,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            subtotal_tolerance: 0.01,
            value_tiers: ValueTiers::default(),
            segments: SegmentRules::default(),
            priority: PriorityRules::default(),
            cost_ratio: constants::COST_OF_GOODS_RATIO,
            processor_version: constants::PROCESSOR_VERSION.to_string(),
        }
    }
}

impl Default for ValueTiers {
    fn default() -> Self {
        Self {
            premium: 1000.0,
            high_value: 500.0,
            medium_value: 100.0,
        }
    }
}

impl Default for SegmentRules {
    fn default() -> Self {
        Self {
            bulk_quantity: 10,
            vip_amount: 1000.0,
            regular_amount: 300.0,
        }
    }
}

impl Default for PriorityRules {
    fn default() -> Self {
        Self {
            high_value_amount: 500.0,
            high_value_points: 3,
            major_cities: constants::MAJOR_CITIES.iter().map(|c| c.to_string()).collect(),
            major_city_points: 2,
            expedited_statuses: vec![OrderStatus::Shipped, OrderStatus::Confirmed],
            status_points: 2,
            urgent_score: 5,
            normal_score: 3,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_root: PathBuf::from("data"),
            bucket: constants::DEFAULT_BUCKET.to_string(),
            raw_prefix: constants::RAW_PREFIX.to_string(),
            processed_prefix: constants::PROCESSED_PREFIX.to_string(),
        }
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            orders_per_batch: 100,
            tax_rate: 0.20,
            free_shipping_threshold: 100.0,
            major_city_shipping: 4.99,
            standard_shipping: 7.99,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("logs"),
            file_name: "shopfast_orders.log".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from `path`, the `SHOPFAST_CONFIG` variable, or
    /// `shopfast.toml`, in that order. A missing default file yields defaults;
    /// a missing explicitly requested file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let explicit = path
            .map(Path::to_path_buf)
            .or_else(|| std::env::var(constants::CONFIG_PATH_ENV).ok().map(PathBuf::from));

        let config_path = match explicit {
            Some(p) => p,
            None => {
                let default_path = PathBuf::from(constants::DEFAULT_CONFIG_PATH);
                if !default_path.exists() {
                    return Ok(Config::default());
                }
                default_path
            }
        };

        let config_content = fs::read_to_string(&config_path).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        Self::from_toml(&config_content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        let tiers = &self.enrichment.value_tiers;
        if !(tiers.premium >= tiers.high_value && tiers.high_value >= tiers.medium_value) {
            return Err(PipelineError::Config(
                "value tiers must be ordered premium >= high_value >= medium_value".to_string(),
            ));
        }
        if self.enrichment.priority.urgent_score < self.enrichment.priority.normal_score {
            return Err(PipelineError::Config(
                "urgent_score must not be lower than normal_score".to_string(),
            ));
        }
        if self.enrichment.subtotal_tolerance < 0.0 {
            return Err(PipelineError::Config("subtotal_tolerance must be non-negative".to_string()));
        }
        if self.storage.bucket.trim().is_empty() {
            return Err(PipelineError::Config("storage.bucket must not be empty".to_string()));
        }
        Ok(())
    }
}

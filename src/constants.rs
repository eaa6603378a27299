/// Version tag stamped on every enriched order
pub const PROCESSOR_VERSION: &str = "2.0";

pub const DEFAULT_CONFIG_PATH: &str = "shopfast.toml";
pub const CONFIG_PATH_ENV: &str = "SHOPFAST_CONFIG";
pub const METRICS_ADDR_ENV: &str = "SHOPFAST_METRICS_ADDR";

pub const DEFAULT_BUCKET: &str = "shopfast-ecommerce-data";
pub const RAW_PREFIX: &str = "raw/";
pub const PROCESSED_PREFIX: &str = "processed/";

/// Cities served by the express delivery network
pub const MAJOR_CITIES: [&str; 3] = ["Paris", "Lyon", "Marseille"];

/// Share of the list price assumed to be cost of goods
pub const COST_OF_GOODS_RATIO: f64 = 0.6;

use config::{Config, ConfigError, Environment, File as ConfigFile};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CATALOG_PATH: &str = "Catalog.toml";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub catalog_path: String,
    pub currency_symbol: String,
    pub open_cart_on_add: bool,
    /// Values of the price checkboxes, e.g. `"0-15"` or `"50+"`.
    pub price_buckets: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_path: DEFAULT_CATALOG_PATH.to_string(),
            currency_symbol: "$".to_string(),
            open_cart_on_add: true,
            price_buckets: default_price_buckets(),
        }
    }
}

fn default_price_buckets() -> Vec<String> {
    ["0-15", "15-30", "30-50", "50+"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
    let defaults = AppConfig::default();
    Config::builder()
        .set_default("catalog_path", defaults.catalog_path)?
        .set_default("currency_symbol", defaults.currency_symbol)?
        .set_default("open_cart_on_add", defaults.open_cart_on_add)?
        .set_default("price_buckets", defaults.price_buckets)
}

/// `STOREFRONT_*` variables. `STOREFRONT_PRICE_BUCKETS` is a comma-separated list.
fn environment() -> Environment {
    Environment::with_prefix("STOREFRONT")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("price_buckets")
}

/// Load `Storefront.toml` (optional) with `STOREFRONT_*` environment overrides.
pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = builder_with_defaults()?
        .add_source(ConfigFile::with_name("Storefront").required(false))
        .add_source(environment())
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

/// Load from an explicit file, without environment overrides.
pub fn load_configuration_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let builder = builder_with_defaults()?
        .add_source(ConfigFile::from(path))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use crate::grid::GridResult;

/// Main configuration struct
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// Strategy configuration (type, symbol, params)
    pub strategy: StrategyConfig,
    /// Logging configuration
    #[serde(default)]
    pub log: LogConfig,
    /// Paper host configuration
    #[serde(default)]
    pub paper: PaperConfig,
}

#[derive(Debug, Deserialize)]
pub struct StrategyConfig {
    /// Strategy type name (e.g., "infinitegrid")
    #[serde(rename = "type")]
    pub type_name: String,
    /// Instrument to trade (e.g., "BTCUSDT")
    #[serde(alias = "asset")]
    pub symbol: String,
    /// Strategy-specific parameters
    #[serde(default)]
    pub params: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct LogConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

#[derive(Debug, Deserialize)]
pub struct PaperConfig {
    /// Currency the paper account is funded in
    #[serde(default = "default_quote_currency")]
    pub quote_currency: String,
    /// Starting quote balance
    #[serde(default = "default_initial_balance")]
    pub initial_balance: Decimal,
    /// Price tape replayed by the paper host
    #[serde(default = "default_price_file")]
    pub price_file: PathBuf,
    /// Delay between tape prices
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for PaperConfig {
    fn default() -> Self {
        Self {
            quote_currency: default_quote_currency(),
            initial_balance: default_initial_balance(),
            price_file: default_price_file(),
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

fn default_quote_currency() -> String {
    "USDT".to_string()
}

fn default_initial_balance() -> Decimal {
    Decimal::from(10_000)
}

fn default_price_file() -> PathBuf {
    PathBuf::from("prices.txt")
}

fn default_tick_interval_ms() -> u64 {
    100
}

impl Settings {
    /// Load settings from a configuration file
    ///
    /// Environment variables override the file, e.g. `APP__LOG__LEVEL=debug`
    /// or `APP__PAPER__PRICE_FILE=tape.txt`.
    pub fn new(config_path: impl AsRef<Path>) -> GridResult<Self> {
        let s = Config::builder()
            .add_source(File::from(config_path.as_ref()))
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?;

        Ok(s.try_deserialize()?)
    }
}

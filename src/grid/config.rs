//! Grid trading configuration

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{GridError, GridResult};

/// Grid strategy configuration
///
/// Immutable once the strategy is running. Decimal fields accept either
/// strings (`"0.01"`) or plain numbers in the source config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Instrument to trade (e.g., "BTCUSDT")
    pub symbol: String,

    /// Quote currency whose available balance gates seeding
    #[serde(default = "default_quote_currency", alias = "quoteCurrency")]
    pub quote_currency: String,

    /// Total quote capital allotted to the grid
    pub budget: Decimal,

    /// No buy order is ever priced below this
    #[serde(alias = "floorPrice", alias = "lowerPrice")]
    pub floor_price: Decimal,

    /// Fractional price step between adjacent rungs, in (0, 1)
    pub margin: Decimal,

    /// Base quantity of a normal rung
    pub quantity: Decimal,

    /// Explicit size of the one-time seed buy
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "initialOrderQuantity")]
    pub initial_order_quantity: Option<Decimal>,

    /// Number of rungs pre-placed at seed time, split evenly above and below
    #[serde(default = "default_grid_count", alias = "gridCount", alias = "gridNumber")]
    pub grid_count: u32,

    /// Number of rungs added when one side of the ladder runs low
    #[serde(default, alias = "countOfMoreOrders")]
    pub count_of_more_orders: u32,

    /// Conserve quote value across buy/sell flips instead of base quantity
    #[serde(default, alias = "longMode")]
    pub long_mode: bool,
}

fn default_quote_currency() -> String {
    "USDT".to_string()
}

fn default_grid_count() -> u32 {
    10
}

impl GridConfig {
    /// Create a new grid configuration with required parameters
    ///
    /// # Arguments
    /// * `symbol` - Instrument to trade
    /// * `budget` - Total quote capital
    /// * `floor_price` - Hard lower bound for buy rungs
    /// * `margin` - Fractional step between rungs
    /// * `quantity` - Base quantity per rung
    pub fn new(
        symbol: impl Into<String>,
        budget: Decimal,
        floor_price: Decimal,
        margin: Decimal,
        quantity: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            quote_currency: default_quote_currency(),
            budget,
            floor_price,
            margin,
            quantity,
            initial_order_quantity: None,
            grid_count: default_grid_count(),
            count_of_more_orders: 0,
            long_mode: false,
        }
    }

    /// Build a config from a strategy params table
    ///
    /// `symbol` comes from the strategy section and overrides any symbol
    /// present in the params.
    pub fn from_params(symbol: &str, params: &HashMap<String, Value>) -> GridResult<Self> {
        let mut table: serde_json::Map<String, Value> =
            params.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        table.insert("symbol".to_string(), Value::from(symbol));

        let config: Self = serde_json::from_value(Value::Object(table))
            .map_err(|e| GridError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Builder: set quote currency
    pub fn with_quote_currency(mut self, currency: impl Into<String>) -> Self {
        self.quote_currency = currency.into();
        self
    }

    /// Builder: set grid count
    pub fn with_grid_count(mut self, grid_count: u32) -> Self {
        self.grid_count = grid_count;
        self
    }

    /// Builder: set the seed order size explicitly
    pub fn with_initial_order_quantity(mut self, quantity: Decimal) -> Self {
        self.initial_order_quantity = Some(quantity);
        self
    }

    /// Builder: set the number of low-water replenishment rungs
    pub fn with_count_of_more_orders(mut self, count: u32) -> Self {
        self.count_of_more_orders = count;
        self
    }

    /// Builder: enable or disable long mode
    pub fn with_long_mode(mut self, long_mode: bool) -> Self {
        self.long_mode = long_mode;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> GridResult<()> {
        if self.symbol.is_empty() {
            return Err(GridError::InvalidConfig("symbol cannot be empty".into()));
        }

        if self.quote_currency.is_empty() {
            return Err(GridError::InvalidConfig(
                "quote_currency cannot be empty".into(),
            ));
        }

        if self.margin <= Decimal::ZERO || self.margin >= Decimal::ONE {
            return Err(GridError::InvalidConfig(format!(
                "margin must be in (0, 1), got {}",
                self.margin
            )));
        }

        if self.quantity <= Decimal::ZERO {
            return Err(GridError::InvalidConfig("quantity must be positive".into()));
        }

        if self.budget <= Decimal::ZERO {
            return Err(GridError::InvalidConfig("budget must be positive".into()));
        }

        if self.floor_price < Decimal::ZERO {
            return Err(GridError::InvalidConfig(
                "floor_price cannot be negative".into(),
            ));
        }

        if let Some(initial) = self.initial_order_quantity {
            if initial <= Decimal::ZERO {
                return Err(GridError::InvalidConfig(
                    "initial_order_quantity must be positive".into(),
                ));
            }
        }

        Ok(())
    }

    /// Number of rungs placed on each side at seed time
    pub fn levels_per_side(&self) -> u32 {
        self.grid_count / 2
    }

    /// Upward step factor `1 + margin`
    pub fn up_ratio(&self) -> Decimal {
        Decimal::ONE + self.margin
    }

    /// Downward step factor `1 - margin`
    pub fn down_ratio(&self) -> Decimal {
        Decimal::ONE - self.margin
    }

    /// Size of the one-time seed buy
    ///
    /// Uses `initial_order_quantity` when set, otherwise
    /// `quantity / (1 - 1/(1+margin))`, evaluated as the algebraically equal
    /// `quantity * (1+margin) / margin` to keep the result exact.
    pub fn seed_quantity(&self) -> Decimal {
        self.initial_order_quantity
            .unwrap_or_else(|| self.quantity * self.up_ratio() / self.margin)
    }
}

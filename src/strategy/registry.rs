use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::Strategy;
use crate::grid::{GridError, GridResult, InfiniteGridFactory, StrategyPorts, STRATEGY_NAME};

/// Factory trait for creating strategies
pub trait StrategyFactory: Send + Sync {
    /// Create a new strategy instance for `symbol` from its parameters
    fn create(
        &self,
        symbol: &str,
        params: &HashMap<String, Value>,
        ports: StrategyPorts,
    ) -> GridResult<Arc<dyn Strategy>>;
}

/// Registry for strategy factories
pub struct StrategyRegistry {
    factories: HashMap<String, Box<dyn StrategyFactory>>,
}

impl StrategyRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Register a strategy factory
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: StrategyFactory + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }

    /// Names of all registered strategies
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Create a strategy by name
    pub fn create_strategy(
        &self,
        name: &str,
        symbol: &str,
        params: &HashMap<String, Value>,
        ports: StrategyPorts,
    ) -> GridResult<Arc<dyn Strategy>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| GridError::UnknownStrategy(name.to_string()))?;
        factory.create(symbol, params, ports)
    }
}

impl Default for StrategyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry with every built-in strategy
pub fn default_registry() -> StrategyRegistry {
    let mut registry = StrategyRegistry::new();
    registry.register(STRATEGY_NAME, InfiniteGridFactory);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::mock::{mock_ports, MockExchange};
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn params() -> HashMap<String, Value> {
        let mut params = HashMap::new();
        params.insert("budget".to_string(), json!(1000));
        params.insert("floor_price".to_string(), json!(90));
        params.insert("margin".to_string(), json!(0.01));
        params.insert("quantity".to_string(), json!(1));
        params.insert("grid_count".to_string(), json!(4));
        params
    }

    #[test]
    fn test_default_registry_creates_grid() {
        let registry = default_registry();
        let (ports, _, _) = mock_ports(Arc::new(MockExchange::new(dec!(100), "USDT", dec!(1000))));

        let strategy = registry
            .create_strategy("infinitegrid", "BTCUSDT", &params(), ports)
            .unwrap();

        assert_eq!(strategy.name(), "infinitegrid");
        assert_eq!(strategy.symbol(), "BTCUSDT");
        assert_eq!(registry.names(), vec!["infinitegrid"]);
    }

    #[test]
    fn test_unknown_strategy() {
        let registry = default_registry();
        let (ports, _, _) = mock_ports(Arc::new(MockExchange::new(dec!(100), "USDT", dec!(1000))));

        let err = registry
            .create_strategy("martingale", "BTCUSDT", &params(), ports)
            .err()
            .unwrap();
        assert!(matches!(err, GridError::UnknownStrategy(name) if name == "martingale"));
    }

    #[test]
    fn test_missing_param_is_config_error() {
        let registry = default_registry();
        let (ports, _, _) = mock_ports(Arc::new(MockExchange::new(dec!(100), "USDT", dec!(1000))));
        let mut params = params();
        params.remove("margin");

        let err = registry
            .create_strategy("infinitegrid", "BTCUSDT", &params, ports)
            .err()
            .unwrap();
        assert!(matches!(err, GridError::InvalidConfig(_)));
    }
}

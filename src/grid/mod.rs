//! Infinite Grid Trading Module
//!
//! A self-replenishing geometric grid. At start the strategy places a one-time
//! seed buy at the market price plus a ladder of limit orders spaced by
//! `(1 ± margin)^i` around it. Every filled rung is replaced by an order on
//! the opposite side one step away, and a side that runs low is widened with
//! extra rungs, so the ladder follows the price without an upper bound. No buy
//! is ever placed below the configured floor.
//!
//! # Architecture
//!
//! - [`config`] - Grid configuration and validation
//! - [`types`] - Orders, sides, statuses and host events
//! - [`errors`] - Error types
//! - [`state`] - Occupancy counters
//! - [`active_orders`] - Registry of orders believed live
//! - [`planner`] - Seed ladder computation
//! - [`follow_up`] - Replacement and replenishment after a fill
//! - [`executor`] - Host ports (mockable for testing)
//! - [`shutdown`] - Graceful shutdown hooks
//! - [`strategy`] - The strategy tying it all together
//!
//! # Example Usage
//!
//! ```rust,ignore
//! use infinite_grid::grid::{GridConfig, InfiniteGridStrategy, StrategyPorts};
//!
//! // $1000 budget, 1% steps, 10 pre-placed rungs, no buys below 90
//! let config = GridConfig::new("BTCUSDT", dec!(1000), dec!(90), dec!(0.01), dec!(0.1))
//!     .with_count_of_more_orders(3);
//!
//! let strategy = InfiniteGridStrategy::new(config, ports)?;
//! strategy.on_connect().await;              // seeds once
//! strategy.on_order_update(filled).await;   // places the follow-ups
//! ```
//!
//! # Testing
//!
//! The [`mock`] module provides a host that records every batch:
//!
//! ```rust,ignore
//! use infinite_grid::grid::mock::{mock_ports, MockExchange};
//!
//! let exchange = Arc::new(MockExchange::new(dec!(100), "USDT", dec!(10000)));
//! let (ports, notifier, shutdown) = mock_ports(exchange.clone());
//! ```

pub mod active_orders;
pub mod config;
pub mod errors;
pub mod executor;
pub mod follow_up;
pub mod planner;
pub mod shutdown;
pub mod state;
pub mod strategy;
pub mod types;

// Re-export commonly used types
pub use active_orders::ActiveOrderBook;
pub use config::GridConfig;
pub use errors::{GridError, GridResult};
pub use executor::{mock, LogNotifier, MarketData, Notifier, OrderExecutor, Session, StrategyPorts};
pub use follow_up::{follow_up_orders, EARLY_PLACED_COUNT};
pub use planner::{plan_ladder, LadderPlan};
pub use shutdown::{GracefulShutdown, ShutdownHook, ShutdownRegistrar};
pub use state::GridState;
pub use strategy::{InfiniteGridFactory, InfiniteGridStrategy, STRATEGY_NAME};
pub use types::{
    Channel, HostEvent, Order, OrderSide, OrderStatus, SubmitOrder, Subscription,
};

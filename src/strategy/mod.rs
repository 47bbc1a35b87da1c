//! Strategy Interface Module
//!
//! Strategies are host-driven: the host calls `subscribe` once, `on_connect`
//! after every (re)connection and `on_order_update` for each order snapshot.
//! A strategy acts through the ports it was constructed with and never
//! returns orders to the host.
//!
//! # Design Philosophy
//!
//! - **Decoupled**: Strategies only see the [`StrategyPorts`](crate::grid::StrategyPorts) traits
//! - **Testable**: Ports are mockable, callbacks can be invoked directly
//! - **Pluggable**: Strategies are built by name through a [`StrategyRegistry`]
//!
//! # Usage with a Runner
//!
//! ```ignore
//! let registry = default_registry();
//! let runner = BotRunner::new("config.toml", registry)?;
//! runner.run().await?;
//! ```

pub mod registry;
mod traits;

pub use registry::{default_registry, StrategyFactory, StrategyRegistry};
pub use traits::{NoOpStrategy, Strategy};

//! Strategy trait definition

use async_trait::async_trait;

use crate::grid::{Order, Session};

/// Strategy interface for host-driven trading logic
///
/// A strategy is constructed with its [`StrategyPorts`](crate::grid::StrategyPorts)
/// and then driven entirely by host callbacks. It places and cancels orders
/// through those ports; the host never inspects what it does.
///
/// # Lifecycle
///
/// 1. Host calls `subscribe` once with its market-data session
/// 2. Host calls `on_connect` after every (re)connection
/// 3. Host calls `on_order_update` for every order snapshot it receives
/// 4. Cleanup runs through the shutdown hooks the strategy registered
///
/// # Example Implementation
///
/// ```ignore
/// struct Watcher { symbol: String }
///
/// #[async_trait]
/// impl Strategy for Watcher {
///     fn name(&self) -> &str { "watcher" }
///     fn symbol(&self) -> &str { &self.symbol }
///     fn subscribe(&self, session: &dyn Session) {
///         session.subscribe(Subscription::kline(&self.symbol, "1m"));
///     }
///     async fn on_connect(&self) {}
///     async fn on_order_update(&self, order: Order) {
///         log::info!("{}", order);
///     }
/// }
/// ```
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Registry name of the strategy
    fn name(&self) -> &str;

    /// Symbol the strategy trades
    fn symbol(&self) -> &str;

    /// Declare market-data interest on the host session
    fn subscribe(&self, session: &dyn Session);

    /// Called on every (re)connection of the host
    async fn on_connect(&self);

    /// Called with each order snapshot from the host's order stream
    ///
    /// May be called concurrently; implementations serialize their own state.
    async fn on_order_update(&self, order: Order);
}

/// A strategy that ignores every event
///
/// Useful for exercising hosts without trading logic.
#[derive(Debug, Default)]
pub struct NoOpStrategy {
    symbol: String,
}

impl NoOpStrategy {
    pub fn new(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
        }
    }
}

#[async_trait]
impl Strategy for NoOpStrategy {
    fn name(&self) -> &str {
        "noop"
    }

    fn symbol(&self) -> &str {
        &self.symbol
    }

    fn subscribe(&self, _session: &dyn Session) {}

    async fn on_connect(&self) {}

    async fn on_order_update(&self, _order: Order) {}
}

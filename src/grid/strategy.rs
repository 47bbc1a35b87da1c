//! Infinite grid strategy: seeding, fill handling and shutdown

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::FutureExt;
use log::{debug, error, info, warn};
use rust_decimal::Decimal;
use serde_json::Value;
use tokio::sync::Mutex;

use super::active_orders::ActiveOrderBook;
use super::config::GridConfig;
use super::errors::GridResult;
use super::executor::{MarketData, Notifier, OrderExecutor, Session, StrategyPorts};
use super::follow_up::follow_up_orders;
use super::planner::plan_ladder;
use super::state::GridState;
use super::types::{Order, OrderStatus, Subscription};
use crate::strategy::{Strategy, StrategyFactory};

/// Name the grid is registered under
pub const STRATEGY_NAME: &str = "infinitegrid";

/// Candle interval requested from the host session
const KLINE_INTERVAL: &str = "1m";

/// State shared by every callback, always accessed under one lock
#[derive(Debug, Default)]
struct GridCore {
    state: GridState,
    active_orders: ActiveOrderBook,
}

/// Self-replenishing geometric grid around the market price
///
/// Seeds a ladder on connect (once), replaces each filled rung with the
/// opposite side one margin step away, and widens a side when it runs low.
/// All state mutations and the submissions they cause happen under a single
/// mutex, so concurrent callbacks never read a stale occupancy.
pub struct InfiniteGridStrategy {
    config: GridConfig,
    core: Arc<Mutex<GridCore>>,
    market: Arc<dyn MarketData>,
    executor: Arc<dyn OrderExecutor>,
    notifier: Arc<dyn Notifier>,
}

impl InfiniteGridStrategy {
    /// Create the strategy and register its shutdown cleanup
    pub fn new(config: GridConfig, ports: StrategyPorts) -> GridResult<Self> {
        config.validate()?;

        let core = Arc::new(Mutex::new(GridCore::default()));

        let hook_core = core.clone();
        let hook_executor = ports.executor.clone();
        ports.shutdown.on_shutdown(Box::new(move || {
            async move {
                cancel_active_orders(&hook_core, hook_executor.as_ref()).await;
            }
            .boxed()
        }));

        info!(
            "Grid configured: symbol={}, margin={}, grid_count={}, floor={}, quantity={}, long_mode={}",
            config.symbol,
            config.margin,
            config.grid_count,
            config.floor_price,
            config.quantity,
            config.long_mode
        );

        Ok(Self {
            config,
            core,
            market: ports.market,
            executor: ports.executor,
            notifier: ports.notifier,
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Snapshot of the occupancy counters
    pub async fn state(&self) -> GridState {
        self.core.lock().await.state.clone()
    }

    /// Snapshot of the orders currently tracked as active
    pub async fn active_orders(&self) -> Vec<Order> {
        self.core.lock().await.active_orders.orders()
    }

    /// Place the initial ladder, unless one is already in place
    ///
    /// Missing balance or price is an expected transient condition and makes
    /// this a no-op.
    pub async fn seed(&self) {
        let mut core = self.core.lock().await;

        if core.state.is_seeded() {
            info!(
                "Grid already seeded (upper={}, lower={}), skipping",
                core.state.upper_occupancy, core.state.lower_occupancy
            );
            return;
        }

        match self.market.available_balance(&self.config.quote_currency).await {
            Some(balance) if balance > Decimal::ZERO => {}
            _ => {
                debug!("No available {} balance, waiting", self.config.quote_currency);
                return;
            }
        }

        let current_price = match self.market.last_price(&self.config.symbol).await {
            Some(price) => price,
            None => {
                debug!("No last price for {}, waiting", self.config.symbol);
                return;
            }
        };

        let plan = plan_ladder(&self.config, current_price);
        for order in &plan.orders {
            info!(
                "submitting order: {}, upper={}, lower={}",
                order, plan.upper, plan.lower
            );
        }

        let created = match self.executor.submit_orders(&plan.orders).await {
            Ok(created) => created,
            Err(e) => {
                error!("can not place orders: {}", e);
                self.notifier
                    .notify(&format!("{}: failed to seed grid: {}", self.config.symbol, e));
                return;
            }
        };

        plan.commit(&mut core.state);
        core.active_orders.add(created);

        info!(
            "Grid seeded at {}: {} sells, {} buys, seed buy {}",
            current_price, plan.upper, plan.lower, plan.seed_quantity
        );
        self.notifier.notify(&format!(
            "{}: grid seeded at {} with {} sell and {} buy rungs",
            self.config.symbol, current_price, plan.upper, plan.lower
        ));
    }

    /// Dispatch one order snapshot from the order-update stream
    pub async fn handle_order_update(&self, order: Order) {
        if order.symbol != self.config.symbol {
            return;
        }

        info!("order update: {}", order);
        self.notifier.notify(&format!("order update: {}", order));

        let mut core = self.core.lock().await;
        match order.status {
            OrderStatus::New | OrderStatus::PartiallyFilled => {
                if !core.active_orders.update(order) {
                    debug!("order update for an order this grid did not place, ignored");
                }
            }
            OrderStatus::Filled => {
                core.active_orders.remove(&order);
                self.submit_follow_up(&mut core, &order).await;
            }
            OrderStatus::Canceled | OrderStatus::Rejected => {
                info!(
                    "order status {:?}, removing {} from the active order pool...",
                    order.status, order.id
                );
                core.active_orders.remove(&order);
            }
        }
    }

    /// Compute and submit the follow-up batch for a filled order
    ///
    /// Occupancy is updated before submission and is not rolled back if the
    /// submission fails.
    async fn submit_follow_up(&self, core: &mut GridCore, filled: &Order) {
        let orders = follow_up_orders(filled, &self.config, &mut core.state);
        if orders.is_empty() {
            return;
        }

        debug!("fill {} produced {} order(s)", filled.id, orders.len());
        for order in &orders {
            info!(
                "submitting order: {}, upper={}, lower={}",
                order, core.state.upper_occupancy, core.state.lower_occupancy
            );
        }

        match self.executor.submit_orders(&orders).await {
            Ok(created) => core.active_orders.add(created),
            Err(e) => {
                error!("can not place orders: {}", e);
                self.notifier.notify(&format!(
                    "{}: dropped {} follow-up order(s) after fill {}: {}",
                    self.config.symbol,
                    orders.len(),
                    filled.id,
                    e
                ));
            }
        }
    }

    /// Cancel everything still tracked as active
    pub async fn cancel_all(&self) {
        cancel_active_orders(&self.core, self.executor.as_ref()).await;
    }
}

async fn cancel_active_orders(core: &Mutex<GridCore>, executor: &dyn OrderExecutor) {
    let mut core = core.lock().await;
    let orders = core.active_orders.orders();
    if orders.is_empty() {
        return;
    }

    info!("canceling {} active orders...", orders.len());
    match executor.cancel_orders(&orders).await {
        Ok(()) => core.active_orders.clear(),
        Err(e) => error!("cancel order error: {}", e),
    }
}

#[async_trait]
impl Strategy for InfiniteGridStrategy {
    fn name(&self) -> &str {
        STRATEGY_NAME
    }

    fn symbol(&self) -> &str {
        &self.config.symbol
    }

    fn subscribe(&self, session: &dyn Session) {
        session.subscribe(Subscription::kline(&self.config.symbol, KLINE_INTERVAL));
    }

    async fn on_connect(&self) {
        self.seed().await;
    }

    async fn on_order_update(&self, order: Order) {
        self.handle_order_update(order).await;
    }
}

/// Builds [`InfiniteGridStrategy`] instances from strategy params
pub struct InfiniteGridFactory;

impl StrategyFactory for InfiniteGridFactory {
    fn create(
        &self,
        symbol: &str,
        params: &HashMap<String, Value>,
        ports: StrategyPorts,
    ) -> GridResult<Arc<dyn Strategy>> {
        let config = GridConfig::from_params(symbol, params)?;
        if config.grid_count % 2 != 0 {
            warn!(
                "grid_count {} is odd, placing {} rungs per side",
                config.grid_count,
                config.levels_per_side()
            );
        }
        Ok(Arc::new(InfiniteGridStrategy::new(config, ports)?))
    }
}

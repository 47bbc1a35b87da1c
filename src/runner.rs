use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, info, warn};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::Settings;
use crate::grid::{GracefulShutdown, GridResult, HostEvent, LogNotifier, StrategyPorts};
use crate::market::{PaperExchange, PaperExchangeInput, PriceTape};
use crate::strategy::{Strategy, StrategyRegistry};

/// Outcome of a paper run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunSummary {
    /// Tape prices published
    pub ticks: usize,
    /// Orders filled by the paper book
    pub fills: usize,
    /// Orders still resting after shutdown
    pub resting: usize,
}

/// Runner for the trading bot
pub struct BotRunner {
    config: Settings,
    registry: StrategyRegistry,
}

impl BotRunner {
    /// Create a new runner from a configuration file
    pub fn new(config_path: impl AsRef<Path>, registry: StrategyRegistry) -> GridResult<Self> {
        let config = Settings::new(config_path)?;
        Ok(Self::from_settings(config, registry))
    }

    pub fn from_settings(config: Settings, registry: StrategyRegistry) -> Self {
        Self { config, registry }
    }

    /// Run the configured strategy against the paper host until the tape ends
    pub async fn run(self) -> GridResult<RunSummary> {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&self.config.log.level))
            .try_init()
            .ok();

        info!("Starting BotRunner...");

        let paper = &self.config.paper;
        let tape = PriceTape::load(&paper.price_file)?;
        info!("Loaded {} prices from {}", tape.len(), paper.price_file.display());

        let (exchange, events) = PaperExchange::new(PaperExchangeInput::new(
            &paper.quote_currency,
            paper.initial_balance,
        ));
        let exchange = Arc::new(exchange);
        let shutdown = Arc::new(GracefulShutdown::new());
        let ports = StrategyPorts {
            market: exchange.clone(),
            executor: exchange.clone(),
            notifier: Arc::new(LogNotifier),
            shutdown: shutdown.clone(),
        };

        // The paper account's currency gates seeding unless the strategy overrides it.
        let strategy_config = &self.config.strategy;
        let mut params = strategy_config.params.clone();
        params
            .entry("quote_currency".to_string())
            .or_insert_with(|| Value::from(paper.quote_currency.clone()));

        let strategy = self.registry.create_strategy(
            &strategy_config.type_name,
            &strategy_config.symbol,
            &params,
            ports,
        )?;
        info!("Strategy '{}' initialized for {}", strategy.name(), strategy.symbol());

        let tick = Duration::from_millis(paper.tick_interval_ms.max(1));
        let summary = run_tape(strategy.as_ref(), &exchange, events, &shutdown, tape, tick).await?;

        info!(
            "Run finished: {} ticks, {} fills, {} orders resting",
            summary.ticks, summary.fills, summary.resting
        );
        Ok(summary)
    }
}

/// Deliver one host event to the strategy
pub async fn dispatch(strategy: &dyn Strategy, event: HostEvent) {
    match event {
        HostEvent::Connected => strategy.on_connect().await,
        HostEvent::OrderUpdate(order) => strategy.on_order_update(order).await,
    }
}

/// Drive `strategy` through a full paper session
///
/// Subscribes, publishes the first tape price, connects, then publishes one
/// price per tick. Events are drained before each new price so the strategy
/// sees every fill in order. Ends at the tape end or on Ctrl-C, after which
/// the shutdown hooks run.
pub async fn run_tape(
    strategy: &dyn Strategy,
    exchange: &PaperExchange,
    mut events: UnboundedReceiver<HostEvent>,
    shutdown: &GracefulShutdown,
    tape: PriceTape,
    tick: Duration,
) -> GridResult<RunSummary> {
    let symbol = strategy.symbol().to_string();
    let mut summary = RunSummary::default();

    strategy.subscribe(exchange);

    let mut prices = tape.into_iter();
    if let Some(price) = prices.next() {
        summary.fills += exchange.update_price(&symbol, price).await?;
        summary.ticks += 1;
    }
    exchange.connect()?;

    let mut ticker = interval(tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            biased;

            Some(event) = events.recv() => {
                dispatch(strategy, event).await;
            }
            _ = ticker.tick() => {
                match prices.next() {
                    Some(price) => {
                        debug!("tick {}: {} @ {}", summary.ticks, symbol, price);
                        summary.fills += exchange.update_price(&symbol, price).await?;
                        summary.ticks += 1;
                    }
                    None => {
                        info!("Price tape exhausted");
                        break;
                    }
                }
            }
            _ = &mut ctrl_c => {
                warn!("Ctrl-C received, shutting down");
                break;
            }
        }
    }

    drain(strategy, &mut events).await;
    shutdown.shutdown().await;
    drain(strategy, &mut events).await;

    summary.resting = exchange.resting_orders().await.len();
    Ok(summary)
}

async fn drain(strategy: &dyn Strategy, events: &mut UnboundedReceiver<HostEvent>) {
    while let Ok(event) = events.try_recv() {
        dispatch(strategy, event).await;
    }
}

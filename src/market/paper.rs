//! Paper Trading Host
//!
//! Simulates an exchange in memory: orders rest until the last price crosses
//! their limit, then fill completely at the limit price. Every order lifecycle
//! change is reported on an unbounded event channel, the same way a live
//! user-data stream would deliver it.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex as StdMutex;

use async_trait::async_trait;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;

use crate::grid::{
    GridError, GridResult, HostEvent, MarketData, Order, OrderExecutor, OrderSide, OrderStatus,
    Session, SubmitOrder, Subscription,
};

/// Input configuration for creating a [`PaperExchange`]
#[derive(Debug, Clone)]
pub struct PaperExchangeInput {
    /// Quote currency the account is funded in (e.g., "USDT")
    pub quote_currency: String,
    /// Initial quote balance
    pub initial_balance: Decimal,
}

impl PaperExchangeInput {
    pub fn new(quote_currency: &str, initial_balance: Decimal) -> Self {
        Self {
            quote_currency: quote_currency.to_string(),
            initial_balance,
        }
    }
}

#[derive(Debug, Default)]
struct PaperBook {
    prices: HashMap<String, Decimal>,
    balances: HashMap<String, Decimal>,
    resting: BTreeMap<u64, Order>,
}

impl PaperBook {
    /// Move balances for a completely filled order
    fn settle(&mut self, order: &Order, quote: &str) {
        let base = base_currency(&order.symbol, quote);
        let notional = order.price * order.quantity;
        let (quote_delta, base_delta) = match order.side {
            OrderSide::Buy => (-notional, order.quantity),
            OrderSide::Sell => (notional, -order.quantity),
        };
        *self.balances.entry(quote.to_string()).or_default() += quote_delta;
        *self.balances.entry(base).or_default() += base_delta;
    }
}

/// Base currency of a symbol quoted in `quote` ("BTCUSDT" -> "BTC")
fn base_currency(symbol: &str, quote: &str) -> String {
    symbol
        .strip_suffix(quote)
        .filter(|base| !base.is_empty())
        .unwrap_or(symbol)
        .to_string()
}

/// In-memory exchange implementing every strategy port
///
/// # Example
///
/// ```ignore
/// let (exchange, mut events) = PaperExchange::new(PaperExchangeInput::new("USDT", dec!(10000)));
/// exchange.update_price("BTCUSDT", dec!(100)).await?;
/// exchange.connect()?;
///
/// while let Some(event) = events.recv().await {
///     // dispatch to the strategy...
/// }
/// ```
pub struct PaperExchange {
    input: PaperExchangeInput,
    book: Mutex<PaperBook>,
    events: UnboundedSender<HostEvent>,
    subscriptions: StdMutex<Vec<Subscription>>,
    next_id: AtomicU64,
}

impl PaperExchange {
    /// Create the exchange and the receiving end of its event stream
    pub fn new(input: PaperExchangeInput) -> (Self, UnboundedReceiver<HostEvent>) {
        let (tx, rx) = unbounded_channel();

        let mut book = PaperBook::default();
        book.balances
            .insert(input.quote_currency.clone(), input.initial_balance);

        info!(
            "Paper exchange funded with {} {}",
            input.initial_balance, input.quote_currency
        );

        let exchange = Self {
            input,
            book: Mutex::new(book),
            events: tx,
            subscriptions: StdMutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        };
        (exchange, rx)
    }

    fn emit(&self, event: HostEvent) -> GridResult<()> {
        self.events
            .send(event)
            .map_err(|e| GridError::ChannelSend(e.to_string()))
    }

    /// Announce a (re)connection to the strategy
    pub fn connect(&self) -> GridResult<()> {
        info!("Paper session connected");
        self.emit(HostEvent::Connected)
    }

    /// Publish a new last price and fill every resting order it crosses
    ///
    /// Buys fill when the price is at or below their limit, sells when it is
    /// at or above. Returns the number of orders filled.
    pub async fn update_price(&self, symbol: &str, price: Decimal) -> GridResult<usize> {
        let mut book = self.book.lock().await;
        book.prices.insert(symbol.to_string(), price);

        let crossed: Vec<u64> = book
            .resting
            .values()
            .filter(|o| o.symbol == symbol)
            .filter(|o| match o.side {
                OrderSide::Buy => price <= o.price,
                OrderSide::Sell => price >= o.price,
            })
            .map(|o| o.id)
            .collect();

        for id in &crossed {
            if let Some(order) = book.resting.remove(id) {
                let filled = order.with_status(OrderStatus::Filled);
                book.settle(&filled, &self.input.quote_currency);
                debug!("paper fill at {}: {}", price, filled);
                self.emit(HostEvent::OrderUpdate(filled))?;
            }
        }

        Ok(crossed.len())
    }

    /// Orders currently resting on the book, by id
    pub async fn resting_orders(&self) -> Vec<Order> {
        self.book.lock().await.resting.values().cloned().collect()
    }

    /// Current balance of a currency (zero if never touched)
    pub async fn balance(&self, currency: &str) -> Decimal {
        self.book
            .lock()
            .await
            .balances
            .get(currency)
            .copied()
            .unwrap_or_default()
    }

    /// Subscriptions requested so far
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl MarketData for PaperExchange {
    async fn last_price(&self, symbol: &str) -> Option<Decimal> {
        self.book.lock().await.prices.get(symbol).copied()
    }

    async fn available_balance(&self, currency: &str) -> Option<Decimal> {
        self.book.lock().await.balances.get(currency).copied()
    }
}

#[async_trait]
impl OrderExecutor for PaperExchange {
    async fn submit_orders(&self, orders: &[SubmitOrder]) -> GridResult<Vec<Order>> {
        // Reject the whole batch before placing anything.
        if let Some(bad) = orders
            .iter()
            .find(|o| o.price <= Decimal::ZERO || o.quantity <= Decimal::ZERO)
        {
            return Err(GridError::Submission(format!("invalid order: {}", bad)));
        }

        let mut book = self.book.lock().await;
        let mut created = Vec::with_capacity(orders.len());
        for request in orders {
            let order = Order::from_request(self.next_id.fetch_add(1, Ordering::SeqCst), request);
            book.resting.insert(order.id, order.clone());
            self.emit(HostEvent::OrderUpdate(order.clone()))?;
            created.push(order);
        }

        debug!("paper book accepted {} order(s)", created.len());
        Ok(created)
    }

    async fn cancel_orders(&self, orders: &[Order]) -> GridResult<()> {
        let mut book = self.book.lock().await;
        for order in orders {
            match book.resting.remove(&order.id) {
                Some(resting) => {
                    self.emit(HostEvent::OrderUpdate(resting.with_status(OrderStatus::Canceled)))?;
                }
                None => warn!("cancel for unknown order {}", order.id),
            }
        }
        Ok(())
    }
}

impl Session for PaperExchange {
    fn subscribe(&self, subscription: Subscription) {
        info!(
            "subscribed to {:?} {} {}",
            subscription.channel, subscription.symbol, subscription.interval
        );
        self.subscriptions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(subscription);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn exchange() -> (PaperExchange, UnboundedReceiver<HostEvent>) {
        PaperExchange::new(PaperExchangeInput::new("USDT", dec!(10000)))
    }

    fn drain(rx: &mut UnboundedReceiver<HostEvent>) -> Vec<HostEvent> {
        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        events
    }

    #[tokio::test]
    async fn test_market_data() {
        let (exchange, _rx) = exchange();
        assert_eq!(exchange.last_price("BTCUSDT").await, None);
        assert_eq!(exchange.available_balance("USDT").await, Some(dec!(10000)));
        assert_eq!(exchange.available_balance("BTC").await, None);

        exchange.update_price("BTCUSDT", dec!(100)).await.unwrap();
        assert_eq!(exchange.last_price("BTCUSDT").await, Some(dec!(100)));
    }

    #[tokio::test]
    async fn test_submit_emits_new() {
        let (exchange, mut rx) = exchange();
        let created = exchange
            .submit_orders(&[
                SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1)),
                SubmitOrder::sell("BTCUSDT", dec!(101), dec!(1)),
            ])
            .await
            .unwrap();

        assert_eq!(created.len(), 2);
        assert_ne!(created[0].id, created[1].id);
        assert_eq!(exchange.resting_orders().await.len(), 2);

        let events = drain(&mut rx);
        assert_eq!(events.len(), 2);
        assert!(events
            .iter()
            .all(|e| matches!(e, HostEvent::OrderUpdate(o) if o.status == OrderStatus::New)));
    }

    #[tokio::test]
    async fn test_invalid_batch_places_nothing() {
        let (exchange, mut rx) = exchange();
        let result = exchange
            .submit_orders(&[
                SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1)),
                SubmitOrder::sell("BTCUSDT", dec!(101), dec!(0)),
            ])
            .await;

        assert!(matches!(result, Err(GridError::Submission(_))));
        assert!(exchange.resting_orders().await.is_empty());
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test]
    async fn test_price_cross_fills_and_settles() {
        let (exchange, mut rx) = exchange();
        exchange
            .submit_orders(&[
                SubmitOrder::buy("BTCUSDT", dec!(99), dec!(2)),
                SubmitOrder::sell("BTCUSDT", dec!(101), dec!(1)),
            ])
            .await
            .unwrap();
        drain(&mut rx);

        assert_eq!(exchange.update_price("BTCUSDT", dec!(100)).await.unwrap(), 0);
        assert_eq!(exchange.update_price("BTCUSDT", dec!(99)).await.unwrap(), 1);

        let events = drain(&mut rx);
        let filled = match &events[..] {
            [HostEvent::OrderUpdate(order)] => order.clone(),
            other => panic!("unexpected events: {:?}", other),
        };
        assert_eq!(filled.status, OrderStatus::Filled);
        assert_eq!(filled.side, OrderSide::Buy);
        assert_eq!(filled.executed_quantity, dec!(2));

        assert_eq!(exchange.balance("USDT").await, dec!(9802));
        assert_eq!(exchange.balance("BTC").await, dec!(2));

        assert_eq!(exchange.update_price("BTCUSDT", dec!(102)).await.unwrap(), 1);
        assert_eq!(exchange.balance("USDT").await, dec!(9903));
        assert_eq!(exchange.balance("BTC").await, dec!(1));
        assert!(exchange.resting_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_other_symbol_does_not_fill() {
        let (exchange, _rx) = exchange();
        exchange
            .submit_orders(&[SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1))])
            .await
            .unwrap();

        assert_eq!(exchange.update_price("ETHUSDT", dec!(1)).await.unwrap(), 0);
        assert_eq!(exchange.resting_orders().await.len(), 1);
    }

    #[tokio::test]
    async fn test_cancel_emits_canceled() {
        let (exchange, mut rx) = exchange();
        let created = exchange
            .submit_orders(&[SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1))])
            .await
            .unwrap();
        drain(&mut rx);

        exchange.cancel_orders(&created).await.unwrap();
        // Unknown ids are tolerated.
        exchange.cancel_orders(&created).await.unwrap();

        let events = drain(&mut rx);
        assert_eq!(events.len(), 1);
        assert!(matches!(&events[0], HostEvent::OrderUpdate(o) if o.status == OrderStatus::Canceled));
        assert!(exchange.resting_orders().await.is_empty());
    }

    #[tokio::test]
    async fn test_connect_and_subscribe() {
        let (exchange, mut rx) = exchange();
        exchange.subscribe(Subscription::kline("BTCUSDT", "1m"));
        exchange.connect().unwrap();

        assert_eq!(exchange.subscriptions().len(), 1);
        assert!(matches!(&drain(&mut rx)[..], [HostEvent::Connected]));
    }

    #[test]
    fn test_base_currency() {
        assert_eq!(base_currency("BTCUSDT", "USDT"), "BTC");
        assert_eq!(base_currency("USDT", "USDT"), "USDT");
        assert_eq!(base_currency("BTC-PERP", "USDT"), "BTC-PERP");
    }
}

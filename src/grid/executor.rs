//! Host-facing ports for grid trading - enables mocking for tests

use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use super::errors::GridResult;
use super::shutdown::ShutdownRegistrar;
use super::types::{Order, SubmitOrder, Subscription};

/// Read-only market and account queries
#[async_trait]
pub trait MarketData: Send + Sync {
    /// Last traded price, if one is known yet
    async fn last_price(&self, symbol: &str) -> Option<Decimal>;

    /// Available (unlocked) balance of a currency, if the account holds it
    async fn available_balance(&self, currency: &str) -> Option<Decimal>;
}

/// Order submission and cancellation
#[async_trait]
pub trait OrderExecutor: Send + Sync {
    /// Submit a batch of limit orders
    ///
    /// All-or-nothing from the caller's view: either every order is created
    /// and returned, or an error is returned and nothing is assumed placed.
    async fn submit_orders(&self, orders: &[SubmitOrder]) -> GridResult<Vec<Order>>;

    /// Cancel the given orders
    async fn cancel_orders(&self, orders: &[Order]) -> GridResult<()>;
}

/// Market-data session owned by the host
pub trait Session: Send + Sync {
    fn subscribe(&self, subscription: Subscription);
}

/// Outbound notifications (chat, alerts, ...)
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str);
}

/// Notifier that writes to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, message: &str) {
        log::info!("[notify] {}", message);
    }
}

/// Everything a strategy needs from its host, injected at construction
#[derive(Clone)]
pub struct StrategyPorts {
    pub market: Arc<dyn MarketData>,
    pub executor: Arc<dyn OrderExecutor>,
    pub notifier: Arc<dyn Notifier>,
    pub shutdown: Arc<dyn ShutdownRegistrar>,
}

// ============================================================================
// Mock Implementation for Testing
// ============================================================================

/// Mock host for testing strategies without an exchange connection.
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU64, Ordering};
    use tokio::sync::Mutex;

    use crate::grid::errors::GridError;
    use crate::grid::shutdown::GracefulShutdown;

    /// Mock exchange for testing
    pub struct MockExchange {
        /// Every batch accepted by `submit_orders`
        pub batches: Arc<Mutex<Vec<Vec<SubmitOrder>>>>,
        /// Every order passed to `cancel_orders`
        pub cancelled: Arc<Mutex<Vec<Order>>>,
        pub last_price: Arc<Mutex<Option<Decimal>>>,
        pub balances: Arc<Mutex<HashMap<String, Decimal>>>,
        pub should_fail: Arc<Mutex<bool>>,
        pub should_fail_cancel: Arc<Mutex<bool>>,
        pub subscriptions: Arc<std::sync::Mutex<Vec<Subscription>>>,
        next_id: AtomicU64,
    }

    impl MockExchange {
        /// Mock with a known price and a quote balance in `currency`
        pub fn new(last_price: Decimal, currency: &str, balance: Decimal) -> Self {
            let mut balances = HashMap::new();
            balances.insert(currency.to_string(), balance);
            Self {
                batches: Arc::new(Mutex::new(Vec::new())),
                cancelled: Arc::new(Mutex::new(Vec::new())),
                last_price: Arc::new(Mutex::new(Some(last_price))),
                balances: Arc::new(Mutex::new(balances)),
                should_fail: Arc::new(Mutex::new(false)),
                should_fail_cancel: Arc::new(Mutex::new(false)),
                subscriptions: Arc::new(std::sync::Mutex::new(Vec::new())),
                next_id: AtomicU64::new(1),
            }
        }

        pub async fn set_last_price(&self, price: Option<Decimal>) {
            *self.last_price.lock().await = price;
        }

        pub async fn set_balance(&self, currency: &str, balance: Decimal) {
            self.balances.lock().await.insert(currency.to_string(), balance);
        }

        pub async fn set_should_fail(&self, fail: bool) {
            *self.should_fail.lock().await = fail;
        }

        pub async fn set_should_fail_cancel(&self, fail: bool) {
            *self.should_fail_cancel.lock().await = fail;
        }

        /// Number of `submit_orders` calls that succeeded
        pub async fn batch_count(&self) -> usize {
            self.batches.lock().await.len()
        }

        /// All submitted orders, flattened in submission order
        pub async fn submitted(&self) -> Vec<SubmitOrder> {
            self.batches.lock().await.iter().flatten().cloned().collect()
        }

        /// The most recent accepted batch
        pub async fn last_batch(&self) -> Option<Vec<SubmitOrder>> {
            self.batches.lock().await.last().cloned()
        }
    }

    #[async_trait]
    impl MarketData for MockExchange {
        async fn last_price(&self, _symbol: &str) -> Option<Decimal> {
            *self.last_price.lock().await
        }

        async fn available_balance(&self, currency: &str) -> Option<Decimal> {
            self.balances.lock().await.get(currency).copied()
        }
    }

    #[async_trait]
    impl OrderExecutor for MockExchange {
        async fn submit_orders(&self, orders: &[SubmitOrder]) -> GridResult<Vec<Order>> {
            if *self.should_fail.lock().await {
                return Err(GridError::Submission("Mock failure".into()));
            }

            self.batches.lock().await.push(orders.to_vec());
            Ok(orders
                .iter()
                .map(|o| Order::from_request(self.next_id.fetch_add(1, Ordering::SeqCst), o))
                .collect())
        }

        async fn cancel_orders(&self, orders: &[Order]) -> GridResult<()> {
            if *self.should_fail_cancel.lock().await {
                return Err(GridError::Cancellation("Mock failure".into()));
            }

            self.cancelled.lock().await.extend(orders.iter().cloned());
            Ok(())
        }
    }

    impl Session for MockExchange {
        fn subscribe(&self, subscription: Subscription) {
            self.subscriptions
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(subscription);
        }
    }

    /// Notifier that keeps every message for assertions
    #[derive(Default)]
    pub struct RecordingNotifier {
        pub messages: std::sync::Mutex<Vec<String>>,
    }

    impl RecordingNotifier {
        pub fn messages(&self) -> Vec<String> {
            self.messages.lock().unwrap_or_else(|e| e.into_inner()).clone()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, message: &str) {
            self.messages
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push(message.to_string());
        }
    }

    /// Ports wired to a mock exchange, a recording notifier and a fresh shutdown registrar
    pub fn mock_ports(
        exchange: Arc<MockExchange>,
    ) -> (StrategyPorts, Arc<RecordingNotifier>, Arc<GracefulShutdown>) {
        let notifier = Arc::new(RecordingNotifier::default());
        let shutdown = Arc::new(GracefulShutdown::new());
        let ports = StrategyPorts {
            market: exchange.clone(),
            executor: exchange,
            notifier: notifier.clone(),
            shutdown: shutdown.clone(),
        };
        (ports, notifier, shutdown)
    }
}

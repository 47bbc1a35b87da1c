//! Core data types for grid trading

use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Order side for grid rungs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    Buy,
    Sell,
}

impl OrderSide {
    /// Returns the opposite side
    pub fn reverse(&self) -> Self {
        match self {
            OrderSide::Buy => OrderSide::Sell,
            OrderSide::Sell => OrderSide::Buy,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderSide::Buy => "BUY",
            OrderSide::Sell => "SELL",
        }
    }
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Order status as reported by the order-update stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Accepted and resting on the book
    New,
    /// Some quantity executed, remainder still resting
    PartiallyFilled,
    /// Fully executed
    Filled,
    /// Cancelled by us or by the venue
    Canceled,
    /// Refused by the venue
    Rejected,
}

impl OrderStatus {
    /// Check if the order is still resting (new or partially filled)
    pub fn is_active(&self) -> bool {
        matches!(self, OrderStatus::New | OrderStatus::PartiallyFilled)
    }

    /// Check if no further updates are expected for the order
    pub fn is_terminal(&self) -> bool {
        !self.is_active()
    }
}

/// Request to place one GTC limit order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOrder {
    /// Instrument identifier
    pub symbol: String,
    /// Order side
    pub side: OrderSide,
    /// Limit price
    pub price: Decimal,
    /// Base quantity
    pub quantity: Decimal,
    /// Client-side identifier, echoed back on the created order
    pub client_order_id: String,
}

impl SubmitOrder {
    /// Create a new limit order request with a fresh client order id
    pub fn limit(symbol: impl Into<String>, side: OrderSide, price: Decimal, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.into(),
            side,
            price,
            quantity,
            client_order_id: uuid::Uuid::new_v4().to_string(),
        }
    }

    pub fn buy(symbol: impl Into<String>, price: Decimal, quantity: Decimal) -> Self {
        Self::limit(symbol, OrderSide::Buy, price, quantity)
    }

    pub fn sell(symbol: impl Into<String>, price: Decimal, quantity: Decimal) -> Self {
        Self::limit(symbol, OrderSide::Sell, price, quantity)
    }

    /// Quote value of the order (price * quantity)
    pub fn notional(&self) -> Decimal {
        self.price * self.quantity
    }
}

impl fmt::Display for SubmitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} @ {} GTC",
            self.symbol,
            self.side,
            self.quantity.normalize(),
            self.price.normalize()
        )
    }
}

/// Order snapshot as observed from the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Exchange order ID
    pub id: u64,
    /// Client order ID from the originating request
    pub client_order_id: String,
    pub symbol: String,
    pub side: OrderSide,
    /// Limit price
    pub price: Decimal,
    /// Original order quantity
    pub quantity: Decimal,
    /// Quantity executed so far
    pub executed_quantity: Decimal,
    pub status: OrderStatus,
    /// Time of the last status change
    pub update_time: DateTime<Utc>,
}

impl Order {
    /// Build a freshly accepted order from its request
    pub fn from_request(id: u64, request: &SubmitOrder) -> Self {
        Self {
            id,
            client_order_id: request.client_order_id.clone(),
            symbol: request.symbol.clone(),
            side: request.side,
            price: request.price,
            quantity: request.quantity,
            executed_quantity: Decimal::ZERO,
            status: OrderStatus::New,
            update_time: Utc::now(),
        }
    }

    /// Copy of this order with a new status
    pub fn with_status(&self, status: OrderStatus) -> Self {
        let mut order = self.clone();
        order.status = status;
        if status == OrderStatus::Filled {
            order.executed_quantity = order.quantity;
        }
        order.update_time = Utc::now();
        order
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} {} {} {} @ {} {:?}",
            self.id,
            self.symbol,
            self.side,
            self.quantity.normalize(),
            self.price.normalize(),
            self.status
        )
    }
}

/// Market-data channel a strategy can subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Channel {
    KLine,
}

/// Market-data subscription request sent to the host session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub channel: Channel,
    pub symbol: String,
    /// Candle interval, e.g. "1m"
    pub interval: String,
}

impl Subscription {
    pub fn kline(symbol: impl Into<String>, interval: impl Into<String>) -> Self {
        Self {
            channel: Channel::KLine,
            symbol: symbol.into(),
            interval: interval.into(),
        }
    }
}

/// Events delivered by the host to a running strategy
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// A (re)connection to the exchange succeeded
    Connected,
    /// An order snapshot from the order-update stream
    OrderUpdate(Order),
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_side_reverse() {
        assert_eq!(OrderSide::Buy.reverse(), OrderSide::Sell);
        assert_eq!(OrderSide::Sell.reverse(), OrderSide::Buy);
    }

    #[test]
    fn test_status_classification() {
        assert!(OrderStatus::New.is_active());
        assert!(OrderStatus::PartiallyFilled.is_active());
        assert!(OrderStatus::Filled.is_terminal());
        assert!(OrderStatus::Canceled.is_terminal());
        assert!(OrderStatus::Rejected.is_terminal());
    }

    #[test]
    fn test_order_from_request() {
        let request = SubmitOrder::sell("BTCUSDT", dec!(101), dec!(0.5));
        let order = Order::from_request(7, &request);

        assert_eq!(order.id, 7);
        assert_eq!(order.client_order_id, request.client_order_id);
        assert_eq!(order.status, OrderStatus::New);
        assert_eq!(order.executed_quantity, Decimal::ZERO);

        let filled = order.with_status(OrderStatus::Filled);
        assert_eq!(filled.executed_quantity, dec!(0.5));
        assert_eq!(request.notional(), dec!(50.5));
    }

    #[test]
    fn test_client_order_ids_are_unique() {
        let a = SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1));
        let b = SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1));
        assert_ne!(a.client_order_id, b.client_order_id);
    }

    #[test]
    fn test_order_json_keeps_update_time() {
        let order = Order::from_request(3, &SubmitOrder::buy("BTCUSDT", dec!(99), dec!(1)))
            .with_status(OrderStatus::PartiallyFilled);

        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["status"], "PartiallyFilled");
        assert!(json["update_time"].is_string());

        let back: Order = serde_json::from_value(json).unwrap();
        assert_eq!(back, order);
    }

    #[test]
    fn test_display() {
        let request = SubmitOrder::buy("BTCUSDT", dec!(98.0100), dec!(1.00));
        assert_eq!(request.to_string(), "BTCUSDT BUY 1 @ 98.01 GTC");
    }
}

//! Replacement and replenishment orders for filled rungs

use log::debug;

use super::config::GridConfig;
use super::planner::geometric_price;
use super::state::GridState;
use super::types::{Order, OrderSide, SubmitOrder};

/// Low-water mark: a side at or below this many rungs gets widened
pub const EARLY_PLACED_COUNT: u32 = 2;

/// Whether a fill belongs to the one-time seed buy
///
/// Only a configured `initial_order_quantity` identifies the seed. A seed sized
/// by the derived formula is indistinguishable from a rung and is replaced.
pub fn is_seed_fill(filled: &Order, config: &GridConfig) -> bool {
    config
        .initial_order_quantity
        .is_some_and(|seed| filled.quantity == seed)
}

/// Compute the one-step replacement for a filled rung
///
/// Places the reverse side one margin step away from the fill price and
/// updates occupancy. Returns `None` (with no state change) when the
/// replacement would be a buy below the floor.
pub fn replacement_order(
    filled: &Order,
    config: &GridConfig,
    state: &mut GridState,
) -> Option<SubmitOrder> {
    let side = filled.side.reverse();

    let price = match side {
        OrderSide::Sell => filled.price * config.up_ratio(),
        OrderSide::Buy => filled.price * config.down_ratio(),
    };

    if side == OrderSide::Buy && price < config.floor_price {
        debug!(
            "replacement buy at {} is below floor {}, dropped",
            price, config.floor_price
        );
        return None;
    }

    let quantity = if config.long_mode {
        match side {
            OrderSide::Buy => filled.price * filled.quantity / price,
            OrderSide::Sell => config.quantity,
        }
    } else {
        filled.quantity
    };

    match side {
        OrderSide::Sell => {
            state.add_upper(1);
            state.remove_lower();
        }
        OrderSide::Buy => {
            state.remove_upper();
            state.add_lower(1);
        }
    }

    Some(SubmitOrder::limit(&config.symbol, side, price, quantity))
}

/// Extra rungs placed beyond the replacement when the fill's side runs low
///
/// Sell fills widen the sell side once `upper_occupancy` is at or below
/// [`EARLY_PLACED_COUNT`]; buy fills widen the buy side likewise, stopping at
/// the first price below the floor.
pub fn replenishment_orders(
    filled: &Order,
    config: &GridConfig,
    state: &mut GridState,
) -> Vec<SubmitOrder> {
    let mut orders = Vec::new();

    match filled.side {
        OrderSide::Sell if state.upper_occupancy <= EARLY_PLACED_COUNT => {
            for i in 1..=config.count_of_more_orders {
                let price = geometric_price(filled.price, config.up_ratio(), i + EARLY_PLACED_COUNT);
                orders.push(SubmitOrder::sell(&config.symbol, price, config.quantity));
                state.add_upper(1);
            }
        }
        OrderSide::Buy if state.lower_occupancy <= EARLY_PLACED_COUNT => {
            for i in 1..=config.count_of_more_orders {
                let price =
                    geometric_price(filled.price, config.down_ratio(), i + EARLY_PLACED_COUNT);
                if price < config.floor_price {
                    break;
                }
                orders.push(SubmitOrder::buy(&config.symbol, price, config.quantity));
                state.add_lower(1);
            }
        }
        _ => {}
    }

    orders
}

/// Full follow-up batch for a filled order
///
/// Seed fills produce nothing, and neither does a fill whose replacement buy
/// would sit below the floor. Otherwise the batch is the replacement followed
/// by any low-water rungs. Occupancy in `state` reflects every order in the
/// returned batch.
pub fn follow_up_orders(filled: &Order, config: &GridConfig, state: &mut GridState) -> Vec<SubmitOrder> {
    if is_seed_fill(filled, config) {
        debug!("seed order {} filled, no replacement", filled.id);
        return Vec::new();
    }

    let Some(replacement) = replacement_order(filled, config, state) else {
        return Vec::new();
    };

    let mut orders = vec![replacement];
    orders.extend(replenishment_orders(filled, config, state));
    orders
}

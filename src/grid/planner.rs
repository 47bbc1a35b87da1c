//! Initial ladder computation

use rust_decimal::Decimal;

use super::config::GridConfig;
use super::state::GridState;
use super::types::SubmitOrder;

/// `price * ratio^exponent`, stepped one multiplication at a time
pub fn geometric_price(price: Decimal, ratio: Decimal, exponent: u32) -> Decimal {
    (0..exponent).fold(price, |p, _| p * ratio)
}

/// A seed ladder ready to submit
///
/// Occupancy is only applied to [`GridState`] via [`LadderPlan::commit`], after
/// the batch has been accepted by the exchange.
#[derive(Debug, Clone, PartialEq)]
pub struct LadderPlan {
    /// Seed buy first, then sells (ascending), then buys (descending)
    pub orders: Vec<SubmitOrder>,
    /// Sell rungs in the plan
    pub upper: u32,
    /// Buy rungs in the plan (may be fewer than requested due to the floor)
    pub lower: u32,
    /// Quantity of the seed buy
    pub seed_quantity: Decimal,
    /// Budget snapshot for the state
    pub allocated_value: Decimal,
}

impl LadderPlan {
    /// The one-time seed buy
    pub fn seed_order(&self) -> &SubmitOrder {
        &self.orders[0]
    }

    /// The rungs excluding the seed buy
    pub fn rungs(&self) -> &[SubmitOrder] {
        &self.orders[1..]
    }

    /// Record the plan in the grid state
    pub fn commit(&self, state: &mut GridState) {
        state.total_allocated_value = self.allocated_value;
        state.add_upper(self.upper);
        state.add_lower(self.lower);
    }
}

/// Compute the initial ladder around `current_price`
///
/// One seed buy at `current_price`, `grid_count/2` sells stepped up by
/// `(1+margin)^i`, and up to `grid_count/2` buys stepped down by
/// `(1-margin)^i`. The buy side stops at the first price below the floor.
pub fn plan_ladder(config: &GridConfig, current_price: Decimal) -> LadderPlan {
    let levels = config.levels_per_side();
    let seed_quantity = config.seed_quantity();

    let mut orders = Vec::with_capacity(1 + 2 * levels as usize);
    orders.push(SubmitOrder::buy(&config.symbol, current_price, seed_quantity));

    let mut upper = 0;
    let mut price = current_price;
    for _ in 1..=levels {
        price *= config.up_ratio();
        orders.push(SubmitOrder::sell(&config.symbol, price, config.quantity));
        upper += 1;
    }

    let mut lower = 0;
    let mut price = current_price;
    for _ in 1..=levels {
        price *= config.down_ratio();
        if price < config.floor_price {
            break;
        }
        orders.push(SubmitOrder::buy(&config.symbol, price, config.quantity));
        lower += 1;
    }

    LadderPlan {
        orders,
        upper,
        lower,
        seed_quantity,
        allocated_value: config.budget,
    }
}

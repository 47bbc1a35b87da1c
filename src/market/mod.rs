//! Market Hosts
//!
//! Hosts own the exchange connection and drive a strategy through the
//! [`grid`](crate::grid) ports. The paper host replays a recorded price tape
//! against an in-memory order book, which is enough to run the grid end to end
//! without touching a real venue.

mod paper;
mod tape;

pub use paper::{PaperExchange, PaperExchangeInput};
pub use tape::PriceTape;

#![deny(unreachable_pub)]
pub mod config;
pub mod grid;
pub mod market;
pub mod runner;
pub mod strategy;

pub use config::Settings;
pub use grid::{GridError, GridResult};
pub use runner::{BotRunner, RunSummary};

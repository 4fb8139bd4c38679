//! Exchange access
//!
//! The engine talks to the exchange only through [`Exchange`]. Two
//! implementations ship with the crate: a blocking REST client for the
//! trading simulator and an in-memory paper exchange.

mod paper;
mod rest;

pub use paper::PaperExchange;
pub use rest::RestExchange;

use crate::Result;
use crate::market_data::{MarketOrder, NewsItem, Quote};
use serde::{Deserialize, Serialize};

/// Blocking exchange collaborator
///
/// Every call is a round trip and may fail with [`crate::Error::Transport`].
/// Implementations hold no cache; each call reflects the exchange's current
/// state.
pub trait Exchange {
    /// Current simulated time step
    fn get_tick(&self) -> Result<u32>;

    /// Top of book; fails if either side is empty
    fn get_quote(&self, ticker: &str) -> Result<Quote>;

    /// Signed net position
    fn get_position(&self, ticker: &str) -> Result<i64>;

    /// News items, optionally only those after `since`
    fn get_news(&self, since: Option<u64>) -> Result<Vec<NewsItem>>;

    /// Submit a market order; returns once acknowledged
    fn submit_market_order(&self, order: &MarketOrder) -> Result<()>;
}

/// REST connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// API root, e.g. `http://localhost:9999/v1`
    pub base_url: String,

    /// Sent as `X-API-Key`
    pub api_key: String,

    /// Per-request timeout; `None` waits indefinitely
    pub timeout_ms: Option<u64>,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:9999/v1".to_string(),
            api_key: String::new(),
            timeout_ms: None,
        }
    }
}

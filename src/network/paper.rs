//! In-memory exchange with exact fills

use crate::market_data::{MarketOrder, NewsItem, Quote};
use crate::network::Exchange;
use crate::{Error, Result};
use ahash::{AHashMap, AHashSet};
use parking_lot::RwLock;

#[derive(Default)]
struct PaperState {
    tick: u32,
    tick_step: u32,
    quotes: AHashMap<String, Quote>,
    positions: AHashMap<String, i64>,
    news: Vec<NewsItem>,
    orders: Vec<MarketOrder>,
    rejected: AHashSet<String>,
    requests: usize,
}

/// Paper exchange
///
/// Orders fill immediately at the requested quantity and move positions.
/// Every call counts as one request so tests can check round trips.
pub struct PaperExchange {
    state: RwLock<PaperState>,
}

impl PaperExchange {
    /// Start at `tick` with no quotes or positions
    pub fn new(tick: u32) -> Self {
        Self {
            state: RwLock::new(PaperState {
                tick,
                ..Default::default()
            }),
        }
    }

    /// Advance the tick by `step` after every `get_tick`
    pub fn with_tick_step(self, step: u32) -> Self {
        self.state.write().tick_step = step;
        self
    }

    pub fn set_quote(&self, ticker: &str, bid_price: f64, ask_price: f64) {
        self.state
            .write()
            .quotes
            .insert(ticker.to_string(), Quote::new(ticker, bid_price, ask_price));
    }

    /// Remove both sides of a book
    pub fn clear_quote(&self, ticker: &str) {
        self.state.write().quotes.remove(ticker);
    }

    pub fn set_position(&self, ticker: &str, position: i64) {
        self.state
            .write()
            .positions
            .insert(ticker.to_string(), position);
    }

    pub fn position(&self, ticker: &str) -> i64 {
        self.state
            .read()
            .positions
            .get(ticker)
            .copied()
            .unwrap_or(0)
    }

    /// Publish a news item with the next id
    pub fn publish_news(&self, headline: &str, body: &str) {
        let mut state = self.state.write();
        let id = state.news.len() as u64 + 1;
        state.news.push(NewsItem::new(id, headline, body));
    }

    /// Reject any order for `ticker` with a transport error
    pub fn reject_orders_for(&self, ticker: &str) {
        self.state.write().rejected.insert(ticker.to_string());
    }

    /// Every order accepted so far
    pub fn orders(&self) -> Vec<MarketOrder> {
        self.state.read().orders.clone()
    }

    /// Accepted orders for one ticker
    pub fn orders_for(&self, ticker: &str) -> Vec<MarketOrder> {
        self.state
            .read()
            .orders
            .iter()
            .filter(|o| o.ticker == ticker)
            .cloned()
            .collect()
    }

    /// Forget accepted orders (positions are kept)
    pub fn clear_orders(&self) {
        self.state.write().orders.clear();
    }

    /// Number of calls served
    pub fn request_count(&self) -> usize {
        self.state.read().requests
    }
}

impl Exchange for PaperExchange {
    fn get_tick(&self) -> Result<u32> {
        let mut state = self.state.write();
        state.requests += 1;
        let tick = state.tick;
        state.tick = tick.saturating_add(state.tick_step);
        Ok(tick)
    }

    fn get_quote(&self, ticker: &str) -> Result<Quote> {
        let mut state = self.state.write();
        state.requests += 1;
        state
            .quotes
            .get(ticker)
            .cloned()
            .ok_or_else(|| Error::MarketData(format!("{} book is empty", ticker)))
    }

    fn get_position(&self, ticker: &str) -> Result<i64> {
        let mut state = self.state.write();
        state.requests += 1;
        Ok(state.positions.get(ticker).copied().unwrap_or(0))
    }

    fn get_news(&self, since: Option<u64>) -> Result<Vec<NewsItem>> {
        let mut state = self.state.write();
        state.requests += 1;
        let since = since.unwrap_or(0);
        // Newest first, as the simulator returns them
        Ok(state
            .news
            .iter()
            .rev()
            .filter(|n| n.news_id > since)
            .cloned()
            .collect())
    }

    fn submit_market_order(&self, order: &MarketOrder) -> Result<()> {
        let mut state = self.state.write();
        state.requests += 1;

        if state.rejected.contains(&order.ticker) {
            return Err(Error::Transport(format!("order rejected: {}", order)));
        }
        if order.quantity == 0 {
            return Err(Error::Transport(format!("zero quantity: {}", order)));
        }

        *state.positions.entry(order.ticker.clone()).or_insert(0) += order.signed_quantity();
        state.orders.push(order.clone());
        Ok(())
    }
}

use crate::market_data::Quote;
use serde::{Deserialize, Serialize};

/// Annualized time remaining in the session
///
/// (session_ticks − tick) / ticks_per_year, floored at `min_time` so the
/// pricing model never sees a zero horizon.
#[inline]
pub fn time_to_expiry(tick: u32, session_ticks: u32, ticks_per_year: f64, min_time: f64) -> f64 {
    let remaining = session_ticks.saturating_sub(tick) as f64;
    (remaining / ticks_per_year).max(min_time)
}

/// Inputs shared by every pricing call in one cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketState {
    pub tick: u32,
    pub volatility: f64,
    pub time_to_expiry: f64,
    pub underlying_bid: f64,
    pub underlying_ask: f64,
}

impl MarketState {
    /// Build the cycle state, flooring volatility and time at positive minimums
    ///
    /// A non-finite volatility (e.g. a garbled news scrape) is replaced by the
    /// floor as well.
    pub fn new(
        tick: u32,
        volatility: f64,
        time_to_expiry: f64,
        underlying: &Quote,
        volatility_floor: f64,
        min_time_to_expiry: f64,
    ) -> Self {
        let volatility = if volatility.is_finite() {
            volatility.max(volatility_floor)
        } else {
            volatility_floor
        };
        let time_to_expiry = if time_to_expiry.is_finite() {
            time_to_expiry.max(min_time_to_expiry)
        } else {
            min_time_to_expiry
        };

        Self {
            tick,
            volatility,
            time_to_expiry,
            underlying_bid: underlying.bid_price,
            underlying_ask: underlying.ask_price,
        }
    }

    /// Underlying mid price
    #[inline]
    pub fn underlying_mid(&self) -> f64 {
        (self.underlying_bid + self.underlying_ask) / 2.0
    }
}

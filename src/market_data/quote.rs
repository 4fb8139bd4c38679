use serde::{Deserialize, Serialize};
use std::fmt;

/// Order direction
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    /// Exchange wire name
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }

    /// Side that reduces a signed quantity toward zero
    ///
    /// Long (positive) exposure is sold, short exposure is bought back.
    #[inline]
    pub fn reducing(quantity: i64) -> Self {
        if quantity > 0 { Side::Sell } else { Side::Buy }
    }

    /// Signed change this side applies to a position
    #[inline]
    pub fn sign(&self) -> i64 {
        match self {
            Side::Buy => 1,
            Side::Sell => -1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Top-of-book quote for one ticker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub ticker: String,
    pub bid_price: f64,
    pub ask_price: f64,
}

impl Quote {
    pub fn new(ticker: impl Into<String>, bid_price: f64, ask_price: f64) -> Self {
        Self {
            ticker: ticker.into(),
            bid_price,
            ask_price,
        }
    }

    /// Mid price
    #[inline]
    pub fn mid_price(&self) -> f64 {
        (self.bid_price + self.ask_price) / 2.0
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:>8.2} / {:<8.2}",
            self.ticker, self.bid_price, self.ask_price
        )
    }
}

/// Market order with a positive, lot-capped quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketOrder {
    pub ticker: String,
    pub quantity: u32,
    pub side: Side,
}

impl MarketOrder {
    pub fn new(ticker: impl Into<String>, quantity: u32, side: Side) -> Self {
        Self {
            ticker: ticker.into(),
            quantity,
            side,
        }
    }

    /// Create a BUY order
    pub fn buy(ticker: impl Into<String>, quantity: u32) -> Self {
        Self::new(ticker, quantity, Side::Buy)
    }

    /// Create a SELL order
    pub fn sell(ticker: impl Into<String>, quantity: u32) -> Self {
        Self::new(ticker, quantity, Side::Sell)
    }

    /// Position change once filled
    #[inline]
    pub fn signed_quantity(&self) -> i64 {
        self.side.sign() * self.quantity as i64
    }
}

impl fmt::Display for MarketOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.side, self.quantity, self.ticker)
    }
}

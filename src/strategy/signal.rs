use crate::market_data::{Contract, MarketState, Quote, Side};
use crate::pricing;
use serde::{Deserialize, Serialize};

/// Signal action
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SignalAction {
    /// Market ask is cheap against theory
    Buy,
    /// Market bid is rich against theory
    Sell,
    /// No edge, flatten any holding
    Clear,
}

impl SignalAction {
    /// Order side, `None` for CLEAR
    pub fn side(&self) -> Option<Side> {
        match self {
            SignalAction::Buy => Some(Side::Buy),
            SignalAction::Sell => Some(Side::Sell),
            SignalAction::Clear => None,
        }
    }
}

/// Per-contract trading signal, produced fresh every cycle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub action: SignalAction,
    pub ticker: String,
    /// Per-unit mispricing, used only for ranking
    pub edge: f64,
}

impl Signal {
    pub fn new(action: SignalAction, ticker: impl Into<String>, edge: f64) -> Self {
        Self {
            action,
            ticker: ticker.into(),
            edge,
        }
    }

    /// True for BUY and SELL
    #[inline]
    pub fn is_tradeable(&self) -> bool {
        self.action != SignalAction::Clear
    }
}

/// Mispricing classifier
///
/// The theoretical price is computed twice: at the underlying bid (what a
/// buyer of the option should pay at most) and at the underlying ask (what a
/// seller should receive at least). The contract trades only when its quote
/// is outside that band by more than the margin.
#[derive(Debug, Clone)]
pub struct SignalEngine {
    margin: f64,
}

impl SignalEngine {
    /// Create with a multiplicative margin (1.03 = 3%)
    pub fn new(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Classify a contract quote against its theoretical band
    #[inline]
    pub fn classify(
        &self,
        contract_bid: f64,
        contract_ask: f64,
        theo_bid: f64,
        theo_ask: f64,
    ) -> (SignalAction, f64) {
        if contract_bid > self.margin * theo_ask {
            (SignalAction::Sell, contract_bid - theo_ask)
        } else if self.margin * contract_ask < theo_bid {
            (SignalAction::Buy, theo_bid - contract_ask)
        } else {
            (SignalAction::Clear, 0.0)
        }
    }

    /// Signal for one contract given its live quote and the cycle state
    pub fn evaluate(
        &self,
        contract: &Contract,
        quote: &Quote,
        state: &MarketState,
    ) -> crate::Result<Signal> {
        let theo_bid = pricing::price(
            contract.kind,
            state.underlying_bid,
            contract.strike,
            state.volatility,
            state.time_to_expiry,
        )?;
        let theo_ask = pricing::price(
            contract.kind,
            state.underlying_ask,
            contract.strike,
            state.volatility,
            state.time_to_expiry,
        )?;

        let (action, edge) = self.classify(quote.bid_price, quote.ask_price, theo_bid, theo_ask);

        Ok(Signal::new(action, contract.ticker.clone(), edge))
    }
}

impl Default for SignalEngine {
    fn default() -> Self {
        Self::new(1.03)
    }
}

//! # Option Hedging Engine
//!
//! Options mispricing and delta-hedging engine for a simulated exchange
//! listing European calls and puts on a single underlying.
//!
//! ## Features
//!
//! - Closed-form Black-Scholes pricing and delta (zero rate)
//! - Per-contract BUY/SELL/CLEAR signals with a configurable mispricing margin
//! - Portfolio delta aggregation and lot-capped hedge/clear order decomposition
//! - Ranked top-K execution loop with cooperative cancellation
//! - Blocking REST transport and an in-memory paper exchange
//!
//! ## Quick Start
//!
//! ```
//! use option_hedging_engine::*;
//!
//! let exchange = PaperExchange::new(1);
//! exchange.set_quote("RTM", 49.95, 50.05);
//! for contract in ContractRegistry::default().contracts() {
//!     exchange.set_quote(&contract.ticker, 0.95, 1.05);
//! }
//!
//! let engine = TradingEngine::new(EngineConfig::default())?;
//! let report = engine.run_cycle(&exchange, 1)?;
//! assert!(report.executed.len() <= 5);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod hedging;
pub mod market_data;
pub mod network;
pub mod pricing;
pub mod strategy;
pub mod utils;

// Re-exports
pub use hedging::{
    CycleReport, EngineConfig, HedgePolicy, LoopState, PortfolioDelta, PortfolioSnapshot,
    TradingEngine,
};
pub use market_data::{
    Contract, ContractRegistry, MarketOrder, MarketState, NewsItem, OptionKind, Quote, Side,
    VolatilityEstimator,
};
pub use network::{Exchange, NetworkConfig, PaperExchange, RestExchange};
pub use strategy::{Signal, SignalAction, SignalEngine, rank_signals};
pub use utils::{CancellationToken, Metrics};

/// Common result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Market data error: {0}")]
    MarketData(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Transport error: {0}")]
    Transport(String),
}

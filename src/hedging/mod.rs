//! Delta aggregation, hedge/clear policy and the ranked execution loop

mod config;
mod delta;
mod engine;
mod policy;

pub use config::EngineConfig;
pub use delta::{PortfolioDelta, PortfolioSnapshot};
pub use engine::{CycleReport, LoopState, TradingEngine};
pub use policy::{HedgePolicy, OrderBatch, batch_volume, decompose};

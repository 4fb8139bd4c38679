//! Market data structures: contracts, quotes, news and per-cycle state

mod contract;
mod news;
mod quote;
mod state;

pub use contract::{Contract, ContractRegistry, OptionKind};
pub use news::{NewsItem, VolatilityEstimator, parse_percentages};
pub use quote::{MarketOrder, Quote, Side};
pub use state::{MarketState, time_to_expiry};

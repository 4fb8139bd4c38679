//! Mispricing signals and opportunity ranking

mod ranking;
mod signal;

pub use ranking::rank_signals;
pub use signal::{Signal, SignalAction, SignalEngine};

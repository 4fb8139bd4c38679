use crate::strategy::Signal;

/// Keep the `top_k` tradeable signals with the largest edge
///
/// CLEAR signals are dropped. The sort is stable, so equal edges keep the
/// order they arrived in (registry enumeration order).
pub fn rank_signals(signals: impl IntoIterator<Item = Signal>, top_k: usize) -> Vec<Signal> {
    let mut ranked: Vec<Signal> = signals.into_iter().filter(Signal::is_tradeable).collect();

    ranked.sort_by(|a, b| b.edge.total_cmp(&a.edge));
    ranked.truncate(top_k);
    ranked
}

use crate::hedging::policy::batch_volume;
use crate::hedging::{EngineConfig, HedgePolicy, PortfolioDelta};
use crate::market_data::{
    ContractRegistry, MarketOrder, MarketState, OptionKind, VolatilityEstimator, time_to_expiry,
};
use crate::network::Exchange;
use crate::strategy::{Signal, SignalAction, SignalEngine, rank_signals};
use crate::utils::{CancellationToken, Metrics, get_timestamp_us};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Trading loop state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LoopState {
    /// Inside the session and not cancelled
    Running,
    /// Terminal
    Stopped,
}

/// What one decision cycle did
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleReport {
    pub tick: u32,
    pub volatility: f64,
    pub time_to_expiry: f64,
    pub net_delta: f64,
    pub hedge_orders: Vec<MarketOrder>,
    /// Tickers whose CLEAR position was flattened
    pub cleared: Vec<String>,
    /// Ranked signals that were executed, best first
    pub executed: Vec<Signal>,
}

/// Ranked execution loop
///
/// Each cycle: refresh volatility and time to expiry, read positions and
/// signal every contract, then hedge the portfolio delta with the underlying,
/// flatten CLEAR holdings and trade the best `top_k` signals. Nothing is
/// cached between cycles.
pub struct TradingEngine {
    config: EngineConfig,

    /// Contract universe, strikes ascending
    registry: ContractRegistry,

    signals: SignalEngine,

    aggregator: PortfolioDelta,

    policy: HedgePolicy,

    volatility: VolatilityEstimator,

    /// Loop metrics
    metrics: RwLock<Metrics>,
}

impl TradingEngine {
    /// Create a new engine over the configured contract universe
    pub fn new(config: EngineConfig) -> crate::Result<Self> {
        let registry = config.registry();
        Self::with_registry(config, registry)
    }

    /// Create with an explicit contract universe
    pub fn with_registry(config: EngineConfig, registry: ContractRegistry) -> crate::Result<Self> {
        config.validate()?;

        if registry.is_empty() {
            return Err(crate::Error::InvalidState(
                "Contract registry is empty".to_string(),
            ));
        }

        Ok(Self {
            signals: SignalEngine::new(config.mispricing_margin),
            aggregator: PortfolioDelta::new(config.contract_multiplier),
            policy: HedgePolicy::new(
                registry.underlying(),
                config.option_lot_cap,
                config.underlying_lot_cap,
            ),
            volatility: VolatilityEstimator::new(
                config.default_volatility,
                config.min_news_for_volatility,
            ),
            registry,
            config,
            metrics: RwLock::new(Metrics::new()),
        })
    }

    /// State for the given tick and cancellation flag
    pub fn state_for(&self, tick: u32, token: &CancellationToken) -> LoopState {
        if tick > 0 && tick < self.config.session_ticks && !token.is_cancelled() {
            LoopState::Running
        } else {
            LoopState::Stopped
        }
    }

    /// Run cycles until the session ends or `token` is cancelled
    ///
    /// A failed cycle is logged and skipped; the loop carries on with the
    /// next tick. Cancellation is only observed between cycles.
    pub fn run<E: Exchange + ?Sized>(&self, exchange: &E, token: &CancellationToken) -> LoopState {
        let idle = Duration::from_millis(self.config.idle_interval_ms);
        log::info!(
            "trading loop started: {} contracts on {}",
            self.registry.len(),
            self.registry.underlying()
        );

        loop {
            if token.is_cancelled() {
                log::info!("cancellation requested, stopping");
                break;
            }

            let tick = match exchange.get_tick() {
                Ok(tick) => tick,
                Err(e) => {
                    log::warn!("could not read tick, skipping cycle: {}", e);
                    self.metrics.write().record_skipped_cycle();
                    std::thread::sleep(idle);
                    continue;
                }
            };

            if self.state_for(tick, token) == LoopState::Stopped {
                log::info!("tick {} outside session, stopping", tick);
                break;
            }

            match self.run_cycle(exchange, tick) {
                Ok(report) => log::info!(
                    "tick {}: σ={:.3} Δ={:.1} hedges={} cleared={} traded={}",
                    report.tick,
                    report.volatility,
                    report.net_delta,
                    report.hedge_orders.len(),
                    report.cleared.len(),
                    report.executed.len()
                ),
                Err(e) => {
                    log::warn!("tick {}: cycle skipped: {}", tick, e);
                    self.metrics.write().record_skipped_cycle();
                }
            }

            std::thread::sleep(idle);
        }

        LoopState::Stopped
    }

    /// Run one decision cycle at `tick`
    ///
    /// Every exchange read happens before the first order goes out, so a
    /// failed read leaves the exchange untouched. Once submission starts,
    /// a rejected order abandons the rest of the cycle.
    pub fn run_cycle<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        tick: u32,
    ) -> crate::Result<CycleReport> {
        let start_us = get_timestamp_us();

        // 1. Volatility and time to expiry
        let news = exchange.get_news(None)?;
        let volatility = self.volatility.estimate(&news);
        let tte = time_to_expiry(
            tick,
            self.config.session_ticks,
            self.config.ticks_per_year,
            self.config.min_time_to_expiry,
        );

        // 2. Underlying quote
        let underlying = exchange.get_quote(self.registry.underlying())?;
        let state = MarketState::new(
            tick,
            volatility,
            tte,
            &underlying,
            self.config.volatility_floor,
            self.config.min_time_to_expiry,
        );
        let spot = state.underlying_mid();

        // 3. Positions and net delta
        let (snapshot, net_delta) = self
            .aggregator
            .aggregate(exchange, &self.registry, spot, &state)?;

        // 4. Signals; CLEAR holdings are queued, the rest are candidates
        let mut candidates = Vec::with_capacity(self.registry.len());
        let mut to_clear = Vec::new();

        for (contract, &position) in self
            .registry
            .contracts()
            .iter()
            .zip(&snapshot.contract_positions)
        {
            let quote = exchange.get_quote(&contract.ticker)?;
            let signal = self.signals.evaluate(contract, &quote, &state)?;
            log::debug!(
                "{}: {:?} edge={:.4} (quote {})",
                contract.ticker,
                signal.action,
                signal.edge,
                quote
            );

            if signal.action == SignalAction::Clear {
                if position != 0 {
                    to_clear.push((&contract.ticker, position));
                }
            } else {
                candidates.push((contract.kind, signal));
            }
        }

        // 5. Hedge
        let hedge_orders = self.policy.delta_hedge(exchange, net_delta)?;
        self.metrics
            .write()
            .record_hedge(hedge_orders.len(), batch_volume(&hedge_orders));

        // 6. Clear
        let mut cleared = Vec::with_capacity(to_clear.len());
        for (ticker, position) in to_clear {
            let orders = self.policy.clear_position(exchange, ticker, position)?;
            self.metrics
                .write()
                .record_clear(orders.len(), batch_volume(&orders));
            cleared.push(ticker.clone());
        }

        // 7. Rank and execute
        let ranked = rank_candidates(candidates, self.config.top_k);
        let mut executed = Vec::with_capacity(ranked.len());

        for signal in ranked {
            let Some(side) = signal.action.side() else {
                continue;
            };
            let order = MarketOrder::new(signal.ticker.clone(), self.config.trade_quantity, side);
            exchange.submit_market_order(&order)?;
            log::debug!("executed {} (edge {:.4})", order, signal.edge);
            self.metrics
                .write()
                .record_signal_orders(1, order.quantity as u64);
            executed.push(signal);
        }

        let latency_us = get_timestamp_us().saturating_sub(start_us);
        self.metrics.write().record_cycle(latency_us);

        Ok(CycleReport {
            tick,
            volatility: state.volatility,
            time_to_expiry: state.time_to_expiry,
            net_delta,
            hedge_orders: hedge_orders.into_vec(),
            cleared,
            executed,
        })
    }

    /// Get metrics
    pub fn get_metrics(&self) -> Metrics {
        self.metrics.read().clone()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContractRegistry {
        &self.registry
    }
}

/// Top `top_k` candidates by edge; equal edges rank all calls (strikes
/// ascending) ahead of all puts
fn rank_candidates(mut candidates: Vec<(OptionKind, Signal)>, top_k: usize) -> Vec<Signal> {
    candidates.sort_by_key(|(kind, _)| *kind);
    rank_signals(candidates.into_iter().map(|(_, signal)| signal), top_k)
}

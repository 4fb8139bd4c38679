use crate::market_data::{ContractRegistry, MarketState};
use crate::network::Exchange;
use crate::pricing;

/// Positions fetched once per cycle
///
/// `contract_positions[i]` belongs to `registry.contracts()[i]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortfolioSnapshot {
    pub contract_positions: Vec<i64>,
    pub underlying_position: i64,
}

impl PortfolioSnapshot {
    /// Fetch every contract position and the underlying position
    pub fn fetch<E: Exchange + ?Sized>(
        exchange: &E,
        registry: &ContractRegistry,
    ) -> crate::Result<Self> {
        let contract_positions = registry
            .contracts()
            .iter()
            .map(|c| exchange.get_position(&c.ticker))
            .collect::<crate::Result<Vec<i64>>>()?;
        let underlying_position = exchange.get_position(registry.underlying())?;

        Ok(Self {
            contract_positions,
            underlying_position,
        })
    }

    /// Flat book
    pub fn flat(contracts: usize) -> Self {
        Self {
            contract_positions: vec![0; contracts],
            underlying_position: 0,
        }
    }
}

/// Portfolio delta aggregator
///
/// Net exposure in underlying units:
///
/// ```text
/// Σ position(c) × delta(c) × multiplier  +  underlying position
///
/// Long 10 RTM50C (Δ≈0.52), short 5 RTM48P (Δ≈-0.28), long 200 RTM:
///   10×0.52×100 + (-5)×(-0.28)×100 + 200 = 520 + 140 + 200 = 860
/// ```
#[derive(Debug, Clone)]
pub struct PortfolioDelta {
    multiplier: f64,
}

impl PortfolioDelta {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }

    /// Net delta of a snapshot, with option deltas taken at `spot`
    pub fn net_delta(
        &self,
        registry: &ContractRegistry,
        snapshot: &PortfolioSnapshot,
        spot: f64,
        state: &MarketState,
    ) -> crate::Result<f64> {
        if snapshot.contract_positions.len() != registry.len() {
            return Err(crate::Error::InvalidState(format!(
                "snapshot has {} positions for {} contracts",
                snapshot.contract_positions.len(),
                registry.len()
            )));
        }

        let mut total = snapshot.underlying_position as f64;

        for (contract, &position) in registry.contracts().iter().zip(&snapshot.contract_positions) {
            if position == 0 {
                continue;
            }
            let delta = pricing::delta(
                contract.kind,
                spot,
                contract.strike,
                state.volatility,
                state.time_to_expiry,
            )?;
            total += position as f64 * delta * self.multiplier;
        }

        Ok(total)
    }

    /// Fetch positions and aggregate in one step
    pub fn aggregate<E: Exchange + ?Sized>(
        &self,
        exchange: &E,
        registry: &ContractRegistry,
        spot: f64,
        state: &MarketState,
    ) -> crate::Result<(PortfolioSnapshot, f64)> {
        let snapshot = PortfolioSnapshot::fetch(exchange, registry)?;
        let delta = self.net_delta(registry, &snapshot, spot, state)?;
        Ok((snapshot, delta))
    }
}

impl Default for PortfolioDelta {
    fn default() -> Self {
        Self::new(100.0)
    }
}

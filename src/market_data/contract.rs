use serde::{Deserialize, Serialize};
use std::fmt;

/// Option right
///
/// Ordered calls first.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Ticker suffix used by the exchange
    pub fn suffix(&self) -> char {
        match self {
            OptionKind::Call => 'C',
            OptionKind::Put => 'P',
        }
    }
}

/// Listed option contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contract {
    pub ticker: String,
    pub strike: f64,
    pub kind: OptionKind,
}

impl Contract {
    pub fn new(ticker: impl Into<String>, strike: f64, kind: OptionKind) -> Self {
        Self {
            ticker: ticker.into(),
            strike,
            kind,
        }
    }

    /// Build the exchange ticker for `underlying` (e.g. `RTM45C`)
    pub fn listed(underlying: &str, strike: u32, kind: OptionKind) -> Self {
        Self::new(
            format!("{}{}{}", underlying, strike, kind.suffix()),
            strike as f64,
            kind,
        )
    }
}

impl fmt::Display for Contract {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:?} K={})", self.ticker, self.kind, self.strike)
    }
}

/// Ordered contract universe on one underlying
///
/// Iteration order is strikes ascending, call before put at each strike.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractRegistry {
    underlying: String,
    contracts: Vec<Contract>,
}

impl ContractRegistry {
    /// Registry from an explicit contract list, kept in the given order
    pub fn new(underlying: impl Into<String>, contracts: Vec<Contract>) -> Self {
        Self {
            underlying: underlying.into(),
            contracts,
        }
    }

    /// One call and one put per strike
    pub fn from_strikes(underlying: &str, strikes: &[u32]) -> Self {
        let mut sorted = strikes.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let contracts = sorted
            .iter()
            .flat_map(|&k| {
                [
                    Contract::listed(underlying, k, OptionKind::Call),
                    Contract::listed(underlying, k, OptionKind::Put),
                ]
            })
            .collect();

        Self::new(underlying, contracts)
    }

    /// Underlying ticker
    pub fn underlying(&self) -> &str {
        &self.underlying
    }

    /// Contracts in enumeration order
    pub fn contracts(&self) -> &[Contract] {
        &self.contracts
    }

    /// Look up a contract by ticker
    pub fn get(&self, ticker: &str) -> Option<&Contract> {
        self.contracts.iter().find(|c| c.ticker == ticker)
    }

    pub fn len(&self) -> usize {
        self.contracts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contracts.is_empty()
    }
}

impl Default for ContractRegistry {
    /// RTM with strikes 45 through 54
    fn default() -> Self {
        let strikes: Vec<u32> = (45..=54).collect();
        Self::from_strikes("RTM", &strikes)
    }
}

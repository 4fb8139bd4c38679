use crate::market_data::ContractRegistry;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration
///
/// Every exchange and strategy constant lives here; nothing is derived at
/// runtime. Missing fields in a config file take the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Underlying ticker
    pub underlying: String,

    /// Listed strikes; one call and one put each
    pub strikes: Vec<u32>,

    /// Underlying units per option contract
    pub contract_multiplier: f64,

    /// Maximum quantity per option order
    pub option_lot_cap: u32,

    /// Maximum quantity per underlying order
    pub underlying_lot_cap: u32,

    /// Multiplicative mispricing margin (1.03 = 3%)
    pub mispricing_margin: f64,

    /// Ranked signals executed per cycle
    pub top_k: usize,

    /// Quantity per signal order
    pub trade_quantity: u32,

    /// Ticks in the trading session
    pub session_ticks: u32,

    /// Ticks per year for annualizing time to expiry
    /// e.g., 30 ticks/day × 240 days = 7200
    pub ticks_per_year: f64,

    /// Volatility used until enough news has arrived
    pub default_volatility: f64,

    /// News items required before the feed is trusted
    pub min_news_for_volatility: usize,

    /// Lowest volatility handed to the pricing model
    pub volatility_floor: f64,

    /// Lowest time to expiry handed to the pricing model
    pub min_time_to_expiry: f64,

    /// Pause between cycles (milliseconds)
    pub idle_interval_ms: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            underlying: "RTM".to_string(),
            strikes: (45..=54).collect(),
            contract_multiplier: 100.0,
            option_lot_cap: 100,
            underlying_lot_cap: 10_000,
            mispricing_margin: 1.03,
            top_k: 5,
            trade_quantity: 100,
            session_ticks: 600,
            ticks_per_year: 7_200.0,
            default_volatility: 0.20,
            min_news_for_volatility: 3,
            volatility_floor: 0.01,
            min_time_to_expiry: 1e-6,
            idle_interval_ms: 1_000,
        }
    }
}

impl EngineConfig {
    /// Load from a JSON file
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            crate::Error::Config(format!("Cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
    }

    /// Parse from JSON text
    pub fn from_json(text: &str) -> crate::Result<Self> {
        let config: Self = serde_json::from_str(text)
            .map_err(|e| crate::Error::Config(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Contract universe described by this configuration
    pub fn registry(&self) -> ContractRegistry {
        ContractRegistry::from_strikes(&self.underlying, &self.strikes)
    }

    /// Validate configuration
    pub fn validate(&self) -> crate::Result<()> {
        if self.underlying.is_empty() {
            return Err(crate::Error::Config(
                "Underlying ticker must be set".to_string(),
            ));
        }

        if self.strikes.is_empty() || self.strikes.contains(&0) {
            return Err(crate::Error::Config(
                "Strikes must be non-empty and positive".to_string(),
            ));
        }

        if self.contract_multiplier <= 0.0 {
            return Err(crate::Error::Config(
                "Contract multiplier must be positive".to_string(),
            ));
        }

        if self.option_lot_cap == 0 || self.underlying_lot_cap == 0 {
            return Err(crate::Error::Config(
                "Lot caps must be positive".to_string(),
            ));
        }

        if self.mispricing_margin <= 0.0 {
            return Err(crate::Error::Config(
                "Mispricing margin must be positive".to_string(),
            ));
        }

        if self.top_k == 0 {
            return Err(crate::Error::Config(
                "Top-K must be at least 1".to_string(),
            ));
        }

        if self.trade_quantity == 0 || self.trade_quantity > self.option_lot_cap {
            return Err(crate::Error::Config(format!(
                "Trade quantity must be in 1..={}",
                self.option_lot_cap
            )));
        }

        if self.session_ticks == 0 || self.ticks_per_year <= 0.0 {
            return Err(crate::Error::Config(
                "Session length and ticks per year must be positive".to_string(),
            ));
        }

        if self.default_volatility <= 0.0
            || self.volatility_floor <= 0.0
            || self.min_time_to_expiry <= 0.0
        {
            return Err(crate::Error::Config(
                "Volatility and time floors must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = EngineConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.registry().len(), 20);
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let config = EngineConfig::from_json(r#"{"top_k": 3, "idle_interval_ms": 0}"#).unwrap();

        assert_eq!(config.top_k, 3);
        assert_eq!(config.idle_interval_ms, 0);
        assert_eq!(config.mispricing_margin, 1.03);
        assert_eq!(config.underlying_lot_cap, 10_000);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let cases = [
            EngineConfig {
                top_k: 0,
                ..Default::default()
            },
            EngineConfig {
                strikes: vec![],
                ..Default::default()
            },
            EngineConfig {
                option_lot_cap: 0,
                ..Default::default()
            },
            EngineConfig {
                trade_quantity: 101,
                ..Default::default()
            },
            EngineConfig {
                volatility_floor: 0.0,
                ..Default::default()
            },
        ];

        for config in cases {
            assert!(matches!(config.validate(), Err(crate::Error::Config(_))));
        }
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            EngineConfig::from_json("{ not json"),
            Err(crate::Error::Config(_))
        ));
    }
}

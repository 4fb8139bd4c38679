use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PERCENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)%").expect("percentage pattern is valid")
});

/// News item published by the exchange
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewsItem {
    pub news_id: u64,
    #[serde(default)]
    pub headline: String,
    #[serde(default)]
    pub body: String,
}

impl NewsItem {
    pub fn new(news_id: u64, headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            news_id,
            headline: headline.into(),
            body: body.into(),
        }
    }
}

/// Extract every percentage figure in `text` as a fraction (`20%` → 0.20)
pub fn parse_percentages(text: &str) -> Vec<f64> {
    PERCENT
        .captures_iter(text)
        .filter_map(|c| c[1].parse::<f64>().ok())
        .map(|p| p * 0.01)
        .collect()
}

/// Volatility estimate scraped from the news feed
#[derive(Debug, Clone)]
pub struct VolatilityEstimator {
    /// Used until enough news has been published
    default_volatility: f64,

    /// News items required before the feed is trusted
    min_news: usize,
}

impl VolatilityEstimator {
    pub fn new(default_volatility: f64, min_news: usize) -> Self {
        Self {
            default_volatility,
            min_news,
        }
    }

    /// Estimate volatility from all news observed so far
    ///
    /// Mean of the percentages in the most recent item (highest `news_id`).
    /// Falls back to the default with too little history or when the latest
    /// item carries no percentage.
    pub fn estimate(&self, news: &[NewsItem]) -> f64 {
        if news.len() < self.min_news {
            return self.default_volatility;
        }

        let Some(latest) = news.iter().max_by_key(|n| n.news_id) else {
            return self.default_volatility;
        };

        let figures = parse_percentages(&latest.body);
        if figures.is_empty() {
            log::debug!(
                "news {} has no volatility figure, using default",
                latest.news_id
            );
            return self.default_volatility;
        }

        figures.iter().sum::<f64>() / figures.len() as f64
    }
}

impl Default for VolatilityEstimator {
    fn default() -> Self {
        Self::new(0.20, 3)
    }
}

//! Blocking REST client for the trading simulator

use crate::market_data::{MarketOrder, NewsItem, Quote};
use crate::network::{Exchange, NetworkConfig};
use crate::{Error, Result};
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Deserialize)]
struct CaseResponse {
    tick: u32,
}

#[derive(Debug, Deserialize)]
struct BookLevel {
    price: f64,
}

#[derive(Debug, Deserialize)]
struct BookResponse {
    #[serde(default)]
    bids: Vec<BookLevel>,
    #[serde(default)]
    asks: Vec<BookLevel>,
}

#[derive(Debug, Deserialize)]
struct SecurityResponse {
    position: f64,
}

/// Exchange reached over HTTP
pub struct RestExchange {
    client: Client,
    base_url: String,
}

impl RestExchange {
    /// Build the client with the API key installed as a default header
    pub fn connect(config: &NetworkConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&config.api_key)
            .map_err(|e| Error::Config(format!("Invalid API key: {}", e)))?;
        headers.insert("X-API-Key", key);

        let mut builder = Client::builder().default_headers(headers);
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        } else {
            builder = builder.timeout(None::<Duration>);
        }

        let client = builder
            .build()
            .map_err(|e| Error::Transport(format!("Failed to build client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, String)]) -> Result<T> {
        let resp = self
            .client
            .get(self.url(path))
            .query(query)
            .send()
            .map_err(|e| Error::Transport(format!("GET {} failed: {}", path, e)))?;

        Self::check(path, resp)?
            .json::<T>()
            .map_err(|e| Error::Transport(format!("GET {} returned bad body: {}", path, e)))
    }

    fn check(path: &str, resp: Response) -> Result<Response> {
        let status = resp.status();
        if status.is_success() {
            Ok(resp)
        } else {
            let body = resp.text().unwrap_or_default();
            Err(Error::Transport(format!(
                "{} returned {}: {}",
                path, status, body
            )))
        }
    }
}

impl Exchange for RestExchange {
    fn get_tick(&self) -> Result<u32> {
        let case: CaseResponse = self.get("/case", &[])?;
        Ok(case.tick)
    }

    fn get_quote(&self, ticker: &str) -> Result<Quote> {
        let book: BookResponse =
            self.get("/securities/book", &[("ticker", ticker.to_string())])?;

        let bid = book
            .bids
            .first()
            .ok_or_else(|| Error::MarketData(format!("{} has no bids", ticker)))?;
        let ask = book
            .asks
            .first()
            .ok_or_else(|| Error::MarketData(format!("{} has no asks", ticker)))?;

        Ok(Quote::new(ticker, bid.price, ask.price))
    }

    fn get_position(&self, ticker: &str) -> Result<i64> {
        let securities: Vec<SecurityResponse> =
            self.get("/securities", &[("ticker", ticker.to_string())])?;

        securities
            .first()
            .map(|s| s.position as i64)
            .ok_or_else(|| Error::MarketData(format!("Unknown security {}", ticker)))
    }

    fn get_news(&self, since: Option<u64>) -> Result<Vec<NewsItem>> {
        let query: Vec<(&str, String)> = since
            .map(|id| vec![("since", id.to_string())])
            .unwrap_or_default();
        self.get("/news", &query)
    }

    fn submit_market_order(&self, order: &MarketOrder) -> Result<()> {
        let query = [
            ("ticker", order.ticker.clone()),
            ("type", "MARKET".to_string()),
            ("quantity", order.quantity.to_string()),
            ("action", order.side.as_str().to_string()),
        ];

        let resp = self
            .client
            .post(self.url("/orders"))
            .query(&query)
            .send()
            .map_err(|e| Error::Transport(format!("POST /orders failed: {}", e)))?;

        Self::check("/orders", resp)?;
        log::debug!("order acknowledged: {}", order);
        Ok(())
    }
}

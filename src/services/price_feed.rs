use std::{
    collections::{BTreeSet, HashMap},
    time::Duration,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::errors::FeedUnavailable;

use super::alert_engine::PriceMap;

#[async_trait]
pub trait PriceFeed: Send + Sync {
    /// All-or-nothing: any failure voids the whole batch. Coins without a
    /// quote are left out of the map.
    async fn fetch_prices(&self, coin_ids: &BTreeSet<String>) -> Result<PriceMap, FeedUnavailable>;
}

#[derive(Clone)]
pub struct CoinGeckoClient {
    http: Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Debug, Deserialize)]
struct UsdQuote {
    usd: Option<f64>,
}

impl CoinGeckoClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }
}

#[async_trait]
impl PriceFeed for CoinGeckoClient {
    async fn fetch_prices(&self, coin_ids: &BTreeSet<String>) -> Result<PriceMap, FeedUnavailable> {
        if coin_ids.is_empty() {
            return Ok(PriceMap::new());
        }

        let ids = coin_ids.iter().map(String::as_str).collect::<Vec<_>>().join(",");
        let url = format!("{}/simple/price", self.base_url);

        let res = self
            .http
            .get(url)
            .query(&[("ids", ids.as_str()), ("vs_currencies", "usd")])
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify)?;

        if !res.status().is_success() {
            return Err(FeedUnavailable::Status(res.status().as_u16()));
        }

        let body = res
            .json::<HashMap<String, UsdQuote>>()
            .await
            .map_err(classify)?;

        Ok(body
            .into_iter()
            .filter_map(|(coin, q)| q.usd.filter(|p| p.is_finite()).map(|p| (coin, p)))
            .collect())
    }
}

fn classify(e: reqwest::Error) -> FeedUnavailable {
    if e.is_timeout() {
        FeedUnavailable::Timeout
    } else {
        FeedUnavailable::Transport(e)
    }
}

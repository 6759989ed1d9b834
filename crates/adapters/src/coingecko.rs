// crates/adapters/src/coingecko.rs
use crate::{MarketDataSource, RateLimiter};
use async_trait::async_trait;
use common::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

const MAX_PAGE_SIZE: usize = 250;
const TRENDING_LIMIT: usize = 20;
const SPARKLINE_POINTS: usize = 48;

/// CoinGecko client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Coins fetched per scan
    pub fetch_top_n: usize,
    pub request_timeout_secs: u64,
    /// How long the user is told to back off after a 429
    pub rate_limit_wait_secs: u64,
    pub max_retries: u32,
    pub requests_per_minute: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.coingecko.com/api/v3".to_string(),
            fetch_top_n: 500,
            request_timeout_secs: 15,
            rate_limit_wait_secs: 65,
            max_retries: 2,
            requests_per_minute: 10,
        }
    }
}

/// Delay before retrying a timed-out request
pub fn timeout_backoff(attempt: u32) -> Duration {
    Duration::from_secs(2u64.saturating_pow(attempt))
}

/// Delay before retrying after a 5xx response
pub fn server_error_backoff(attempt: u32) -> Duration {
    Duration::from_secs(3 * (attempt as u64 + 1))
}

pub struct CoinGeckoClient {
    client: reqwest::Client,
    config: ApiConfig,
    rate_limiter: RateLimiter,
}

impl CoinGeckoClient {
    pub fn new(config: ApiConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            rate_limiter: RateLimiter::per_minute(config.requests_per_minute),
            config,
        })
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// GET with retry on timeouts and server errors. A 429 fails straight
    /// away so the caller can tell the user to wait.
    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.config.base_url.trim_end_matches('/'), path);
        let mut attempt = 0;

        loop {
            self.rate_limiter.acquire().await;
            metrics::counter!("coingecko_requests").increment(1);

            let response = match self.client.get(&url).query(params).send().await {
                Ok(response) => response,
                Err(e) if e.is_timeout() => {
                    if attempt < self.config.max_retries {
                        let wait = timeout_backoff(attempt);
                        tracing::warn!("CoinGecko {} timed out, retrying in {:?}", path, wait);
                        tokio::time::sleep(wait).await;
                        attempt += 1;
                        continue;
                    }
                    return Err(Error::Timeout(
                        "CoinGecko timed out, try again in a moment".to_string(),
                    ));
                }
                Err(e) => return Err(e.into()),
            };

            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                metrics::counter!("coingecko_rate_limited").increment(1);
                return Err(Error::RateLimit(format!(
                    "CoinGecko rate limit hit. Wait {} seconds and try again. \
                     (The free API allows ~10-30 requests/minute.)",
                    self.config.rate_limit_wait_secs
                )));
            }

            if status.is_server_error() {
                if attempt < self.config.max_retries {
                    let wait = server_error_backoff(attempt);
                    tracing::warn!("CoinGecko {} returned {}, retrying in {:?}", path, status, wait);
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                    continue;
                }
                return Err(Error::Upstream {
                    status: status.as_u16(),
                    message: "CoinGecko server error, try again shortly".to_string(),
                });
            }

            if !status.is_success() {
                let message = response.text().await.unwrap_or_default();
                return Err(Error::Upstream {
                    status: status.as_u16(),
                    message,
                });
            }

            let body = response.text().await?;
            return Ok(serde_json::from_str(&body)?);
        }
    }

    /// One page of the markets endpoint, ordered by market cap
    pub async fn fetch_markets_page(&self, per_page: usize, page: usize) -> Result<Vec<CoinRecord>> {
        let params = [
            ("vs_currency", "usd".to_string()),
            ("order", "market_cap_desc".to_string()),
            ("per_page", per_page.min(MAX_PAGE_SIZE).to_string()),
            ("page", page.to_string()),
            ("sparkline", "true".to_string()),
            ("price_change_percentage", "24h,7d".to_string()),
        ];
        let raw: Vec<RawMarketCoin> = self.get_json("coins/markets", &params).await?;
        Ok(raw.into_iter().map(CoinRecord::from).collect())
    }
}

#[async_trait]
impl MarketDataSource for CoinGeckoClient {
    async fn fetch_markets(&self, top_n: usize) -> Result<Vec<CoinRecord>> {
        let mut coins = Vec::with_capacity(top_n);
        let mut page = 1;

        while coins.len() < top_n {
            let chunk = self.fetch_markets_page(MAX_PAGE_SIZE, page).await?;
            let short_page = chunk.len() < MAX_PAGE_SIZE;
            tracing::debug!("Fetched markets page {} ({} coins)", page, chunk.len());
            coins.extend(chunk);
            if short_page {
                break;
            }
            page += 1;
        }

        coins.truncate(top_n);
        Ok(coins)
    }

    async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>> {
        let response: TrendingResponse = self.get_json("search/trending", &[]).await?;
        Ok(response.into_entries())
    }

    async fn fetch_simple_prices(&self, ids: &[String]) -> Result<HashMap<String, PriceUpdate>> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let params = [
            ("ids", ids.join(",")),
            ("vs_currencies", "usd".to_string()),
            ("include_24hr_change", "true".to_string()),
            ("include_market_cap", "true".to_string()),
            ("include_24hr_vol", "true".to_string()),
        ];
        let raw: HashMap<String, RawSimplePrice> = self.get_json("simple/price", &params).await?;
        Ok(raw.into_iter().map(|(id, price)| (id, price.into())).collect())
    }
}

/// Markets endpoint record as served
#[derive(Debug, Deserialize)]
struct RawMarketCoin {
    #[serde(default)]
    id: String,
    #[serde(default)]
    symbol: String,
    #[serde(default)]
    name: String,
    current_price: Option<f64>,
    price_change_percentage_24h: Option<f64>,
    price_change_percentage_7d: Option<f64>,
    price_change_percentage_7d_in_currency: Option<f64>,
    total_volume: Option<f64>,
    market_cap: Option<f64>,
    market_cap_rank: Option<u32>,
    atl_date: Option<String>,
    sparkline_in_7d: Option<RawSparkline>,
}

#[derive(Debug, Deserialize)]
struct RawSparkline {
    #[serde(default)]
    price: Vec<Option<f64>>,
}

impl From<RawMarketCoin> for CoinRecord {
    fn from(raw: RawMarketCoin) -> Self {
        let prices: Vec<f64> = raw
            .sparkline_in_7d
            .map(|s| s.price.into_iter().flatten().collect())
            .unwrap_or_default();

        CoinRecord {
            id: raw.id,
            symbol: raw.symbol,
            name: raw.name,
            current_price: raw.current_price,
            price_change_percentage_24h: raw.price_change_percentage_24h,
            price_change_percentage_7d: raw
                .price_change_percentage_7d
                .or(raw.price_change_percentage_7d_in_currency),
            total_volume: raw.total_volume,
            market_cap: raw.market_cap,
            market_cap_rank: raw.market_cap_rank,
            atl_date: raw.atl_date,
            vol_mcap_ratio: vol_mcap_ratio(raw.total_volume, raw.market_cap),
            sparkline: downsample(&prices, SPARKLINE_POINTS),
            ..Default::default()
        }
    }
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    coins: Vec<TrendingEntry>,
}

impl TrendingResponse {
    fn into_entries(mut self) -> Vec<TrendingEntry> {
        self.coins.truncate(TRENDING_LIMIT);
        self.coins
    }
}

#[derive(Debug, Deserialize)]
struct RawSimplePrice {
    usd: Option<f64>,
    usd_24h_change: Option<f64>,
    usd_market_cap: Option<f64>,
    usd_24h_vol: Option<f64>,
}

impl From<RawSimplePrice> for PriceUpdate {
    fn from(raw: RawSimplePrice) -> Self {
        let market_cap = raw.usd_market_cap.unwrap_or(0.0);
        let total_volume = raw.usd_24h_vol.unwrap_or(0.0);
        PriceUpdate {
            current_price: raw.usd,
            price_change_percentage_24h: raw.usd_24h_change,
            market_cap,
            total_volume,
            vol_mcap_ratio: vol_mcap_ratio(Some(total_volume), Some(market_cap)),
        }
    }
}

/// Reduce a series to at most `n` evenly spaced points
pub fn downsample(prices: &[f64], n: usize) -> Vec<f64> {
    if prices.len() <= n {
        return prices.to_vec();
    }
    let step = prices.len() as f64 / n as f64;
    (0..n).map(|i| prices[(i as f64 * step) as usize]).collect()
}

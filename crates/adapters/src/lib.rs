// crates/adapters/src/lib.rs
use async_trait::async_trait;
use common::*;
use std::collections::HashMap;

pub mod coingecko;
mod rate_limiter;

pub use coingecko::{ApiConfig, CoinGeckoClient};
pub use rate_limiter::RateLimiter;

/// Source of market snapshots for the ranker
#[async_trait]
pub trait MarketDataSource: Send + Sync {
    /// Up to `top_n` coins ordered by market cap, with `vol_mcap_ratio`
    /// already computed
    async fn fetch_markets(&self, top_n: usize) -> Result<Vec<CoinRecord>>;
    
    /// Current trending-list entries
    async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>>;
    
    /// Cheap price poll for specific coin ids
    async fn fetch_simple_prices(&self, ids: &[String]) -> Result<HashMap<String, PriceUpdate>>;
}

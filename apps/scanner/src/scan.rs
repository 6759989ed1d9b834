// apps/scanner/src/scan.rs
use crate::display;
use adapters::MarketDataSource;
use anyhow::Context;
use chrono::{DateTime, Utc};
use common::{merge_trending_ids, CoinRecord, TrendingSet};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration};
use universe::{Ranker, ScoreHistory};

#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub fetch_top_n: usize,
    pub show_top: usize,
    pub exclude_blue_chips: bool,
    /// Harvested trending ids merged into the API trending list
    pub extra_trend_ids: Vec<String>,
}

/// Outcome of one scan. `ranked` holds every eligible coin; callers slice.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub at: DateTime<Utc>,
    pub scanned: usize,
    pub ranked: Vec<CoinRecord>,
    pub warnings: Vec<String>,
}

impl ScanReport {
    pub fn top(&self, n: usize) -> &[CoinRecord] {
        &self.ranked[..n.min(self.ranked.len())]
    }
}

pub struct Scanner {
    source: Arc<dyn MarketDataSource>,
    ranker: Arc<Ranker>,
}

impl Scanner {
    pub fn new(source: Arc<dyn MarketDataSource>, ranker: Ranker) -> Self {
        Self {
            source,
            ranker: Arc::new(ranker),
        }
    }

    /// Fetch a snapshot and rank it. A failed trending fetch only degrades
    /// the result; a failed market fetch fails the scan.
    pub async fn scan(&self, opts: &ScanOptions) -> anyhow::Result<ScanReport> {
        let start = std::time::Instant::now();
        let mut warnings = Vec::new();

        let coins = self
            .source
            .fetch_markets(opts.fetch_top_n)
            .await
            .context("Failed to fetch market data")?;
        let scanned = coins.len();

        let mut trending = match self.source.fetch_trending().await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Trending fetch failed: {}", e);
                warnings.push(format!("trending fetch failed: {}", e));
                Vec::new()
            }
        };
        let merged = merge_trending_ids(&mut trending, &opts.extra_trend_ids);
        let trending = TrendingSet::from_entries(&trending);
        tracing::debug!("{} trending ids ({} harvested)", trending.len(), merged);

        let ranker = self.ranker.clone();
        let exclude_blue_chips = opts.exclude_blue_chips;
        let at = Utc::now();
        let ranked = tokio::task::spawn_blocking(move || {
            ranker.rank_at(coins, &trending, exclude_blue_chips, at)
        })
        .await
        .context("Ranking task failed")?;

        tracing::info!(
            "Scanned {} coins, {} ranked in {:?}",
            scanned,
            ranked.len(),
            start.elapsed()
        );

        Ok(ScanReport {
            at,
            scanned,
            ranked,
            warnings,
        })
    }
}

/// Rescan on a fixed interval until shutdown, tracking score velocity of
/// the displayed coins across passes. Scan failures are logged and retried
/// on the next tick. A scan in flight is abandoned on shutdown.
pub async fn run_watch(
    scanner: &Scanner,
    opts: &ScanOptions,
    every: Duration,
    history: &mut ScoreHistory,
    mut shutdown: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let mut ticker = interval(every);
    tracing::info!("Watching every {:?}", every);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        tokio::select! {
            result = scanner.scan(opts) => match result {
                Ok(report) => {
                    history.record(report.top(opts.show_top), report.at);
                    print_report(&report, opts, Some(history));
                }
                Err(e) => {
                    tracing::error!("Scan failed: {:#}", e);
                }
            },
            res = shutdown.changed() => {
                if res.is_err() || *shutdown.borrow() {
                    tracing::info!("Shutdown during scan, abandoning it");
                    break;
                }
            }
        }
    }

    tracing::info!("Watch loop shutting down");
    Ok(())
}

/// Trim and lower-case user supplied coin ids, dropping blanks and repeats.
/// CoinGecko ids are lower-case.
pub fn normalize_ids(ids: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(ids.len());
    for id in ids {
        let id = id.trim().to_lowercase();
        if !id.is_empty() && !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

pub fn print_report(report: &ScanReport, opts: &ScanOptions, history: Option<&ScoreHistory>) {
    for warning in &report.warnings {
        eprintln!("Warning: {}", warning);
    }

    let top = report.top(opts.show_top);
    display::print_header(top.len(), opts.exclude_blue_chips);
    for coin in top {
        let velocity = history.and_then(|h| h.velocity(&coin.id));
        println!("{}", display::format_coin(coin, velocity));
    }
    println!();
    println!("  Scanned {} coins at {}", report.scanned, report.at.format("%Y-%m-%d %H:%M:%S UTC"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use common::{Error, PriceUpdate, Result, TrendingEntry, TrendingItem};
    use std::collections::HashMap;

    struct StubSource {
        coins: Vec<CoinRecord>,
        trending_fails: bool,
        markets_delay: Duration,
    }

    impl StubSource {
        fn new(trending_fails: bool) -> Arc<Self> {
            Arc::new(Self { coins: coins(), trending_fails, markets_delay: Duration::ZERO })
        }
    }

    #[async_trait]
    impl MarketDataSource for StubSource {
        async fn fetch_markets(&self, top_n: usize) -> Result<Vec<CoinRecord>> {
            if !self.markets_delay.is_zero() {
                tokio::time::sleep(self.markets_delay).await;
            }
            Ok(self.coins.iter().take(top_n).cloned().collect())
        }

        async fn fetch_trending(&self) -> Result<Vec<TrendingEntry>> {
            if self.trending_fails {
                return Err(Error::RateLimit("slow down".to_string()));
            }
            Ok(vec![TrendingEntry::Nested {
                item: TrendingItem { id: Some("beta".to_string()), coin_id: None },
            }])
        }

        async fn fetch_simple_prices(&self, _ids: &[String]) -> Result<HashMap<String, PriceUpdate>> {
            Ok(HashMap::new())
        }
    }

    fn coins() -> Vec<CoinRecord> {
        ["alpha", "beta", "gamma", "tether"]
            .into_iter()
            .enumerate()
            .map(|(i, id)| CoinRecord {
                price_change_percentage_24h: Some(10.0),
                vol_mcap_ratio: 0.2,
                market_cap_rank: Some(100 + i as u32),
                ..CoinRecord::new(id, id, id)
            })
            .collect()
    }

    fn options() -> ScanOptions {
        ScanOptions {
            fetch_top_n: 500,
            show_top: 2,
            exclude_blue_chips: true,
            extra_trend_ids: vec!["gamma".to_string()],
        }
    }

    #[tokio::test]
    async fn test_scan_merges_trending_sources() {
        let source = StubSource::new(false);
        let scanner = Scanner::new(source, Ranker::default());

        let report = scanner.scan(&options()).await.unwrap();

        assert_eq!(report.scanned, 4);
        assert_eq!(report.ranked.len(), 3);
        assert!(report.warnings.is_empty());
        let top: Vec<&str> = report.top(2).iter().map(|c| c.id.as_str()).collect();
        // Both trending; gamma sits deeper in the cap ranking
        assert_eq!(top, vec!["gamma", "beta"]);
    }

    #[tokio::test]
    async fn test_trending_failure_is_a_warning() {
        let source = StubSource::new(true);
        let scanner = Scanner::new(source, Ranker::default());

        let report = scanner.scan(&options()).await.unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(report.ranked[0].id, "gamma");
        assert_eq!(report.top(50).len(), 3);
    }

    #[tokio::test]
    async fn test_watch_stops_on_shutdown() {
        let source = StubSource::new(false);
        let scanner = Scanner::new(source, Ranker::default());
        let mut history = ScoreHistory::new(5);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = shutdown_tx.send(true);
        });

        run_watch(&scanner, &options(), Duration::from_millis(20), &mut history, shutdown_rx)
            .await
            .unwrap();
        stopper.await.unwrap();

        // Only the displayed rows are tracked
        assert!(history.latest("gamma").is_some());
        assert!(history.latest("beta").is_some());
        assert!(history.latest("alpha").is_none());
        assert!(history.latest("tether").is_none());
    }

    #[tokio::test]
    async fn test_watch_exits_when_sender_dropped() {
        let scanner = Scanner::new(StubSource::new(false), Ranker::default());
        let mut history = ScoreHistory::new(5);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        drop(shutdown_tx);

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_watch(&scanner, &options(), Duration::from_millis(10), &mut history, shutdown_rx),
        )
        .await;
        assert!(finished.is_ok());
    }

    #[tokio::test]
    async fn test_shutdown_interrupts_slow_scan() {
        let source = Arc::new(StubSource {
            coins: coins(),
            trending_fails: false,
            markets_delay: Duration::from_secs(30),
        });
        let scanner = Scanner::new(source, Ranker::default());
        let mut history = ScoreHistory::new(5);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let stopper = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            let _ = shutdown_tx.send(true);
        });

        let finished = tokio::time::timeout(
            Duration::from_secs(2),
            run_watch(&scanner, &options(), Duration::from_secs(60), &mut history, shutdown_rx),
        )
        .await;
        stopper.await.unwrap();

        assert!(finished.is_ok());
        assert!(history.is_empty());
    }

    #[test]
    fn test_normalize_ids() {
        let ids = vec![
            " PEPE ".to_string(),
            "pepe".to_string(),
            "".to_string(),
            "Bonk".to_string(),
        ];
        assert_eq!(normalize_ids(&ids), vec!["pepe", "bonk"]);
    }
}

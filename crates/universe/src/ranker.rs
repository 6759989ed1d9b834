// crates/universe/src/ranker.rs
use crate::normalise::ScoreRange;
use crate::scoring::{CoinScorer, ScoreRanges};
use chrono::{DateTime, Utc};
use common::{CoinRecord, TrendingEntry, TrendingSet};

/// Scores a market snapshot and orders it
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    scorer: CoinScorer,
}

impl Ranker {
    pub fn new(scorer: CoinScorer) -> Self {
        Self { scorer }
    }

    pub fn scorer(&self) -> &CoinScorer {
        &self.scorer
    }

    /// Bounds over every non-stablecoin in the snapshot. Blue chips count
    /// towards the bounds even when they are later left out of the ranking.
    pub fn compute_ranges(&self, coins: &[CoinRecord]) -> ScoreRanges {
        let filter = self.scorer.filter();
        let non_stable: Vec<&CoinRecord> = coins
            .iter()
            .filter(|c| !filter.is_stablecoin(c))
            .collect();

        let fallback = ScoreRanges::FALLBACK;
        ScoreRanges {
            vol_mcap_ratio: ScoreRange::from_values(
                non_stable.iter().map(|c| c.vol_mcap_ratio),
                fallback.vol_mcap_ratio,
            ),
            price_change_24h: ScoreRange::from_values(
                non_stable.iter().filter_map(|c| c.price_change_percentage_24h),
                fallback.price_change_24h,
            ),
            price_change_7d: ScoreRange::from_values(
                non_stable.iter().filter_map(|c| c.price_change_percentage_7d),
                fallback.price_change_7d,
            ),
        }
    }

    pub fn rank(
        &self,
        coins: Vec<CoinRecord>,
        trending: &TrendingSet,
        exclude_blue_chips: bool,
    ) -> Vec<CoinRecord> {
        self.rank_at(coins, trending, exclude_blue_chips, Utc::now())
    }

    /// Score every coin against `now`, drop the ineligible ones, and return
    /// the rest sorted by descending `trend_score` with dense 1-based ranks.
    /// Ties keep their input order.
    pub fn rank_at(
        &self,
        coins: Vec<CoinRecord>,
        trending: &TrendingSet,
        exclude_blue_chips: bool,
        now: DateTime<Utc>,
    ) -> Vec<CoinRecord> {
        let start = std::time::Instant::now();
        let total = coins.len();
        let ranges = self.compute_ranges(&coins);

        tracing::debug!(
            "Ranking {} coins, ranges vmr={:?} 24h={:?} 7d={:?}",
            total,
            ranges.vol_mcap_ratio,
            ranges.price_change_24h,
            ranges.price_change_7d
        );

        let mut scored: Vec<CoinRecord> = coins
            .into_iter()
            .filter_map(|mut coin| {
                let breakdown =
                    self.scorer
                        .breakdown(&coin, trending, &ranges, exclude_blue_chips, now)?;
                coin.trend_score = Some(breakdown.total);
                coin.newly_listed = breakdown.newly_listed;
                Some(coin)
            })
            .collect();

        scored.sort_by(|a, b| {
            let a = a.trend_score.unwrap_or(0.0);
            let b = b.trend_score.unwrap_or(0.0);
            b.total_cmp(&a)
        });

        for (i, coin) in scored.iter_mut().enumerate() {
            coin.rank = Some(i + 1);
        }

        let filtered = total - scored.len();
        let elapsed = start.elapsed();
        tracing::debug!(
            "Ranked {} coins ({} filtered) in {:?}",
            scored.len(),
            filtered,
            elapsed
        );
        metrics::histogram!("ranking_pass_duration_ms").record(elapsed.as_secs_f64() * 1000.0);
        metrics::counter!("ranking_filtered_coins").increment(filtered as u64);

        scored
    }
}

/// Rank a snapshot with the default tuning. `trending_coins` may mix the
/// nested and flat record shapes; entries without an id are ignored.
pub fn rank_coins(
    market_coins: Vec<CoinRecord>,
    trending_coins: Option<&[TrendingEntry]>,
    exclude_blue_chips: bool,
) -> Vec<CoinRecord> {
    let trending = trending_coins
        .map(TrendingSet::from_entries)
        .unwrap_or_default();
    Ranker::default().rank(market_coins, &trending, exclude_blue_chips)
}

// crates/universe/src/scoring.rs
use crate::filter::EligibilityFilter;
use crate::normalise::ScoreRange;
use crate::weights::ScoringConfig;
use chrono::{DateTime, Utc};
use common::{CoinRecord, TrendingSet};

/// Multiplier for a missing price-change figure: slightly discouraging,
/// not disqualifying
const MISSING_PRICE_CHANGE: f64 = 0.4;
/// Multiplier for coins absent from the trending list
const OFF_TRENDING_BASELINE: f64 = 0.05;
/// Multiplier for an unknown market-cap rank, treated as small-cap-like
const UNKNOWN_RANK: f64 = 0.7;

/// Per-metric bounds for one ranking pass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRanges {
    pub vol_mcap_ratio: ScoreRange,
    pub price_change_24h: ScoreRange,
    pub price_change_7d: ScoreRange,
}

impl ScoreRanges {
    /// Used per metric when the corpus has no values for it
    pub const FALLBACK: ScoreRanges = ScoreRanges {
        vol_mcap_ratio: ScoreRange::new(0.0, 1.0),
        price_change_24h: ScoreRange::new(-50.0, 200.0),
        price_change_7d: ScoreRange::new(-50.0, 400.0),
    };
}

impl Default for ScoreRanges {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Weighted contribution of each term to one coin's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreBreakdown {
    pub price_change_24h: f64,
    pub vol_mcap_ratio: f64,
    pub trending: f64,
    pub price_change_7d: f64,
    pub market_cap_rank: f64,
    pub newly_listed_bonus: f64,
    pub newly_listed: bool,
    /// Sum of the above, clamped to [0, 1]
    pub total: f64,
}

/// Momentum scorer for a single coin
#[derive(Debug, Clone, Default)]
pub struct CoinScorer {
    config: ScoringConfig,
    filter: EligibilityFilter,
}

impl CoinScorer {
    pub fn new(config: ScoringConfig) -> Self {
        let filter = EligibilityFilter::new(config.blue_chip_rank_cutoff);
        Self { config, filter }
    }

    pub fn with_extra_stablecoins<I, S>(mut self, ids: I, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.filter = self.filter.with_extra_stablecoins(ids, symbols);
        self
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    pub fn filter(&self) -> &EligibilityFilter {
        &self.filter
    }

    /// All-time low within the configured window. Missing or unparseable
    /// dates are never new.
    pub fn is_newly_listed(&self, coin: &CoinRecord, now: DateTime<Utc>) -> bool {
        let Some(atl_date) = coin.atl_date.as_deref().filter(|s| !s.is_empty()) else {
            return false;
        };
        match DateTime::parse_from_rfc3339(atl_date) {
            Ok(dt) => {
                let age_days = (now - dt.with_timezone(&Utc)).num_days();
                age_days <= self.config.newly_listed_window_days
            }
            Err(_) => false,
        }
    }

    /// Momentum score in [0, 1], or `None` when the coin is not eligible
    /// for ranking.
    pub fn score(
        &self,
        coin: &CoinRecord,
        trending: &TrendingSet,
        ranges: &ScoreRanges,
        exclude_blue_chips: bool,
        now: DateTime<Utc>,
    ) -> Option<f64> {
        self.breakdown(coin, trending, ranges, exclude_blue_chips, now)
            .map(|b| b.total)
    }

    pub fn breakdown(
        &self,
        coin: &CoinRecord,
        trending: &TrendingSet,
        ranges: &ScoreRanges,
        exclude_blue_chips: bool,
        now: DateTime<Utc>,
    ) -> Option<ScoreBreakdown> {
        if !self.filter.is_eligible(coin, exclude_blue_chips) {
            return None;
        }

        let w = &self.config.weights;

        let price_change_24h = w.price_change_24h
            * Self::price_change_term(coin.price_change_percentage_24h, &ranges.price_change_24h);

        let vol_mcap_ratio = w.vol_mcap_ratio * ranges.vol_mcap_ratio.log(coin.vol_mcap_ratio);

        let trending = if trending.contains(&coin.id) {
            w.trending
        } else {
            w.trending * OFF_TRENDING_BASELINE
        };

        let price_change_7d = w.price_change_7d
            * Self::price_change_term(coin.price_change_percentage_7d, &ranges.price_change_7d);

        let market_cap_rank = w.market_cap_rank
            * match coin.market_cap_rank {
                Some(rank) => {
                    let floor = if exclude_blue_chips {
                        self.config.blue_chip_rank_cutoff
                    } else {
                        1
                    };
                    ScoreRange::new(floor as f64, self.config.rank_ceiling as f64)
                        .linear(rank as f64)
                }
                None => UNKNOWN_RANK,
            };

        let newly_listed = self.is_newly_listed(coin, now);
        let newly_listed_bonus = if newly_listed {
            self.config.newly_listed_bonus
        } else {
            0.0
        };

        let total = (price_change_24h
            + vol_mcap_ratio
            + trending
            + price_change_7d
            + market_cap_rank
            + newly_listed_bonus)
            .clamp(0.0, 1.0);

        Some(ScoreBreakdown {
            price_change_24h,
            vol_mcap_ratio,
            trending,
            price_change_7d,
            market_cap_rank,
            newly_listed_bonus,
            newly_listed,
            total,
        })
    }

    fn price_change_term(pct: Option<f64>, range: &ScoreRange) -> f64 {
        match pct.filter(|v| v.is_finite()) {
            Some(pct) => range.linear(pct),
            None => MISSING_PRICE_CHANGE,
        }
    }
}

// crates/universe/src/weights.rs
//! Scoring weights and tuning constants.

use serde::{Deserialize, Serialize};

/// Weights of the five normalised momentum terms. Tuned to sum to 1.0; the
/// sum is not enforced when scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Short burst spike, the biggest signal
    pub price_change_24h: f64,
    /// Volume relative to size
    pub vol_mcap_ratio: f64,
    /// Trending / gainers list membership
    pub trending: f64,
    /// Sustained run over a week
    pub price_change_7d: f64,
    /// Preference for small caps
    pub market_cap_rank: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            price_change_24h: 0.30,
            vol_mcap_ratio:   0.25,
            trending:         0.20,
            price_change_7d:  0.15,
            market_cap_rank:  0.10,
        }
    }
}

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.as_array().iter().sum()
    }

    /// Validate that all weights sum to ~1.0
    pub fn validate(&self) -> bool {
        (self.sum() - 1.0).abs() < 1e-6
    }

    /// Renormalise weights so they sum to 1.0
    pub fn normalise(&mut self) {
        let sum = self.sum();
        if sum > 0.0 {
            self.price_change_24h /= sum;
            self.vol_mcap_ratio   /= sum;
            self.trending         /= sum;
            self.price_change_7d  /= sum;
            self.market_cap_rank  /= sum;
        }
    }

    pub fn as_array(&self) -> [f64; 5] {
        [
            self.price_change_24h,
            self.vol_mcap_ratio,
            self.trending,
            self.price_change_7d,
            self.market_cap_rank,
        ]
    }
}

/// Everything the scorer is tuned by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub weights: ScoringWeights,
    /// Flat bonus on top of the weighted terms
    pub newly_listed_bonus: f64,
    /// Max age of the all-time-low date for a coin to count as newly listed
    pub newly_listed_window_days: i64,
    /// Ranks at or above this are blue chips
    pub blue_chip_rank_cutoff: u32,
    /// Ranks at or past this get the full rank term
    pub rank_ceiling: u32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            weights: ScoringWeights::default(),
            newly_listed_bonus: 0.05,
            newly_listed_window_days: 180,
            blue_chip_rank_cutoff: 20,
            rank_ceiling: 500,
        }
    }
}

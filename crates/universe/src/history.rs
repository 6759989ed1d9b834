// crates/universe/src/history.rs
//! Rolling per-coin score history, used to derive score velocity between
//! successive scans.

use chrono::{DateTime, Utc};
use common::CoinRecord;
use std::collections::{HashMap, VecDeque};

/// Samples kept per coin unless configured otherwise
pub const DEFAULT_HISTORY_CAPACITY: usize = 30;

/// Bounded `(timestamp, score)` ring per coin id. Oldest samples are evicted
/// first once a coin reaches capacity.
#[derive(Debug, Clone)]
pub struct ScoreHistory {
    capacity: usize,
    samples: HashMap<String, VecDeque<(DateTime<Utc>, f64)>>,
}

impl Default for ScoreHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl ScoreHistory {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            samples: HashMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Record the score of every ranked coin. Coins without an id or score
    /// are skipped.
    pub fn record(&mut self, coins: &[CoinRecord], at: DateTime<Utc>) {
        for coin in coins {
            let Some(score) = coin.trend_score else {
                continue;
            };
            if coin.id.is_empty() {
                continue;
            }
            self.push(&coin.id, at, score);
        }
    }

    pub fn push(&mut self, id: &str, at: DateTime<Utc>, score: f64) {
        let capacity = self.capacity;
        let ring = self
            .samples
            .entry(id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(capacity));
        ring.push_back((at, score));
        while ring.len() > capacity {
            ring.pop_front();
        }
    }

    /// Change between the oldest and newest retained score, rounded to four
    /// decimals. Needs at least two samples.
    pub fn velocity(&self, id: &str) -> Option<f64> {
        let ring = self.samples.get(id)?;
        if ring.len() < 2 {
            return None;
        }
        let (_, first) = ring.front()?;
        let (_, last) = ring.back()?;
        Some(((last - first) * 10_000.0).round() / 10_000.0)
    }

    pub fn latest(&self, id: &str) -> Option<f64> {
        self.samples.get(id)?.back().map(|(_, score)| *score)
    }

    pub fn samples(&self, id: &str) -> impl Iterator<Item = &(DateTime<Utc>, f64)> {
        self.samples.get(id).into_iter().flatten()
    }

    /// Number of coins tracked
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

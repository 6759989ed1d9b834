// crates/universe/src/lib.rs
//! Momentum scoring and ranking for a market snapshot.
//!
//! The pipeline is pure and synchronous: callers hand over already fetched
//! coin records plus the trending ids and get back the eligible coins,
//! scored, sorted and ranked.

pub mod filter;
pub mod history;
pub mod movers;
pub mod normalise;
pub mod ranker;
pub mod scoring;
pub mod signal;
pub mod weights;

pub use filter::EligibilityFilter;
pub use history::ScoreHistory;
pub use movers::top_movers;
pub use normalise::{normalize_linear, normalize_log, ScoreRange};
pub use ranker::{rank_coins, Ranker};
pub use scoring::{CoinScorer, ScoreBreakdown, ScoreRanges};
pub use signal::MomentumSignal;
pub use weights::{ScoringConfig, ScoringWeights};

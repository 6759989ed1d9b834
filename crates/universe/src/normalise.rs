// crates/universe/src/normalise.rs
//! Range normalisation for the scoring terms. Both functions are total and
//! always land in [0, 1].

/// Linear min-max normalisation, clamped.
/// A degenerate range (`hi <= lo`) is neutral and yields 0.5.
pub fn normalize_linear(value: f64, lo: f64, hi: f64) -> f64 {
    if !(hi > lo) {
        return 0.5;
    }
    let norm = ((value - lo) / (hi - lo)).clamp(0.0, 1.0);
    if norm.is_nan() { 0.5 } else { norm }
}

/// `log(1 + x)` compressed min-max normalisation, for metrics spanning
/// orders of magnitude (vol/mcap). Non-positive values and degenerate ranges
/// carry no signal and yield 0.0. `lo` is floored at zero before compression.
pub fn normalize_log(value: f64, lo: f64, hi: f64) -> f64 {
    if !(value > 0.0) || !(hi > lo) {
        return 0.0;
    }
    let lv = value.ln_1p();
    let ll = lo.max(0.0).ln_1p();
    let lh = hi.ln_1p();
    if !(lh > ll) {
        // Only reachable when hi <= 0, i.e. the range collapses once lo is
        // floored at zero
        return 0.5;
    }
    let norm = ((lv - ll) / (lh - ll)).clamp(0.0, 1.0);
    if norm.is_nan() { 0.0 } else { norm }
}

/// Inclusive `(lo, hi)` bounds for one metric
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreRange {
    pub lo: f64,
    pub hi: f64,
}

impl ScoreRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    /// Min/max of the finite values, or `fallback` when there are none
    pub fn from_values<I>(values: I, fallback: ScoreRange) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<ScoreRange>, v| match acc {
                None => Some(ScoreRange::new(v, v)),
                Some(r) => Some(ScoreRange::new(r.lo.min(v), r.hi.max(v))),
            })
            .unwrap_or(fallback)
    }

    pub fn linear(&self, value: f64) -> f64 {
        normalize_linear(value, self.lo, self.hi)
    }

    pub fn log(&self, value: f64) -> f64 {
        normalize_log(value, self.lo, self.hi)
    }
}

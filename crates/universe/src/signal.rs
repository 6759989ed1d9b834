// crates/universe/src/signal.rs
use serde::{Deserialize, Serialize};
use std::fmt;

/// vol/mcap above this counts as heavy trading
const HIGH_VOLUME_RATIO: f64 = 0.25;

/// Coarse reading of a coin's score, its velocity and its trading volume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MomentumSignal {
    StrongMomentum,
    VolSpike,
    Fading,
    Accumulation,
    LowSignal,
    NoData,
}

impl MomentumSignal {
    /// First matching rule wins. Missing velocity counts as rising.
    pub fn classify(score: Option<f64>, velocity: Option<f64>, vmr: Option<f64>) -> Self {
        let Some(score) = score else {
            return MomentumSignal::NoData;
        };
        let rising = velocity.is_none_or(|v| v >= 0.0);
        let falling = velocity.is_some_and(|v| v < 0.0);
        let high_volume = vmr.is_some_and(|v| v > HIGH_VOLUME_RATIO);

        if score >= 0.78 && rising {
            MomentumSignal::StrongMomentum
        } else if score >= 0.62 && high_volume {
            MomentumSignal::VolSpike
        } else if score < 0.32 && falling {
            MomentumSignal::Fading
        } else if high_volume && score >= 0.45 {
            MomentumSignal::Accumulation
        } else {
            MomentumSignal::LowSignal
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MomentumSignal::StrongMomentum => "STRONG MOMENTUM",
            MomentumSignal::VolSpike => "VOL SPIKE",
            MomentumSignal::Fading => "FADING",
            MomentumSignal::Accumulation => "ACCUMULATION?",
            MomentumSignal::LowSignal => "LOW SIGNAL",
            MomentumSignal::NoData => "NO DATA",
        }
    }
}

impl fmt::Display for MomentumSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

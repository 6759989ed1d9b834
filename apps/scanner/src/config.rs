// apps/scanner/src/config.rs
use adapters::ApiConfig;
use common::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use universe::{CoinScorer, ScoringConfig};

pub const DEFAULT_CONFIG_PATH: &str = "config/scanner.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    pub scoring: ScoringSection,
    pub api: ApiConfig,
    pub scan: ScanSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ScoringSection {
    #[serde(flatten)]
    pub tuning: ScoringConfig,
    pub extra_stablecoin_ids: Vec<String>,
    pub extra_stablecoin_symbols: Vec<String>,
}

impl ScoringSection {
    pub fn scorer(&self) -> CoinScorer {
        CoinScorer::new(self.tuning.clone())
            .with_extra_stablecoins(&self.extra_stablecoin_ids, &self.extra_stablecoin_symbols)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanSection {
    /// Rows printed per scan
    pub show_top: usize,
    pub exclude_blue_chips: bool,
    pub watch_interval_secs: u64,
    /// Score samples kept per coin in watch mode
    pub history_capacity: usize,
}

impl Default for ScanSection {
    fn default() -> Self {
        Self {
            show_top: 20,
            exclude_blue_chips: true,
            watch_interval_secs: 120,
            history_capacity: universe::history::DEFAULT_HISTORY_CAPACITY,
        }
    }
}

impl ScannerConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }
}

/// Read the config file, falling back to built-in defaults when the default
/// path is absent, then apply environment overrides.
pub fn load_config(path: Option<&Path>) -> Result<ScannerConfig> {
    let mut config = match path {
        Some(path) => {
            let text = std::fs::read_to_string(path).map_err(|e| {
                Error::Config(format!("Failed to read config {}: {}", path.display(), e))
            })?;
            ScannerConfig::parse(&text)?
        }
        None => match std::fs::read_to_string(DEFAULT_CONFIG_PATH) {
            Ok(text) => ScannerConfig::parse(&text)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_PATH);
                ScannerConfig::default()
            }
            Err(e) => return Err(e.into()),
        },
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    if !config.scoring.tuning.weights.validate() {
        tracing::warn!(
            "Scoring weights sum to {:.3}, expected 1.00",
            config.scoring.tuning.weights.sum()
        );
    }

    Ok(config)
}

fn apply_env_overrides<F>(config: &mut ScannerConfig, var: F) -> Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = var("COINGECKO_BASE_URL") {
        config.api.base_url = url;
    }
    if let Some(n) = var("SCANNER_FETCH_TOP_N") {
        config.api.fetch_top_n = n
            .parse()
            .map_err(|_| Error::Config(format!("SCANNER_FETCH_TOP_N is not a number: {}", n)))?;
    }
    Ok(())
}

// crates/universe/src/filter.rs
use common::CoinRecord;
use std::collections::HashSet;

/// Stablecoin ids, always excluded
pub const STABLECOIN_IDS: &[&str] = &[
    "tether", "usd-coin", "binance-usd", "dai", "true-usd", "pax-dollar",
    "frax", "usdd", "neutrino", "gemini-dollar", "liquity-usd", "fei-usd",
    "flex-usd", "celo-dollar", "terrausd", "terra-usd", "usdp", "nusd",
    "usdk", "usdx", "dola-usd", "bean", "euro-coin", "first-digital-usd",
    "paypal-usd", "usde", "ethena-usde", "mountain-protocol-usdm",
    "usual-usd", "resolv-usr", "sky-usds",
];

/// Stablecoin ticker symbols, always excluded
pub const STABLECOIN_SYMBOLS: &[&str] = &[
    "usdt", "usdc", "busd", "dai", "tusd", "usdp", "usdd", "frax",
    "lusd", "susd", "gusd", "cusd", "eurc", "pyusd", "fdusd", "usde",
    "usds", "usdm", "usr", "usd+", "usd0", "crvusd", "mkusd",
];

/// Decides which coins may be scored at all
#[derive(Debug, Clone)]
pub struct EligibilityFilter {
    stablecoin_ids: HashSet<String>,
    stablecoin_symbols: HashSet<String>,
    blue_chip_rank_cutoff: u32,
}

impl Default for EligibilityFilter {
    fn default() -> Self {
        Self::new(20)
    }
}

impl EligibilityFilter {
    pub fn new(blue_chip_rank_cutoff: u32) -> Self {
        Self {
            stablecoin_ids: STABLECOIN_IDS.iter().map(|s| s.to_string()).collect(),
            stablecoin_symbols: STABLECOIN_SYMBOLS.iter().map(|s| s.to_string()).collect(),
            blue_chip_rank_cutoff,
        }
    }

    /// Extend the deny-lists. The built-in entries always stay.
    pub fn with_extra_stablecoins<I, S>(mut self, ids: I, symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.stablecoin_ids
            .extend(ids.into_iter().map(|s| s.as_ref().to_lowercase()));
        self.stablecoin_symbols
            .extend(symbols.into_iter().map(|s| s.as_ref().to_lowercase()));
        self
    }

    pub fn blue_chip_rank_cutoff(&self) -> u32 {
        self.blue_chip_rank_cutoff
    }

    pub fn is_stablecoin(&self, coin: &CoinRecord) -> bool {
        self.stablecoin_ids.contains(&coin.id.to_lowercase())
            || self.stablecoin_symbols.contains(&coin.symbol.to_lowercase())
    }

    /// Unknown rank never counts as a blue chip
    pub fn is_blue_chip(&self, coin: &CoinRecord) -> bool {
        coin.market_cap_rank
            .is_some_and(|rank| rank <= self.blue_chip_rank_cutoff)
    }

    pub fn is_eligible(&self, coin: &CoinRecord, exclude_blue_chips: bool) -> bool {
        if self.is_stablecoin(coin) {
            return false;
        }
        !(exclude_blue_chips && self.is_blue_chip(coin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, symbol: &str, rank: Option<u32>) -> CoinRecord {
        CoinRecord {
            market_cap_rank: rank,
            ..CoinRecord::new(id, symbol, id)
        }
    }

    #[test]
    fn test_stablecoins_always_excluded() {
        let filter = EligibilityFilter::default();

        assert!(!filter.is_eligible(&coin("tether", "usdt", Some(3)), false));
        assert!(!filter.is_eligible(&coin("Some-Wrapped-Thing", "USDC", Some(400)), false));
        assert!(!filter.is_eligible(&coin("DAI", "xyz", None), true));
    }

    #[test]
    fn test_blue_chip_cutoff() {
        let filter = EligibilityFilter::default();

        assert!(!filter.is_eligible(&coin("bitcoin", "btc", Some(1)), true));
        assert!(!filter.is_eligible(&coin("edge", "edg", Some(20)), true));
        assert!(filter.is_eligible(&coin("edge", "edg", Some(21)), true));
        assert!(filter.is_eligible(&coin("bitcoin", "btc", Some(1)), false));
    }

    #[test]
    fn test_unknown_rank_is_eligible() {
        let filter = EligibilityFilter::default();
        assert!(filter.is_eligible(&coin("mystery", "mys", None), true));
    }

    #[test]
    fn test_extra_stablecoins() {
        let filter = EligibilityFilter::default()
            .with_extra_stablecoins(vec!["New-Stable"], vec!["NUSD2"]);

        assert!(filter.is_stablecoin(&coin("new-stable", "abc", None)));
        assert!(filter.is_stablecoin(&coin("other", "nusd2", None)));
        assert!(filter.is_stablecoin(&coin("tether", "usdt", None)));
    }
}

// crates/common/src/lib.rs
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

pub mod error;

pub use error::{Error, Result};

/// Ratio of 24h volume to market cap. Zero when the market cap is unknown or
/// non-positive, never negative.
pub fn vol_mcap_ratio(total_volume: Option<f64>, market_cap: Option<f64>) -> f64 {
    let volume = total_volume.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0);
    match market_cap {
        Some(mcap) if mcap.is_finite() && mcap > 0.0 => volume / mcap,
        _ => 0.0,
    }
}

/// One coin from a market scan.
///
/// Market fields are optional because the upstream API omits or nulls them
/// freely. `trend_score`, `rank` and `newly_listed` are filled in by the
/// ranker and stay at their defaults for coins that were filtered out.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoinRecord {
    pub id: String,
    pub symbol: String,
    pub name: String,

    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub price_change_percentage_7d: Option<f64>,
    pub total_volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub market_cap_rank: Option<u32>,
    pub atl_date: Option<String>,

    /// Precomputed at ingestion, see [`vol_mcap_ratio`]
    pub vol_mcap_ratio: f64,
    /// Downsampled 7d hourly prices
    pub sparkline: Vec<f64>,

    pub trend_score: Option<f64>,
    pub rank: Option<usize>,
    pub newly_listed: bool,
}

impl CoinRecord {
    pub fn new(id: impl Into<String>, symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn refresh_vol_mcap_ratio(&mut self) {
        self.vol_mcap_ratio = vol_mcap_ratio(self.total_volume, self.market_cap);
    }

    /// Overlay a lightweight price poll onto a full scan record
    pub fn apply_price_update(&mut self, update: &PriceUpdate) {
        if update.current_price.is_some() {
            self.current_price = update.current_price;
        }
        if update.price_change_percentage_24h.is_some() {
            self.price_change_percentage_24h = update.price_change_percentage_24h;
        }
        self.market_cap = Some(update.market_cap);
        self.total_volume = Some(update.total_volume);
        self.vol_mcap_ratio = update.vol_mcap_ratio;
    }
}

/// Result of a simple price lookup for one coin id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceUpdate {
    pub current_price: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub market_cap: f64,
    pub total_volume: f64,
    pub vol_mcap_ratio: f64,
}

/// Identity fields of a trending-list record.
///
/// `coin_id` arrives as a number from the trending endpoint and as a string
/// from scraped sources, so both ids are read leniently.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrendingItem {
    #[serde(default, deserialize_with = "lenient_id")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub coin_id: Option<String>,
}

impl TrendingItem {
    /// Lower-cased `id`, falling back to `coin_id`. `None` when both are empty.
    pub fn key(&self) -> Option<String> {
        [&self.id, &self.coin_id]
            .into_iter()
            .flatten()
            .map(|s| s.trim().to_lowercase())
            .find(|s| !s.is_empty())
    }
}

/// The two shapes trending records come in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrendingEntry {
    Nested { item: TrendingItem },
    Flat(TrendingItem),
}

impl TrendingEntry {
    /// Canonical entry for a bare harvested id
    pub fn from_id(id: &str) -> Self {
        let id = id.to_lowercase();
        TrendingEntry::Nested {
            item: TrendingItem {
                id: Some(id.clone()),
                coin_id: Some(id),
            },
        }
    }

    pub fn item(&self) -> &TrendingItem {
        match self {
            TrendingEntry::Nested { item } | TrendingEntry::Flat(item) => item,
        }
    }

    pub fn key(&self) -> Option<String> {
        self.item().key()
    }
}

/// Append harvested ids that are not already present (by `id` or `coin_id`)
/// as canonical nested entries. Returns how many were added.
pub fn merge_trending_ids<I, S>(entries: &mut Vec<TrendingEntry>, ids: I) -> usize
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut known: HashSet<String> = entries
        .iter()
        .flat_map(|e| {
            let item = e.item();
            [item.id.clone(), item.coin_id.clone()]
        })
        .flatten()
        .map(|s| s.to_lowercase())
        .collect();

    let mut added = 0;
    for id in ids {
        let id = id.as_ref().trim().to_lowercase();
        if id.is_empty() || !known.insert(id.clone()) {
            continue;
        }
        entries.push(TrendingEntry::from_id(&id));
        added += 1;
    }
    added
}

/// Lower-cased coin ids currently on a trending list
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrendingSet(HashSet<String>);

impl TrendingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries without a usable id are skipped
    pub fn from_entries(entries: &[TrendingEntry]) -> Self {
        Self(entries.iter().filter_map(TrendingEntry::key).collect())
    }

    pub fn insert(&mut self, id: &str) -> bool {
        let id = id.trim().to_lowercase();
        if id.is_empty() {
            return false;
        }
        self.0.insert(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(&id.to_lowercase())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TrendingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = TrendingSet::new();
        for id in iter {
            set.insert(id.as_ref());
        }
        set
    }
}

fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vol_mcap_ratio() {
        assert!((vol_mcap_ratio(Some(500.0), Some(1000.0)) - 0.5).abs() < 1e-12);
        assert_eq!(vol_mcap_ratio(Some(500.0), Some(0.0)), 0.0);
        assert_eq!(vol_mcap_ratio(Some(500.0), None), 0.0);
        assert_eq!(vol_mcap_ratio(None, Some(1000.0)), 0.0);
        assert_eq!(vol_mcap_ratio(Some(-5.0), Some(1000.0)), 0.0);
    }

    #[test]
    fn test_coin_record_defaults_from_sparse_json() {
        let coin: CoinRecord = serde_json::from_value(json!({
            "id": "pepe",
            "symbol": "pepe",
            "market_cap_rank": null,
            "some_unknown_field": 42
        }))
        .unwrap();

        assert_eq!(coin.id, "pepe");
        assert_eq!(coin.market_cap_rank, None);
        assert_eq!(coin.vol_mcap_ratio, 0.0);
        assert_eq!(coin.trend_score, None);
        assert!(!coin.newly_listed);
    }

    #[test]
    fn test_apply_price_update() {
        let mut coin = CoinRecord::new("pepe", "pepe", "Pepe");
        coin.price_change_percentage_24h = Some(12.0);

        coin.apply_price_update(&PriceUpdate {
            current_price: Some(0.00001),
            price_change_percentage_24h: None,
            market_cap: 2_000.0,
            total_volume: 1_000.0,
            vol_mcap_ratio: 0.5,
        });

        assert_eq!(coin.current_price, Some(0.00001));
        assert_eq!(coin.price_change_percentage_24h, Some(12.0));
        assert_eq!(coin.vol_mcap_ratio, 0.5);
    }

    #[test]
    fn test_trending_entry_shapes() {
        let entries: Vec<TrendingEntry> = serde_json::from_value(json!([
            { "item": { "id": "Pepe", "coin_id": 29850, "name": "Pepe" } },
            { "id": "BONK" },
            { "coin_id": "wif" },
            { "item": { "id": "" } },
            { "name": "no id at all" }
        ]))
        .unwrap();

        assert!(matches!(entries[0], TrendingEntry::Nested { .. }));
        assert!(matches!(entries[1], TrendingEntry::Flat(_)));
        assert_eq!(entries[0].key().as_deref(), Some("pepe"));
        assert_eq!(entries[1].key().as_deref(), Some("bonk"));
        assert_eq!(entries[2].key().as_deref(), Some("wif"));
        assert_eq!(entries[3].key(), None);
        assert_eq!(entries[4].key(), None);

        let set = TrendingSet::from_entries(&entries);
        assert_eq!(set.len(), 3);
        assert!(set.contains("PEPE"));
        assert!(set.contains("bonk"));
    }

    #[test]
    fn test_merge_trending_ids() {
        let mut entries = vec![
            TrendingEntry::Nested {
                item: TrendingItem { id: Some("pepe".into()), coin_id: None },
            },
            TrendingEntry::Flat(TrendingItem { id: None, coin_id: Some("wif".into()) }),
        ];

        let added = merge_trending_ids(&mut entries, ["pepe", "WIF", "bonk", "", "bonk"]);

        assert_eq!(added, 1);
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[2], TrendingEntry::from_id("bonk"));
    }

    #[test]
    fn test_trending_set_skips_empty() {
        let set: TrendingSet = ["Pepe", "", "  "].into_iter().collect();
        assert_eq!(set.len(), 1);
        assert!(!set.contains(""));
    }
}

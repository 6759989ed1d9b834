// crates/universe/tests/ranking_pipeline.rs
use chrono::{DateTime, Duration, Utc};
use common::{CoinRecord, TrendingEntry, TrendingSet};
use serde_json::json;
use universe::{rank_coins, CoinScorer, Ranker, ScoreHistory, ScoringConfig};

fn snapshot(now: DateTime<Utc>) -> Vec<CoinRecord> {
    serde_json::from_value(json!([
        {
            "id": "bitcoin", "symbol": "btc", "name": "Bitcoin",
            "current_price": 64000.0,
            "price_change_percentage_24h": 1.2,
            "price_change_percentage_7d": 4.0,
            "market_cap_rank": 1,
            "vol_mcap_ratio": 0.03
        },
        {
            "id": "tether", "symbol": "usdt", "name": "Tether",
            "price_change_percentage_24h": 0.01,
            "market_cap_rank": 3,
            "vol_mcap_ratio": 0.6
        },
        {
            "id": "frogcoin", "symbol": "frog", "name": "Frog Coin",
            "price_change_percentage_24h": 85.0,
            "price_change_percentage_7d": 210.0,
            "market_cap_rank": 412,
            "vol_mcap_ratio": 1.8,
            "atl_date": (now - Duration::days(20)).to_rfc3339()
        },
        {
            "id": "sleepy", "symbol": "zzz", "name": "Sleepy",
            "price_change_percentage_24h": -4.0,
            "price_change_percentage_7d": -10.0,
            "market_cap_rank": 150,
            "vol_mcap_ratio": 0.01,
            "atl_date": "2019-03-14T00:00:00.000Z"
        },
        {
            "id": "ghost", "symbol": "boo"
        }
    ]))
    .unwrap()
}

#[test]
fn test_pipeline_end_to_end() {
    let now = Utc::now();
    let trending: Vec<TrendingEntry> = serde_json::from_value(json!([
        { "item": { "id": "frogcoin", "coin_id": 12345 } },
        { "id": "sleepy" },
        { "item": { "name": "missing id" } }
    ]))
    .unwrap();

    let ranked = rank_coins(snapshot(now), Some(&trending), true);

    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids[0], "frogcoin");
    assert!(!ids.contains(&"bitcoin"));
    assert!(!ids.contains(&"tether"));
    assert_eq!(ids.len(), 3);

    let ranks: Vec<usize> = ranked.iter().filter_map(|c| c.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);

    let frog = &ranked[0];
    assert!(frog.newly_listed);
    assert!(frog.trend_score.unwrap() <= 1.0);

    let ghost = ranked.iter().find(|c| c.id == "ghost").unwrap();
    let ghost_score = ghost.trend_score.unwrap();
    assert!(ghost_score.is_finite() && (0.0..=1.0).contains(&ghost_score));
}

#[test]
fn test_blue_chips_shown_when_requested() {
    let now = Utc::now();
    let ranked = Ranker::default().rank_at(snapshot(now), &TrendingSet::new(), false, now);

    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert!(ids.contains(&"bitcoin"));
    assert!(!ids.contains(&"tether"));
}

#[test]
fn test_custom_config_and_extra_stablecoins() {
    let now = Utc::now();
    let mut config = ScoringConfig::default();
    config.blue_chip_rank_cutoff = 200;
    let scorer = CoinScorer::new(config).with_extra_stablecoins(vec!["ghost"], vec![]);

    let ranked = Ranker::new(scorer).rank_at(snapshot(now), &TrendingSet::new(), true, now);

    let ids: Vec<&str> = ranked.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["frogcoin"]);
}

#[test]
fn test_history_tracks_successive_passes() {
    let now = Utc::now();
    let ranker = Ranker::default();
    let mut history = ScoreHistory::new(5);

    let first = ranker.rank_at(snapshot(now), &TrendingSet::new(), true, now);
    history.record(&first, now);

    let trending: TrendingSet = ["sleepy"].into_iter().collect();
    let later = now + Duration::minutes(2);
    let second = ranker.rank_at(snapshot(now), &trending, true, later);
    history.record(&second, later);

    assert!(history.velocity("sleepy").unwrap() > 0.18);
    assert_eq!(history.velocity("frogcoin"), Some(0.0));
    assert_eq!(history.len(), 3);
}

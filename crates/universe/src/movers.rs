// crates/universe/src/movers.rs
use common::CoinRecord;

/// Top `n` gainers (24h change descending) and bottom `n` losers (ascending)
/// among coins that report a 24h change.
pub fn top_movers(coins: &[CoinRecord], n: usize) -> (Vec<CoinRecord>, Vec<CoinRecord>) {
    let mut by_change: Vec<&CoinRecord> = coins
        .iter()
        .filter(|c| c.price_change_percentage_24h.is_some_and(f64::is_finite))
        .collect();
    by_change.sort_by(|a, b| change_24h(b).total_cmp(&change_24h(a)));

    let gainers = by_change.iter().take(n).map(|c| (*c).clone()).collect();

    let tail = by_change.len().saturating_sub(n);
    let mut losers: Vec<CoinRecord> = by_change[tail..].iter().map(|c| (*c).clone()).collect();
    losers.sort_by(|a, b| change_24h(a).total_cmp(&change_24h(b)));

    (gainers, losers)
}

fn change_24h(coin: &CoinRecord) -> f64 {
    coin.price_change_percentage_24h.unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, pct: Option<f64>) -> CoinRecord {
        CoinRecord {
            price_change_percentage_24h: pct,
            ..CoinRecord::new(id, id, id)
        }
    }

    #[test]
    fn test_top_movers() {
        let coins = vec![
            coin("a", Some(5.0)),
            coin("b", Some(-12.0)),
            coin("c", None),
            coin("d", Some(40.0)),
            coin("e", Some(-3.0)),
        ];

        let (gainers, losers) = top_movers(&coins, 2);

        let g: Vec<&str> = gainers.iter().map(|c| c.id.as_str()).collect();
        let l: Vec<&str> = losers.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(g, vec!["d", "a"]);
        assert_eq!(l, vec!["b", "e"]);
    }

    #[test]
    fn test_top_movers_small_input() {
        let coins = vec![coin("a", Some(1.0))];
        let (gainers, losers) = top_movers(&coins, 15);
        assert_eq!(gainers.len(), 1);
        assert_eq!(losers.len(), 1);
        assert!(top_movers(&[], 5).0.is_empty());
    }
}

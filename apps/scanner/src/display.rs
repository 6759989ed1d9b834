// apps/scanner/src/display.rs
use common::{CoinRecord, PriceUpdate};
use universe::MomentumSignal;

pub const DISCLAIMER: &str = "NOT FINANCIAL ADVICE. Small caps are extremely high risk. Scores = momentum only.";

pub fn format_price(price: Option<f64>) -> String {
    match price {
        None => "N/A".to_string(),
        Some(p) if p >= 1.0 => format!("${}", with_thousands(p, 2)),
        Some(p) if p >= 0.01 => format!("${:.4}", p),
        Some(p) if p >= 0.0001 => format!("${:.6}", p),
        Some(p) => {
            let s = format!("{:.10}", p);
            format!("${}", s.trim_end_matches('0').trim_end_matches('.'))
        }
    }
}

pub fn format_pct(pct: Option<f64>) -> String {
    match pct {
        Some(p) => format!("{:+.2}%", p),
        None => "N/A".to_string(),
    }
}

fn with_thousands(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if value < 0.0 { "-" } else { "" };
    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

/// One table row for a ranked coin
pub fn format_coin(coin: &CoinRecord, velocity: Option<f64>) -> String {
    let symbol = coin.symbol.to_uppercase();
    let name: String = coin.name.chars().take(18).collect();
    let new_flag = if coin.newly_listed { " [NEW]" } else { "" };
    let cap_rank = coin
        .market_cap_rank
        .map(|r| r.to_string())
        .unwrap_or_else(|| "-".to_string());
    let velocity_str = velocity
        .map(|v| format!(" vel:{:+.4}", v))
        .unwrap_or_default();
    let signal = MomentumSignal::classify(coin.trend_score, velocity, Some(coin.vol_mcap_ratio));

    format!(
        "  {:>3}. {:<8} {:<18}{} {:<14} 24h:{:<9} 7d:{:<9} v/mc:{:<6.3} score:{:.3} cap#{}{}  {}",
        coin.rank.unwrap_or(0),
        symbol,
        name,
        new_flag,
        format_price(coin.current_price),
        format_pct(coin.price_change_percentage_24h),
        format_pct(coin.price_change_percentage_7d),
        coin.vol_mcap_ratio,
        coin.trend_score.unwrap_or(0.0),
        cap_rank,
        velocity_str,
        signal
    )
}

pub fn format_price_update(id: &str, update: &PriceUpdate) -> String {
    format!(
        "  {:<24} {:<14} 24h:{:<9} v/mc:{:.3}",
        id,
        format_price(update.current_price),
        format_pct(update.price_change_percentage_24h),
        update.vol_mcap_ratio
    )
}

pub fn print_header(count: usize, exclude_blue_chips: bool) {
    let rule = "=".repeat(95);
    println!();
    println!("{rule}");
    println!("  {DISCLAIMER}");
    if exclude_blue_chips {
        println!("  Blue chips (top 20 by market cap) are hidden. Use --include-blue-chips to show them.");
    }
    println!("{rule}");
    println!();
    println!("Top {count} by momentum score  [v/mc = vol/market-cap ratio]");
    println!();
}

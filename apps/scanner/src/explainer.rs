// apps/scanner/src/explainer.rs
//! Plain-language glossary for every figure the scanner prints.

pub struct Explainer {
    pub term: &'static str,
    pub short: &'static str,
    pub explanation: &'static str,
}

pub const EXPLAINERS: &[Explainer] = &[
    Explainer {
        term: "Trend score",
        short: "Momentum number (0-1). Higher = more action right now.",
        explanation: "Five signals are combined into one number: how much the price spiked today, \
            whether trading volume is large relative to the coin's size, whether it is on trending \
            lists, how it did over the last week, and how small the coin is. A high score means \
            the coin is getting attention right now. It does NOT mean it will go up.",
    },
    Explainer {
        term: "Vol / MCap ratio",
        short: "Trading volume divided by market cap. The best 'something is happening' signal.",
        explanation: "If a coin is worth $1 million in total and $2 million of it traded in one day, \
            the ratio is 2.0: the whole coin changed hands twice. Large coins sit around 0.01-0.05. \
            A small cap mid-run shows 0.5, 1.0 or more. It can also mean a dump is already under way.",
    },
    Explainer {
        term: "24h %",
        short: "Price change in the last 24 hours.",
        explanation: "How much the price moved in one day. A coin that is up 100% in a day is just \
            as capable of losing 80% the next. This is a momentum signal, not a safe entry point.",
    },
    Explainer {
        term: "7d %",
        short: "Price change over the last 7 days.",
        explanation: "Same idea as 24h but over a week. A big weekly run with a modest day may be \
            exhausted; a modest week with a big day may be just starting. Both feed the score.",
    },
    Explainer {
        term: "Price",
        short: "Current price in USD per coin.",
        explanation: "A coin at $0.000001 is not cheaper or better than one at $50. A low price just \
            means a huge circulating supply. Market cap is what matters.",
    },
    Explainer {
        term: "Market cap rank",
        short: "Size ranking vs all other coins. Lower rank # = bigger coin.",
        explanation: "Rank 1 is the largest coin, rank 500 a tiny project. The scanner favours \
            ranks roughly 20-500, where coins move more and fail more. The top 20 are hidden by default.",
    },
    Explainer {
        term: "Trending bonus",
        short: "Whether the coin appears on trending or gainers lists.",
        explanation: "Trending lists reflect what people are searching for. Being on one means a lot \
            of people are looking at the coin right now, which earns a large score boost.",
    },
    Explainer {
        term: "New / recently listed",
        short: "Coin that appears to have been listed recently.",
        explanation: "Flagged when the all-time low was within the last 6 months, a rough proxy for \
            a recent listing. New listings move fast but have no history and thin liquidity. \
            Highest risk category.",
    },
    Explainer {
        term: "Velocity",
        short: "Change in score across recent scans (watch mode).",
        explanation: "The difference between the newest and oldest remembered score for a coin. \
            Positive means momentum is building, negative means it is fading.",
    },
    Explainer {
        term: "Signal",
        short: "Coarse label derived from score, velocity and vol/mcap.",
        explanation: "STRONG MOMENTUM: high score and not falling. VOL SPIKE: good score on heavy \
            volume. FADING: low score and falling. ACCUMULATION?: heavy volume with a middling \
            score. Everything else is LOW SIGNAL.",
    },
    Explainer {
        term: "Blue chips (hidden by default)",
        short: "Top 20 coins by market cap.",
        explanation: "Big, established coins rarely produce the kind of momentum this tool tracks. \
            Use --include-blue-chips to show them.",
    },
];

pub fn format_for_cli() -> String {
    let rule = "-".repeat(70);
    let mut lines = vec![String::new(), rule.clone(), "WHAT DOES THIS STUFF MEAN?".to_string(), rule, String::new()];
    for e in EXPLAINERS {
        lines.push(format!("  * {}", e.term));
        lines.push(format!("    {}", e.short));
        lines.push(format!("    {}", e.explanation));
        lines.push(String::new());
    }
    lines.push("This is not financial advice. Small caps can go to zero. Only risk money you'd be fine losing entirely.".to_string());
    lines.push(String::new());
    lines.join("\n")
}

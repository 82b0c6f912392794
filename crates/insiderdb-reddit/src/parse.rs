//! Free-text extraction of insider-transaction claims from Reddit posts.
//!
//! Posts are noisy prose, so every field beyond the ticker and direction is
//! best-effort: each regex matches independently and a miss yields `None`
//! for that field rather than rejecting the post.

use std::sync::LazyLock;

use insiderdb_core::{ParsedAlert, TransactionType};
use regex::Regex;
use rust_decimal::Decimal;

use crate::client::RedditPost;

/// A post must carry at least one of these markers to be considered.
const MARKERS: [&str; 3] = ["insider", "form 4", "sec filing"];

/// Buy keywords are checked before sell keywords, so a post containing both
/// (e.g. quoting "sold to cover" while describing a purchase) classifies as
/// Buy. First-match order, pinned by test.
const BUY_KEYWORDS: [&str; 3] = ["buy", "purchased", "acquired"];
const SELL_KEYWORDS: [&str; 3] = ["sell", "sold", "disposed"];

/// Cashtag: `$` followed by 1-5 letters.
static TICKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z]{1,5})\b").expect("valid ticker regex"));

/// Dollar amount with a magnitude suffix (`$1.9M`) or comma grouping
/// (`$250,000`).
static AMOUNT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\d+(?:\.\d+)?\s?[KMBkmb]\b|\$\d{1,3}(?:,\d{3})+").expect("valid amount regex")
});

static SHARES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,3}(?:,\d{3})+|\d+)\s+shares").expect("valid shares regex")
});

static PRICE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$(\d+(?:\.\d+)?)\s+per\s+share").expect("valid price regex")
});

static TRADE_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)trade\s*date:?\s*(\d{4}-\d{2}-\d{2})").expect("valid trade date regex")
});

static FILING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)filing\s*date:?\s*(\d{4}-\d{2}-\d{2})").expect("valid filing date regex")
});

/// Name-shape patterns tried in order; first match wins.
static NAME_RES: LazyLock<[Regex; 3]> = LazyLock::new(|| {
    [
        // Title followed by a name: "CEO Richard Pops", "Director Jane Q Smith".
        Regex::new(
            r"(?:CEO|CFO|COO|CTO|Chairman|President|Director|Officer|Insider)\s+([A-Z][a-zA-Z'\-]+(?:\s+[A-Z]\.?)?\s+[A-Z][a-zA-Z'\-]+)",
        )
        .expect("valid name regex"),
        // "... by Richard Pops".
        Regex::new(r"\bby\s+([A-Z][a-zA-Z'\-]+(?:\s+[A-Z]\.?)?\s+[A-Z][a-zA-Z'\-]+)")
            .expect("valid name regex"),
        // Name followed by a parenthesised role: "Richard Pops (CEO)".
        Regex::new(
            r"([A-Z][a-zA-Z'\-]+\s+[A-Z][a-zA-Z'\-]+)\s+\((?:CEO|CFO|COO|CTO|Chairman|President|Director|Officer|10% Owner)\)",
        )
        .expect("valid name regex"),
    ]
});

/// Extract a structured alert from a post, or `None` when the post is not an
/// insider-transaction claim (no marker, no cashtag, or no classifiable
/// direction).
#[must_use]
pub fn parse_insider_alert(post: &RedditPost) -> Option<ParsedAlert> {
    let text = format!("{}\n{}", post.title, post.selftext);
    let lower = text.to_lowercase();

    if !MARKERS.iter().any(|marker| lower.contains(marker)) {
        return None;
    }

    let ticker = TICKER_RE.captures(&text)?[1].to_uppercase();

    let transaction_type = if BUY_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TransactionType::Buy
    } else if SELL_KEYWORDS.iter().any(|kw| lower.contains(kw)) {
        TransactionType::Sell
    } else {
        return None;
    };

    let amount = AMOUNT_RE.find(&text).map(|m| m.as_str().to_string());
    let shares = SHARES_RE
        .captures(&text)
        .and_then(|caps| caps[1].replace(',', "").parse::<i64>().ok());
    let price_per_share = PRICE_RE
        .captures(&text)
        .and_then(|caps| caps[1].parse::<Decimal>().ok());
    let trade_date = TRADE_DATE_RE
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());
    let filing_date = FILING_DATE_RE
        .captures(&text)
        .and_then(|caps| caps[1].parse().ok());
    let insider_name = NAME_RES
        .iter()
        .find_map(|re| re.captures(&text))
        .map(|caps| caps[1].trim().to_string());

    Some(ParsedAlert {
        post_id: post.id.clone(),
        ticker,
        transaction_type,
        amount,
        shares,
        price_per_share,
        trade_date,
        filing_date,
        insider_name,
        permalink: format!("https://reddit.com{}", post.permalink),
    })
}

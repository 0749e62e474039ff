use super::*;
use chainfeed_core::{ChainFeed, ContractType, OptionContract};
use chrono::NaiveDate;

fn contract(expiry: NaiveDate) -> OptionContract {
    OptionContract {
        contract_type: ContractType::Call,
        strike: 100.0,
        expiry,
        bid: None,
        ask: None,
        mark: None,
        iv: None,
        delta: None,
        gamma: None,
        theta: None,
        vega: None,
        oi: None,
        volume: None,
        updated: None,
    }
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn distinct_expiries_dedupes_and_sorts() {
    let contracts = vec![contract(date("2026-08-15")), contract(date("2026-08-01")), contract(date("2026-08-15"))];
    assert_eq!(distinct_expiries(&contracts), vec![date("2026-08-01"), date("2026-08-15")]);
}

#[test]
fn within_dte_window_keeps_only_the_configured_range() {
    let today = date("2026-08-01");
    let expiries = vec![date("2026-07-31"), date("2026-08-01"), date("2026-08-05"), date("2026-08-20")];
    let windowed = within_dte_window(&expiries, today, 10);
    assert_eq!(windowed, vec![date("2026-08-01"), date("2026-08-05")]);
}

#[test]
fn summarize_filters_to_the_window_and_counts_correctly() {
    let chain = ChainFeed::new(
        "SPX",
        "polygon",
        chrono::Utc::now(),
        vec![contract(date("2026-08-01")), contract(date("2026-08-03")), contract(date("2026-09-01"))],
    );
    let summary = summarize(&chain, date("2026-08-01"), 10);
    assert_eq!(summary.symbol, "SPX");
    assert_eq!(summary.count, 2);
    assert_eq!(summary.valid_expirations, vec![date("2026-08-01"), date("2026-08-03")]);
}

#[test]
fn is_valid_expiration_checks_any_contract_regardless_of_window() {
    let chain = ChainFeed::new("SPX", "polygon", chrono::Utc::now(), vec![contract(date("2026-12-18"))]);
    assert!(is_valid_expiration(&chain, date("2026-12-18")));
    assert!(!is_valid_expiration(&chain, date("2026-12-19")));
}

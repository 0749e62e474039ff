// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The market-state validator: a pure function deciding whether a symbol's
//! market is open right now. No bus access, no clock injection beyond the
//! `DateTime<Tz>` argument — every caller (synthetic spot worker, feed
//! orchestrator startup) passes in `Utc::now().with_timezone(&America::New_York)`
//! or a fixed instant from a test.

use chrono::{DateTime, Datelike, TimeZone, Timelike, Weekday};
use chrono_tz::Tz;

/// Symbols whose weekly option series expire on Friday and should be
/// treated as closed after the weekly close rather than the ordinary
/// post-market rule.
const WEEKLY_OPTIONS_SYMBOLS: &[&str] = &["SPX", "SPY", "ES", "NDX", "QQQ", "NQ"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketValidation {
    pub valid: bool,
    pub reason: String,
}

impl MarketValidation {
    fn valid() -> Self {
        Self { valid: true, reason: "market open".to_string() }
    }

    fn invalid(reason: impl Into<String>) -> Self {
        Self { valid: false, reason: reason.into() }
    }
}

/// Evaluate whether `symbol`'s market is open at `now` (already converted
/// to US/Eastern by the caller). No holiday calendar — see DESIGN.md.
pub fn validate_market_state(now: DateTime<Tz>, symbol: &str) -> MarketValidation {
    let weekday = now.weekday();
    if weekday == Weekday::Sat || weekday == Weekday::Sun {
        return MarketValidation::invalid(format!("weekend, next open {}", next_open_description(weekday)));
    }

    let minutes_since_midnight = now.hour() * 60 + now.minute();
    let open = 9 * 60 + 30;
    let close = 16 * 60;

    if minutes_since_midnight < open {
        return MarketValidation::invalid("pre-market");
    }

    if minutes_since_midnight >= close {
        if weekday == Weekday::Fri && WEEKLY_OPTIONS_SYMBOLS.contains(&symbol) {
            return MarketValidation::invalid("weekly expired");
        }
        return MarketValidation::invalid("post-market");
    }

    MarketValidation::valid()
}

fn next_open_description(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sat => "Monday 09:30 ET",
        Weekday::Sun => "Monday 09:30 ET",
        _ => "next session 09:30 ET",
    }
}

/// Convenience: validate using the real wall clock in US/Eastern.
pub fn validate_market_state_now(symbol: &str) -> MarketValidation {
    let now = chrono_tz::America::New_York.from_utc_datetime(&chrono::Utc::now().naive_utc());
    validate_market_state(now, symbol)
}

#[cfg(test)]
#[path = "market_state_tests.rs"]
mod tests;

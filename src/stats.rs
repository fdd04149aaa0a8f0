use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use crate::types::LoginEvent;

/// Accounts whose last login is older than this many days count as inactive.
pub const INACTIVE_DAYS_THRESHOLD: i64 = 10;

pub const PREMIUM_SUBSCRIPTION: &str = "premium";

/// Summary of the login table.
///
/// Ratios are pre-formatted with three decimals. On an empty table
/// `avg_followers` is `"0.000"` and `most_common_country` is `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total_users: u64,
    pub premium_users: u64,
    pub premium_percentage: String,
    pub avg_followers: String,
    pub most_common_country: Option<String>,
    pub weekly_logins: u64,
    pub monthly_logins: u64,
    pub inactive_users_count: u64,
    pub country_counts: BTreeMap<String, u64>,
}

/// Computes [`Statistics`] over all login events.
///
/// Weekly and monthly buckets are taken from `last_login_time` converted to
/// `tz`; only the most recent bucket of each kind is reported. Inactivity is
/// a UTC date comparison against `now`.
pub fn compute_statistics<Tz: TimeZone>(
    events: &[LoginEvent],
    now: DateTime<Utc>,
    tz: &Tz,
) -> Statistics {
    let total_users = events.len() as u64;
    let premium_users = events
        .iter()
        .filter(|e| e.subscription_level == PREMIUM_SUBSCRIPTION)
        .count() as u64;

    let premium_percentage = if total_users > 0 {
        premium_users as f64 / total_users as f64 * 100.0
    } else {
        0.0
    };

    let avg_followers = if total_users > 0 {
        events.iter().map(|e| e.follower_count as f64).sum::<f64>() / total_users as f64
    } else {
        0.0
    };

    let mut country_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut weekly: BTreeMap<(i32, u32), u64> = BTreeMap::new();
    let mut monthly: BTreeMap<(i32, u32), u64> = BTreeMap::new();

    for event in events {
        *country_counts.entry(event.country.clone()).or_default() += 1;

        let local = event.last_login_time.with_timezone(tz).date_naive();
        *weekly
            .entry((local.year(), week_of_year(local)))
            .or_default() += 1;
        *monthly.entry((local.year(), local.month())).or_default() += 1;
    }

    let threshold = now.date_naive() - Duration::days(INACTIVE_DAYS_THRESHOLD);
    let inactive_users_count = events
        .iter()
        .filter(|e| e.last_login_time.date_naive() < threshold)
        .count() as u64;

    Statistics {
        total_users,
        premium_users,
        premium_percentage: format!("{:.3}", premium_percentage),
        avg_followers: format!("{:.3}", avg_followers),
        most_common_country: most_common(&country_counts),
        weekly_logins: latest_bucket(&weekly),
        monthly_logins: latest_bucket(&monthly),
        inactive_users_count,
        country_counts,
    }
}

/// Monday-based week of the calendar year, as `strftime("%W")` numbers it:
/// the first Monday opens week 1, earlier days belong to week 0.
pub fn week_of_year(date: NaiveDate) -> u32 {
    // `%W` always renders two digits
    date.format("%W").to_string().parse().unwrap_or_default()
}

// BTreeMap iterates keys ascending, so on equal counts the smallest country wins.
fn most_common(counts: &BTreeMap<String, u64>) -> Option<String> {
    let mut best: Option<(&String, u64)> = None;
    for (country, &count) in counts {
        match best {
            Some((_, best_count)) if best_count >= count => {}
            _ => best = Some((country, count)),
        }
    }
    best.map(|(country, _)| country.clone())
}

fn latest_bucket(buckets: &BTreeMap<(i32, u32), u64>) -> u64 {
    buckets
        .last_key_value()
        .map(|(_, count)| *count)
        .unwrap_or(0)
}

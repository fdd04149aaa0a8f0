use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::{DateTime, TimeZone, Utc};
use rand::{Rng, distr::Alphanumeric};
use sha2::{Digest, Sha256};

use crate::types::{LoginEvent, LoginTableRow};

pub fn generate_code_verifier() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(128)
        .map(char::from)
        .collect()
}

pub fn generate_code_challenge(verifier: &str) -> String {
    let hash = Sha256::digest(verifier.as_bytes());
    URL_SAFE_NO_PAD.encode(hash)
}

/// Renders a UTC timestamp in `tz` as `YYYY-MM-DD HH:MM:SS`.
pub fn format_local<Tz: TimeZone>(time: &DateTime<Utc>, tz: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.with_timezone(tz).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn login_table_rows<Tz: TimeZone>(events: &[LoginEvent], tz: &Tz) -> Vec<LoginTableRow>
where
    Tz::Offset: std::fmt::Display,
{
    events
        .iter()
        .map(|e| LoginTableRow {
            user_id: e.user_id.clone(),
            last_login: format_local(&e.last_login_time, tz),
            subscription: e.subscription_level.clone(),
            display_name: e.display_name.clone(),
            followers: e.follower_count,
            country: e.country.clone(),
        })
        .collect()
}

/// `m:ss` rendering of a track length.
pub fn format_duration(duration_ms: u64) -> String {
    let total_secs = duration_ms / 1000;
    format!("{}:{:02}", total_secs / 60, total_secs % 60)
}

/// First `max` entries joined with `", "`.
pub fn join_limited(values: &[String], max: usize) -> String {
    values
        .iter()
        .take(max)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

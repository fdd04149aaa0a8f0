use chrono::{Local, TimeZone, Utc};

use crate::{config, error, info, management::LoginStore, stats::Statistics};

/// Prints login statistics, as a status block or as JSON.
pub async fn stats(json: bool) {
    let store = super::login_store().await;
    let statistics = match config::stats_utc_offset() {
        Ok(Some(offset)) => load(&store, &offset).await,
        Ok(None) => load(&store, &Local).await,
        Err(e) => error!("{}", e),
    };

    if json {
        match serde_json::to_string_pretty(&statistics) {
            Ok(out) => println!("{}", out),
            Err(e) => error!("Failed to serialize statistics. Err: {}", e),
        }
        return;
    }

    print_statistics(&statistics);
}

async fn load<Tz: TimeZone>(store: &LoginStore, tz: &Tz) -> Statistics {
    match store.statistics(Utc::now(), tz).await {
        Ok(statistics) => statistics,
        Err(e) => error!("Failed to compute statistics. Err: {}", e),
    }
}

fn print_statistics(s: &Statistics) {
    info!("Total users: {}", s.total_users);
    info!("Premium users: {} ({}%)", s.premium_users, s.premium_percentage);
    info!("Average followers: {}", s.avg_followers);
    info!(
        "Most common country: {}",
        s.most_common_country.as_deref().unwrap_or("-")
    );
    info!("Logins this week: {}", s.weekly_logins);
    info!("Logins this month: {}", s.monthly_logins);
    info!("Inactive users: {}", s.inactive_users_count);
}

use std::fmt::Display;

use chrono::{Local, TimeZone};
use tabled::Table;

use crate::{config, error, info, management::LoginStore, success, utils, warning};

/// Lists recorded logins, newest first, in the configured time zone.
pub async fn list_logins() {
    let store = super::login_store().await;
    match config::stats_utc_offset() {
        Ok(Some(offset)) => print_logins(&store, &offset).await,
        Ok(None) => print_logins(&store, &Local).await,
        Err(e) => error!("{}", e),
    }
}

async fn print_logins<Tz: TimeZone>(store: &LoginStore, tz: &Tz)
where
    Tz::Offset: Display,
{
    let events = match store.list_logins().await {
        Ok(events) => events,
        Err(e) => error!("Failed to load logins. Err: {}", e),
    };

    if events.is_empty() {
        info!("No logins recorded yet. Run spotstat auth.");
        return;
    }

    println!("{}", Table::new(utils::login_table_rows(&events, tz)));
}

/// Deletes the login row of one account.
pub async fn remove_login(user_id: String) {
    let store = super::login_store().await;
    match store.remove(&user_id).await {
        Ok(true) => success!("Removed login record of {}.", user_id),
        Ok(false) => warning!("No login recorded for {}.", user_id),
        Err(e) => error!("Failed to remove login. Err: {}", e),
    }
}

use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use sqlx::{
    Row,
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow},
};

use crate::{
    error::Result,
    stats::{self, Statistics},
    types::{LoginEvent, UserProfile},
};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const UNKNOWN: &str = "unknown";

/// Profile snapshot written on every successful authentication.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogin {
    pub user_id: String,
    pub subscription_level: String,
    pub display_name: String,
    pub follower_count: u64,
    pub country: String,
}

impl From<&UserProfile> for NewLogin {
    fn from(profile: &UserProfile) -> Self {
        Self {
            user_id: profile.id.clone(),
            subscription_level: profile.product.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            display_name: profile
                .display_name
                .clone()
                .unwrap_or_else(|| profile.id.clone()),
            follower_count: profile.followers.total,
            country: profile.country.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        }
    }
}

/// SQLite-backed `user_logins` table, one row per account.
pub struct LoginStore {
    pool: SqlitePool,
}

impl LoginStore {
    /// Opens (and creates if missing) the database file and its schema.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(
                SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true),
            )
            .await?;

        Self::with_pool(pool).await
    }

    /// Private in-memory database. The single connection is never recycled,
    /// otherwise the data would vanish with it.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        let schema = include_str!("schema.sql");
        for statement in schema.split(';') {
            let stmt = statement.trim();
            if !stmt.is_empty() {
                sqlx::query(stmt).execute(&pool).await?;
            }
        }
        Ok(Self { pool })
    }

    /// Inserts the account if unknown, otherwise overwrites every mutable
    /// field and moves `last_login_time` to `now` (second precision).
    pub async fn record_login(&self, login: &NewLogin, now: DateTime<Utc>) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_logins (user_id, last_login_time, sub_level, display_name, followers, country)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                last_login_time = excluded.last_login_time,
                sub_level = excluded.sub_level,
                display_name = excluded.display_name,
                followers = excluded.followers,
                country = excluded.country
            "#,
        )
        .bind(&login.user_id)
        .bind(now.format(TIMESTAMP_FORMAT).to_string())
        .bind(&login.subscription_level)
        .bind(&login.display_name)
        .bind(login.follower_count as i64)
        .bind(&login.country)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// All accounts, most recent login first.
    pub async fn list_logins(&self) -> Result<Vec<LoginEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT user_id, last_login_time, sub_level, display_name, followers, country
            FROM user_logins
            ORDER BY last_login_time DESC, user_id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_event).collect()
    }

    pub async fn find(&self, user_id: &str) -> Result<Option<LoginEvent>> {
        let row = sqlx::query(
            r#"
            SELECT user_id, last_login_time, sub_level, display_name, followers, country
            FROM user_logins
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_event).transpose()
    }

    /// Operator-side deletion. Returns whether a row was removed.
    pub async fn remove(&self, user_id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM user_logins WHERE user_id = ?")
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<u64> {
        let count: i64 = sqlx::query("SELECT COUNT(*) AS count FROM user_logins")
            .fetch_one(&self.pool)
            .await?
            .try_get("count")?;

        Ok(count as u64)
    }

    pub async fn statistics<Tz: TimeZone>(&self, now: DateTime<Utc>, tz: &Tz) -> Result<Statistics> {
        let events = self.list_logins().await?;
        Ok(stats::compute_statistics(&events, now, tz))
    }
}

fn row_to_event(row: &SqliteRow) -> Result<LoginEvent> {
    let raw_time: String = row.try_get("last_login_time")?;
    let last_login_time = NaiveDateTime::parse_from_str(&raw_time, TIMESTAMP_FORMAT)
        .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
        .and_utc();
    let followers: i64 = row.try_get("followers")?;

    Ok(LoginEvent {
        user_id: row.try_get("user_id")?,
        last_login_time,
        subscription_level: row.try_get("sub_level")?,
        display_name: row.try_get("display_name")?,
        follower_count: followers.max(0) as u64,
        country: row.try_get("country")?,
    })
}

use std::{path::PathBuf, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config,
    error::{Error, Result},
    types::{Token, TokenResponse},
};

/// Refresh once fewer than this many seconds of validity remain.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Persistence for the OAuth token of the signed-in account.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn load(&self) -> Result<Option<Token>>;
    async fn save(&self, token: &Token) -> Result<()>;
}

/// Exchanges a refresh token for a fresh access token.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    async fn refresh(&self, refresh_token: &str) -> Result<TokenResponse>;
}

/// JSON file in the data directory (`cache/token.json`).
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn default_path() -> PathBuf {
        config::data_dir().join("cache/token.json")
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new(Self::default_path())
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        if !self.path.is_file() {
            return Ok(None);
        }
        let content = async_fs::read_to_string(&self.path).await?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    async fn save(&self, token: &Token) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            async_fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(token)?;
        async_fs::write(&self.path, json).await?;
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<Token>>,
}

impl MemoryTokenStore {
    pub fn new(token: Option<Token>) -> Self {
        Self {
            token: Mutex::new(token),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<Token>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &Token) -> Result<()> {
        *self.token.lock().await = Some(token.clone());
        Ok(())
    }
}

/// Builds a [`Token`] from an endpoint response. The refresh token of the
/// previous grant is kept when the response does not rotate it.
pub fn token_from_response(response: TokenResponse, previous_refresh: Option<&str>, now: u64) -> Token {
    let refresh_token = response
        .refresh_token
        .or_else(|| previous_refresh.map(str::to_string))
        .unwrap_or_default();

    Token {
        access_token: response.access_token,
        refresh_token,
        scope: response.scope,
        expires_in: response.expires_in,
        obtained_at: now,
    }
}

pub fn needs_refresh(token: &Token, now: u64) -> bool {
    token.remaining(now) < REFRESH_MARGIN_SECS
}

/// Hands out access tokens, refreshing and persisting them on demand.
pub struct TokenManager {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    token: Token,
}

impl TokenManager {
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>, token: Token) -> Self {
        TokenManager {
            store,
            refresher,
            token,
        }
    }

    /// Loads the stored token.
    ///
    /// # Errors
    ///
    /// [`Error::Auth`] when nothing has been stored yet.
    pub async fn load(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Result<Self> {
        let token = store
            .load()
            .await?
            .ok_or_else(|| Error::Auth("no stored token, please run spotstat auth".to_string()))?;
        Ok(Self::new(store, refresher, token))
    }

    pub async fn get_valid_token(&mut self) -> Result<String> {
        self.get_valid_token_at(Utc::now().timestamp() as u64).await
    }

    pub async fn get_valid_token_at(&mut self, now: u64) -> Result<String> {
        if needs_refresh(&self.token, now) {
            let response = self.refresher.refresh(&self.token.refresh_token).await?;
            self.token = token_from_response(response, Some(&self.token.refresh_token), now);
            self.store.save(&self.token).await?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    config, error,
    management::{FileTokenStore, NewLogin, TokenStore},
    spotify::{self, SpotifyClient},
    success,
    types::PkceToken,
    warning,
};

/// Authorizes with Spotify, stores the token and records the login.
pub async fn auth(shared_state: Arc<Mutex<Option<PkceToken>>>) {
    let token = match spotify::auth::auth(shared_state).await {
        Ok(token) => token,
        Err(e) => error!("{}", e),
    };

    if let Err(e) = FileTokenStore::default().save(&token).await {
        error!("Failed to save token to cache: {}", e);
    }
    success!("Authentication successful!");

    let client = SpotifyClient::new(config::spotify_apiurl(), token.access_token.clone());
    let profile = match client.current_user().await {
        Ok(profile) => profile,
        Err(e) => {
            warning!("Could not fetch profile, login not recorded. Err: {}", e);
            return;
        }
    };

    let login = NewLogin::from(&profile);
    let store = super::login_store().await;
    match store.record_login(&login, Utc::now()).await {
        Ok(()) => success!("Login recorded for {}.", login.display_name),
        Err(e) => warning!("Failed to record login. Err: {}", e),
    }
}

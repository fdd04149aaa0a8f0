//! # CLI Module
//!
//! User-facing commands of spotstat. Each command resolves its collaborators
//! (token, Spotify client, login database), delegates to the library layer
//! and renders the outcome as colored status lines or tables.
//!
//! ```text
//! CLI layer (this module)
//!     ↓
//! management (login store, token store)   spotify (Web API client)
//!     ↓                                        ↓
//! SQLite                                   reqwest
//! ```
//!
//! Errors from the layers below end here: they are printed with [`error!`]
//! (which exits with status 1) or downgraded to a [`warning!`] where the
//! command can still produce useful output.
//!
//! ## Usage
//!
//! ```bash
//! spotstat auth                     # authorize and record the login
//! spotstat stats                    # login statistics
//! spotstat search "Houdini" --type track
//! spotstat playlists add <ID> "Houdini"
//! ```

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::{config, error, management::LoginStore, spotify::SpotifyClient};

mod artists;
mod auth;
mod logins;
mod me;
mod playlists;
mod search;
mod stats;

pub use artists::artist_overview;
pub use artists::follow_artist;
pub use artists::list_artists;
pub use artists::unfollow_artist;
pub use auth::auth;
pub use logins::list_logins;
pub use logins::remove_login;
pub use me::me;
pub use playlists::add_to_playlist;
pub use playlists::create_playlist;
pub use playlists::edit_playlist;
pub use playlists::follow_playlist;
pub use playlists::list_playlists;
pub use playlists::remove_from_playlist;
pub use playlists::show_playlist;
pub use search::search;
pub use stats::stats;

async fn client() -> SpotifyClient {
    match SpotifyClient::from_env().await {
        Ok(client) => client,
        Err(e) => error!("Failed to load token. Please run spotstat auth\n Error: {}", e),
    }
}

async fn login_store() -> LoginStore {
    let path = config::database_path();
    match LoginStore::open(&path).await {
        Ok(store) => store,
        Err(e) => error!("Cannot open login database {}. Err: {}", path.display(), e),
    }
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
        pb.set_style(style.tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏"));
    }
    pb
}

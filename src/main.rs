use std::sync::Arc;

use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use spotstat::{
    cli, config, error,
    spotify::SearchKind,
    types::{EditPlaylistRequest, PkceToken},
};
use tokio::sync::Mutex;

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize with Spotify API and record the login
    Auth,

    /// Show the current profile
    Me(MeOptions),

    /// Search the Spotify catalogue
    Search(SearchOptions),

    /// Recorded logins
    Logins(LoginsOptions),

    /// Login statistics
    Stats(StatsOptions),

    /// Handle followed artists
    Artists(ArtistsOptions),

    /// Handle playlists
    Playlists(PlaylistsOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct MeOptions {
    /// Include top tracks and artists
    #[clap(long)]
    pub top: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    pub query: String,

    /// Item type to search for
    #[clap(long = "type", value_enum, default_value_t = SearchKind::Track)]
    pub kind: SearchKind,
}

#[derive(Parser, Debug, Clone)]
pub struct LoginsOptions {
    #[command(subcommand)]
    pub command: Option<LoginsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum LoginsSubcommand {
    /// List recorded logins, newest first
    List,
    /// Delete the login record of an account
    Remove { user_id: String },
}

#[derive(Parser, Debug, Clone)]
pub struct StatsOptions {
    /// Print as JSON
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
#[command(
    about = "Handle followed artists",
    args_conflicts_with_subcommands = true // disallow mixing --search with subcommands
)]
pub struct ArtistsOptions {
    /// Filter followed artists by name
    #[clap(long)]
    pub search: Option<String>,

    #[command(subcommand)]
    pub command: Option<ArtistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum ArtistsSubcommand {
    /// List followed artists
    List,
    /// Follow an artist by ID
    Follow { artist_id: String },
    /// Unfollow an artist by ID
    Unfollow { artist_id: String },
    /// Details, albums, top tracks and related artists of an artist
    Show { name: String },
}

#[derive(Parser, Debug, Clone)]
pub struct PlaylistsOptions {
    #[command(subcommand)]
    pub command: Option<PlaylistsSubcommand>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum PlaylistsSubcommand {
    /// List own and followed playlists
    List,
    /// Show the tracks of a playlist
    Show { playlist_id: String },
    /// Create a playlist
    Create {
        name: String,
        #[clap(long, default_value = "")]
        description: String,
        #[clap(long)]
        public: bool,
    },
    /// Change name, description or visibility
    Edit {
        playlist_id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        description: Option<String>,
        #[clap(long, action = ArgAction::Set)]
        public: Option<bool>,
    },
    /// Follow a playlist
    Follow { playlist_id: String },
    /// Add the best matching track for a song name
    Add { playlist_id: String, song: String },
    /// Remove all occurrences of the first track matching a song name
    Remove { playlist_id: String, song: String },
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => {
            let oauth_result: Arc<Mutex<Option<PkceToken>>> = Arc::new(Mutex::new(None));
            cli::auth(Arc::clone(&oauth_result)).await;
        }
        Command::Me(opt) => cli::me(opt.top).await,
        Command::Search(opt) => cli::search(opt.query, opt.kind).await,
        Command::Logins(opt) => match opt.command {
            Some(LoginsSubcommand::Remove { user_id }) => cli::remove_login(user_id).await,
            Some(LoginsSubcommand::List) | None => cli::list_logins().await,
        },
        Command::Stats(opt) => cli::stats(opt.json).await,
        Command::Artists(opt) => match opt.command {
            Some(ArtistsSubcommand::Follow { artist_id }) => cli::follow_artist(artist_id).await,
            Some(ArtistsSubcommand::Unfollow { artist_id }) => {
                cli::unfollow_artist(artist_id).await
            }
            Some(ArtistsSubcommand::Show { name }) => cli::artist_overview(name).await,
            Some(ArtistsSubcommand::List) | None => cli::list_artists(opt.search).await,
        },
        Command::Playlists(opt) => match opt.command {
            Some(PlaylistsSubcommand::Show { playlist_id }) => {
                cli::show_playlist(playlist_id).await
            }
            Some(PlaylistsSubcommand::Create {
                name,
                description,
                public,
            }) => cli::create_playlist(name, description, public).await,
            Some(PlaylistsSubcommand::Edit {
                playlist_id,
                name,
                description,
                public,
            }) => {
                let changes = EditPlaylistRequest {
                    name,
                    description,
                    public,
                };
                cli::edit_playlist(playlist_id, changes).await
            }
            Some(PlaylistsSubcommand::Follow { playlist_id }) => {
                cli::follow_playlist(playlist_id).await
            }
            Some(PlaylistsSubcommand::Add { playlist_id, song }) => {
                cli::add_to_playlist(playlist_id, song).await
            }
            Some(PlaylistsSubcommand::Remove { playlist_id, song }) => {
                cli::remove_from_playlist(playlist_id, song).await
            }
            Some(PlaylistsSubcommand::List) | None => cli::list_playlists().await,
        },
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}

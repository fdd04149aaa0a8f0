use tabled::{Table, Tabled};

use crate::{error, info, warning};

#[derive(Tabled)]
struct TopTrackRow {
    rank: usize,
    name: String,
    artists: String,
    album: String,
}

#[derive(Tabled)]
struct TopArtistRow {
    rank: usize,
    name: String,
}

/// Shows the current profile and, with `top`, the top tracks and artists.
pub async fn me(top: bool) {
    let client = super::client().await;

    let profile = match client.current_user().await {
        Ok(profile) => profile,
        Err(e) => error!("Failed to fetch profile. Err: {}", e),
    };

    info!(
        "Display name: {}",
        profile.display_name.as_deref().unwrap_or(&profile.id)
    );
    info!("User ID: {}", profile.id);
    if let Some(email) = &profile.email {
        info!("Email: {}", email);
    }
    info!("Subscription: {}", profile.product.as_deref().unwrap_or("unknown"));
    info!("Country: {}", profile.country.as_deref().unwrap_or("unknown"));
    info!("Followers: {}", profile.followers.total);

    if !top {
        return;
    }

    let pb = super::spinner("Fetching top items...");
    let top_items = client.top_items().await;
    pb.finish_and_clear();

    match top_items {
        Ok(items) => {
            println!(
                "{}",
                Table::new(items.tracks.into_iter().enumerate().map(|(i, t)| TopTrackRow {
                    rank: i + 1,
                    name: t.name,
                    artists: t.artists,
                    album: t.album,
                }))
            );
            println!(
                "{}",
                Table::new(items.artists.into_iter().enumerate().map(|(i, a)| TopArtistRow {
                    rank: i + 1,
                    name: a.name,
                }))
            );
        }
        Err(e) => warning!("Failed to fetch top items. Err: {}", e),
    }
}

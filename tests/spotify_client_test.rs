use reqwest::Url;
use serde_json::{Value, json};
use spotstat::Error;
use spotstat::management::TokenRefresher;
use spotstat::spotify::auth::{SpotifyRefresher, authorize_url, exchange_code};
use spotstat::spotify::{SearchKind, SearchResults, SpotifyClient};
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

// Helper function to create a raw track object as the Web API returns it
fn track_json(id: &str, name: &str, popularity: u32) -> Value {
    json!({
        "id": id,
        "name": name,
        "popularity": popularity,
        "uri": format!("spotify:track:{}", id),
        "duration_ms": 200000,
        "artists": [{ "id": "ar1", "name": "Dua Lipa" }],
        "album": { "id": "al1", "name": "Radical Optimism" },
        "preview_url": null
    })
}

fn artist_json(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "genres": ["pop"], "popularity": 50 })
}

fn client(server: &MockServer) -> SpotifyClient {
    SpotifyClient::new(server.uri(), "test-token")
}

#[tokio::test]
async fn test_search_tracks_are_ranked() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "Houdini"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "50"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": {
                "items": [
                    track_json("t1", "Houdini", 50),
                    null,
                    track_json("t2", "Houdini", 91),
                    track_json("t3", "Other", 70)
                ],
                "next": null,
                "total": 4
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let results = client(&server)
        .search("Houdini", SearchKind::Track)
        .await
        .unwrap();

    let SearchResults::Tracks(tracks) = results else {
        panic!("expected track results");
    };
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].id.as_deref(), Some("t2"));
    assert_eq!(tracks[0].popularity, 91);
}

#[tokio::test]
async fn test_search_playlists_skip_null_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "playlist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "playlists": {
                "items": [
                    null,
                    {
                        "id": "p1",
                        "name": "Focus",
                        "description": "",
                        "public": true,
                        "owner": { "id": "spotify", "display_name": "Spotify" },
                        "tracks": { "total": 80 }
                    },
                    null
                ],
                "next": null,
                "total": 3
            }
        })))
        .mount(&server)
        .await;

    let results = client(&server)
        .search("focus", SearchKind::Playlist)
        .await
        .unwrap();

    assert_eq!(results.len(), 1);
    let SearchResults::Playlists(playlists) = results else {
        panic!("expected playlist results");
    };
    assert_eq!(playlists[0].name, "Focus");
}

#[tokio::test]
async fn test_search_http_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client(&server).search("x", SearchKind::Album).await;

    assert!(matches!(result, Err(Error::Http(_))));
}

#[tokio::test]
async fn test_followed_artists_follows_cursor() {
    let server = MockServer::start().await;
    let first_page: Vec<Value> = (0..50)
        .map(|i| artist_json(&format!("a{}", i), &format!("Artist {}", i)))
        .collect();

    Mock::given(method("GET"))
        .and(path("/me/following"))
        .and(query_param("after", "a49"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {
                "items": [artist_json("b0", "Late"), artist_json("b1", "Later")],
                "next": null,
                "cursors": { "after": null },
                "total": 52
            }
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("limit", "50"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": {
                "items": first_page,
                "next": "next-page",
                "cursors": { "after": "a49" },
                "total": 52
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let artists = client(&server).followed_artists().await.unwrap();

    assert_eq!(artists.len(), 52);
    assert_eq!(artists[0].id, "a0");
    assert_eq!(artists[51].name, "Later");
}

#[tokio::test]
async fn test_follow_and_unfollow_artist() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/me/following"))
        .and(query_param("type", "artist"))
        .and(query_param("ids", "a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/me/following"))
        .and(query_param("ids", "a1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    client.follow_artist("a1").await.unwrap();
    client.unfollow_artist("a1").await.unwrap();
}

#[tokio::test]
async fn test_artist_overview_without_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "artist"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": { "items": [], "next": null, "total": 0 }
        })))
        .mount(&server)
        .await;

    let overview = client(&server).artist_overview("nobody").await.unwrap();

    assert!(overview.is_none());
}

#[tokio::test]
async fn test_artist_overview_collects_details() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": { "items": [artist_json("a1", "Dua Lipa")], "next": null, "total": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artists/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(artist_json("a1", "Dua Lipa")))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artists/a1/albums"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "id": "al1", "name": "Radical Optimism", "album_type": "album" }],
            "next": null,
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artists/a1/top-tracks"))
        .and(query_param("market", "US"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": [track_json("t1", "Houdini", 91)]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/artists/a1/related-artists"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "artists": [artist_json("a2", "Charli xcx")]
        })))
        .mount(&server)
        .await;

    let overview = client(&server)
        .artist_overview("dua")
        .await
        .unwrap()
        .expect("artist found");

    assert_eq!(overview.artist.name, "Dua Lipa");
    assert_eq!(overview.albums.len(), 1);
    assert_eq!(overview.top_tracks[0].name, "Houdini");
    assert_eq!(overview.related[0].id, "a2");
}

#[tokio::test]
async fn test_playlist_tracks_follow_next_links() {
    let server = MockServer::start().await;
    let next = format!("{}/playlists/p1/tracks-page-2", server.uri());

    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": track_json("t1", "Houdini", 91) },
                null,
                { "track": null }
            ],
            "next": next,
            "total": 4
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks-page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "track": track_json("t2", "Training Season", 80) }],
            "next": null,
            "total": 4
        })))
        .mount(&server)
        .await;

    let tracks = client(&server).playlist_tracks("p1").await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[0].name, "Houdini");
    assert_eq!(tracks[0].artists, vec!["Dua Lipa"]);
    assert_eq!(tracks[0].album, "Radical Optimism");
    assert_eq!(tracks[1].id.as_deref(), Some("t2"));
}

// Local files come back with `null` ids and album metadata
fn local_track_json(name: &str) -> Value {
    json!({
        "id": null,
        "name": name,
        "popularity": 0,
        "uri": format!("spotify:local:Artist:Album:{}:215", name.replace(' ', "+")),
        "duration_ms": 215000,
        "is_local": true,
        "artists": [{ "id": null, "name": "Garage Band", "type": "artist", "uri": "spotify:artist:null" }],
        "album": {
            "id": null,
            "name": "Demos",
            "album_type": null,
            "release_date": null,
            "release_date_precision": null,
            "total_tracks": null,
            "artists": [],
            "images": []
        },
        "preview_url": null
    })
}

#[tokio::test]
async fn test_playlist_tracks_with_local_file() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": track_json("t1", "Houdini", 91) },
                { "track": local_track_json("Basement Jam") }
            ],
            "next": null,
            "total": 2
        })))
        .mount(&server)
        .await;

    let tracks = client(&server).playlist_tracks("p1").await.unwrap();

    assert_eq!(tracks.len(), 2);
    assert_eq!(tracks[1].name, "Basement Jam");
    assert_eq!(tracks[1].id, None);
    assert_eq!(tracks[1].album, "Demos");
    assert_eq!(tracks[1].artists, vec!["Garage Band"]);
}

#[tokio::test]
async fn test_remove_local_file_from_playlist() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": track_json("t1", "Houdini", 91) },
                { "track": local_track_json("Basement Jam") }
            ],
            "next": null,
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/playlists/p1/tracks"))
        .and(body_json(json!({
            "tracks": [{ "uri": "spotify:local:Artist:Album:Basement+Jam:215" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s4" })))
        .expect(1)
        .mount(&server)
        .await;

    let removed = client(&server)
        .remove_from_playlist("p1", "basement")
        .await
        .unwrap();

    assert!(removed);
}

#[tokio::test]
async fn test_remove_from_playlist_skips_match_without_uri() {
    let server = MockServer::start().await;
    let mut unplayable = track_json("x", "Houdini (Demo)", 10);
    unplayable["id"] = Value::Null;
    unplayable["uri"] = json!("");

    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": unplayable },
                { "track": track_json("t2", "Houdini", 91) }
            ],
            "next": null,
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/playlists/p1/tracks"))
        .and(body_json(json!({ "tracks": [{ "uri": "spotify:track:t2" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s5" })))
        .expect(1)
        .mount(&server)
        .await;

    let removed = client(&server)
        .remove_from_playlist("p1", "houdini")
        .await
        .unwrap();

    assert!(removed);
}

#[tokio::test]
async fn test_create_playlist_for_current_user() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "u1",
            "display_name": "Alice",
            "product": "premium",
            "country": "NL",
            "followers": { "total": 7 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/users/u1/playlists"))
        .and(body_json(json!({
            "name": "Road Trip",
            "description": "long drives",
            "public": false
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "p9",
            "name": "Road Trip",
            "description": "long drives",
            "public": false,
            "owner": { "id": "u1", "display_name": "Alice" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let playlist = client(&server)
        .create_playlist("Road Trip", "long drives", false)
        .await
        .unwrap();

    assert_eq!(playlist.id, "p9");
    assert_eq!(playlist.owner.id, "u1");
}

#[tokio::test]
async fn test_edit_playlist_sends_only_changes() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/playlists/p1"))
        .and(body_json(json!({ "name": "Renamed" })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let changes = spotstat::types::EditPlaylistRequest {
        name: Some("Renamed".to_string()),
        ..Default::default()
    };
    client(&server).edit_playlist("p1", &changes).await.unwrap();
}

#[tokio::test]
async fn test_add_to_playlist_without_search_hit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": [], "next": null, "total": 0 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let added = client(&server)
        .add_to_playlist("p1", "does not exist")
        .await
        .unwrap();

    assert!(!added);
}

#[tokio::test]
async fn test_add_to_playlist_posts_track_uri() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "track"))
        .and(query_param("limit", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "tracks": { "items": [track_json("t1", "Houdini", 91)], "next": null, "total": 1 }
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/playlists/p1/tracks"))
        .and(body_json(json!({ "uris": ["spotify:track:t1"] })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "snapshot_id": "s2" })))
        .expect(1)
        .mount(&server)
        .await;

    let added = client(&server).add_to_playlist("p1", "Houdini").await.unwrap();

    assert!(added);
}

#[tokio::test]
async fn test_remove_from_playlist_matches_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                { "track": track_json("t1", "Levitating", 70) },
                { "track": track_json("t2", "Houdini", 91) }
            ],
            "next": null,
            "total": 2
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/playlists/p1/tracks"))
        .and(body_json(json!({ "tracks": [{ "uri": "spotify:track:t2" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "snapshot_id": "s3" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client(&server);
    assert!(client.remove_from_playlist("p1", "houDINI").await.unwrap());
}

#[tokio::test]
async fn test_remove_from_playlist_without_match() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/playlists/p1/tracks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{ "track": track_json("t1", "Levitating", 70) }],
            "next": null,
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let removed = client(&server)
        .remove_from_playlist("p1", "houdini")
        .await
        .unwrap();

    assert!(!removed);
}

#[tokio::test]
async fn test_top_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/me/top/tracks"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [track_json("t1", "Houdini", 91)],
            "next": null,
            "total": 1
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/me/top/artists"))
        .and(query_param("limit", "10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [{
                "id": "a1",
                "name": "Dua Lipa",
                "images": [{ "url": "https://img.example/a1.jpg" }]
            }],
            "next": null,
            "total": 1
        })))
        .mount(&server)
        .await;

    let top = client(&server).top_items().await.unwrap();

    assert_eq!(top.tracks[0].name, "Houdini");
    assert_eq!(top.tracks[0].artists, "Dua Lipa");
    assert_eq!(top.tracks[0].album, "Radical Optimism");
    assert_eq!(
        top.artists[0].image_url.as_deref(),
        Some("https://img.example/a1.jpg")
    );
}

#[tokio::test]
async fn test_exchange_code() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=authorization_code"))
        .and(body_string_contains("code=abc"))
        .and(body_string_contains("code_verifier=verifier"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access",
            "token_type": "Bearer",
            "scope": "user-read-private",
            "expires_in": 3600,
            "refresh_token": "refresh"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let token = exchange_code(
        &format!("{}/api/token", server.uri()),
        "client",
        "http://127.0.0.1:8888/callback",
        "abc",
        "verifier",
    )
    .await
    .unwrap();

    assert_eq!(token.access_token, "access");
    assert_eq!(token.refresh_token, "refresh");
    assert_eq!(token.expires_in, 3600);
    assert!(token.obtained_at > 0);
}

#[tokio::test]
async fn test_refresher_posts_refresh_grant() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("refresh_token=old"))
        .and(body_string_contains("client_id=client"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh",
            "token_type": "Bearer",
            "expires_in": 3600
        })))
        .expect(1)
        .mount(&server)
        .await;

    let refresher = SpotifyRefresher::new(format!("{}/api/token", server.uri()), "client");
    let response = refresher.refresh("old").await.unwrap();

    assert_eq!(response.access_token, "fresh");
    assert!(response.refresh_token.is_none());
}

#[test]
fn test_authorize_url_parameters() {
    let raw = authorize_url(
        "https://accounts.spotify.com/authorize",
        "client",
        "http://127.0.0.1:8888/callback",
        "challenge",
        "user-read-private user-follow-read",
    )
    .unwrap();

    let url = Url::parse(&raw).unwrap();
    let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();

    assert_eq!(url.path(), "/authorize");
    assert!(pairs.contains(&("response_type".to_string(), "code".to_string())));
    assert!(pairs.contains(&("code_challenge_method".to_string(), "S256".to_string())));
    assert!(pairs.contains(&(
        "redirect_uri".to_string(),
        "http://127.0.0.1:8888/callback".to_string()
    )));
    assert!(pairs.contains(&(
        "scope".to_string(),
        "user-read-private user-follow-read".to_string()
    )));
}

#[test]
fn test_authorize_url_rejects_invalid_base() {
    let result = authorize_url("not a url", "c", "r", "x", "s");
    assert!(matches!(result, Err(Error::Config(_))));
}

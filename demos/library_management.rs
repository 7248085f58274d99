//! Library management example for the user the access token belongs to.
//!
//! This example shows how to:
//! - Load the current user's profile
//! - List playlists and saved tracks
//! - Check, save and remove tracks in the library
//! - Create a playlist and add items to it
//!
//! Run with `SPOTIFY_TOKEN=... cargo run --example library_management`.
//! The token needs the library and playlist modification scopes.

use spotrs::{CacheSettings, Client, PagingOptions, PlaylistDetails};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let token = std::env::var("SPOTIFY_TOKEN").unwrap_or_default();
    let client = Client::new(token).with_cache_settings(CacheSettings::all());
    let me = client.user();

    let profile = me.patch_info().await?;
    println!("Logged in as {} ({})", profile.name(), profile.id);

    // Playlists
    let playlists = me.get_playlists(PagingOptions::new(10, 0)).await?;
    println!("\nPlaylists:");
    for playlist in &playlists {
        println!("  - {} ({} items)", playlist.name, playlist.total_tracks());
    }

    // Saved tracks
    let saved = me.get_saved_tracks(PagingOptions::new(5, 0)).await?;
    println!("\nRecently saved tracks:");
    for entry in &saved {
        println!("  - {} (saved {})", entry.item.name, entry.added_at);
    }

    // Library membership
    let track_id = "6TmYJ9ouVTS7aHcz6RdcSd";
    let in_library = me.has_tracks(&[track_id]).await?;
    println!("\n{} in library: {}", track_id, in_library[0]);

    if !in_library[0] {
        me.save_tracks(&[track_id]).await?;
        println!("Saved {}", track_id);
        me.remove_tracks(&[track_id]).await?;
        println!("Removed {} again", track_id);
    }

    // Playlist creation
    let details = PlaylistDetails {
        description: Some("Created by spotrs".to_string()),
        public: Some(false),
        ..PlaylistDetails::named("spotrs demo")
    };
    if let Some(playlist) = client.playlists().create(&profile.id, details).await? {
        println!("\nCreated playlist {} ({})", playlist.name, playlist.id);

        let uri = format!("spotify:track:{}", track_id);
        let snapshot = client
            .playlists()
            .add_items(&playlist.id, &[uri], None)
            .await?;
        println!("Added a track, snapshot {:?}", snapshot);

        me.unfollow_playlist(&playlist.id).await?;
        println!("Unfollowed the demo playlist");
    }

    Ok(())
}

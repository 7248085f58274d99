//! Basic search example demonstrating how to search the Spotify catalog.
//!
//! This example shows how to:
//! - Create a Client from an access token
//! - Search for artists, albums and tracks in one request
//! - Display search results
//!
//! Run with `SPOTIFY_TOKEN=... cargo run --example basic_search`.

use spotrs::{Client, SearchOptions, SearchType};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::init();

    let token = std::env::var("SPOTIFY_TOKEN").unwrap_or_default();
    let client = Client::new(token).with_market("US");

    let query = "Radiohead";
    println!("Searching for: {}", query);

    let results = client
        .search(
            query,
            &[SearchType::Artist, SearchType::Album, SearchType::Track],
            SearchOptions::with_limit(10),
        )
        .await?;

    // Display artists
    if !results.artists.is_empty() {
        println!("\nArtists:");
        for artist in &results.artists {
            println!("  - {} (ID: {})", artist.name, artist.id);
        }
    }

    // Display albums
    if !results.albums.is_empty() {
        println!("\nAlbums:");
        for album in &results.albums {
            println!(
                "  - {} by {} (ID: {})",
                album.name,
                album
                    .artists
                    .first()
                    .map(|a| a.name.as_str())
                    .unwrap_or("Unknown"),
                album.id
            );
        }
    }

    // Display tracks
    if !results.tracks.is_empty() {
        println!("\nTracks:");
        for track in &results.tracks {
            println!(
                "  - {} by {} [{}s] (ID: {})",
                track.name,
                track.artist_names().join(", "),
                track.duration().as_secs(),
                track.id
            );
        }
    }

    if results.is_empty() {
        println!("No results found");
    }

    Ok(())
}

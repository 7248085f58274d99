use crate::Cache;
use crate::Cached;
use crate::CacheStore;
use crate::Client;
use crate::Error;
use crate::ExternalIds;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Restrictions;
use crate::SearchOptions;
use crate::SearchType;
use crate::album::Album;
use crate::artist::Artist;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::join_ids;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Represents a track from the Spotify catalog.
///
/// Tracks listed under an album come without the `album` field; local files
/// in a playlist come with an empty `id`.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Track {
    /// Spotify ID of the track, empty for local files
    #[serde(deserialize_with = "deserialize_null_default")]
    pub id: String,
    /// Track name
    pub name: String,
    /// Spotify URI, e.g. `spotify:track:...`
    pub uri: String,
    /// Object type, always "track"
    #[serde(rename = "type")]
    pub kind: String,
    /// Web API endpoint for the full track
    pub href: Option<String>,
    /// Known external URLs for this track
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    /// Artists who performed the track
    #[serde(deserialize_with = "deserialize_null_default")]
    pub artists: Vec<Artist>,
    /// Album on which the track appears
    pub album: Option<Album>,
    /// Markets (ISO 3166-1 alpha-2) in which the track is available
    #[serde(deserialize_with = "deserialize_null_default")]
    pub available_markets: Vec<String>,
    /// Disc number, usually 1 unless the album has several discs
    pub disc_number: u32,
    /// Track length in milliseconds
    pub duration_ms: u64,
    /// Whether the track has explicit lyrics
    pub explicit: bool,
    /// Known external IDs (isrc, ean, upc)
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_ids: ExternalIds,
    /// Whether the track is a local file
    pub is_local: bool,
    /// Set when market relinking applies
    pub is_playable: Option<bool>,
    /// The originally requested track when relinking replaced it
    pub linked_from: Option<LinkedTrack>,
    /// Popularity between 0 and 100
    pub popularity: Option<u32>,
    /// 30 second preview URL
    pub preview_url: Option<String>,
    pub restrictions: Option<Restrictions>,
    /// Position on its disc
    pub track_number: u32,
}

impl Track {
    /// Track length as a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// The open.spotify.com URL of the track, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// International Standard Recording Code, if known.
    pub fn isrc(&self) -> Option<&str> {
        self.external_ids.get("isrc").map(String::as_str)
    }

    /// Names of the performing artists, in credit order.
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|artist| artist.name.as_str()).collect()
    }
}

impl Cached for Track {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.tracks
    }
}

/// Reference to the track that was originally requested before relinking.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct LinkedTrack {
    pub id: String,
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
}

/// Audio features computed by Spotify for a track.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AudioFeatures {
    pub id: String,
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub track_href: Option<String>,
    pub analysis_url: Option<String>,
    pub acousticness: f64,
    pub danceability: f64,
    pub energy: f64,
    pub instrumentalness: f64,
    pub liveness: f64,
    /// Overall loudness in decibels, typically between -60 and 0
    pub loudness: f64,
    pub speechiness: f64,
    /// Estimated tempo in beats per minute
    pub tempo: f64,
    pub valence: f64,
    /// Pitch class of the key, -1 if no key was detected
    pub key: i32,
    /// 1 for major, 0 for minor
    pub mode: i32,
    pub time_signature: i32,
    pub duration_ms: u64,
}

#[derive(Deserialize)]
struct TracksResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct AudioFeaturesResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    audio_features: Vec<AudioFeatures>,
}

/// Endpoints of the track catalog (`/tracks`, `/audio-features`).
#[derive(Debug, Clone)]
pub struct TrackManager {
    client: Client,
}

impl Client {
    /// Manager for track endpoints.
    pub fn tracks(&self) -> TrackManager {
        TrackManager::new(self.clone())
    }
}

impl TrackManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for tracks.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Track>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Track], options)
            .await?;

        Ok(results.tracks)
    }

    /// Get a track by ID.
    ///
    /// Returns the cached track when there is one, unless `force` is set.
    /// `None` means the service returned nothing for this id.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
    /// if let Some(track) = client.tracks().get("3n3Ppam7vgaVa1iaRUc9Lp", false).await? {
    ///     println!("{} by {}", track.name, track.artist_names().join(", "));
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Track>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(None),
        });

        self.client
            .get_cached(id, force, &format!("/tracks/{id}"), FetchRequest::get().params(params))
            .await
    }

    /// Get several tracks at once, in the order of `ids`.
    ///
    /// Unknown ids are skipped.
    pub async fn get_multiple<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Track>>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({
            "ids": join_ids(ids),
            "market": self.client.market_or(None),
        });

        let resp: Option<TracksResponse> = self
            .client
            .fetch_as("/tracks", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.tracks))
            .unwrap_or_default())
    }

    /// Get the audio features of a track.
    pub async fn get_audio_features(&self, id: &str) -> Result<Option<AudioFeatures>, Error> {
        self.client
            .fetch_as(&format!("/audio-features/{id}"), FetchRequest::get())
            .await
    }

    /// Get the audio features of several tracks.
    pub async fn get_multiple_audio_features<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<AudioFeatures>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({ "ids": join_ids(ids) });

        let resp: Option<AudioFeaturesResponse> = self
            .client
            .fetch_as("/audio-features", FetchRequest::get().params(params))
            .await?;

        Ok(resp.map(|resp| resp.audio_features).unwrap_or_default())
    }
}

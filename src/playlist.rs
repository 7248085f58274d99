use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::Error;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Followers;
use crate::Image;
use crate::Page;
use crate::PagingOptions;
use crate::SearchOptions;
use crate::SearchType;
use crate::deserialize_null_default;
use crate::episode::Episode;
use crate::join_ids;
use crate::largest_image;
use crate::track::Track;
use crate::user::User;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Represents a playlist.
///
/// In listings `tracks` only carries `href` and `total`; a playlist fetched
/// by id carries the first page of items as well.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Playlist {
    pub id: String,
    pub name: String,
    pub uri: String,
    /// Object type, always "playlist"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Whether other users may modify the playlist
    pub collaborative: bool,
    pub description: Option<String>,
    pub followers: Option<Followers>,
    pub owner: Option<User>,
    /// `None` when the playlist status is not relevant
    pub public: Option<bool>,
    /// Version identifier of the playlist contents
    pub snapshot_id: String,
    pub primary_color: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub tracks: Page<PlaylistItem>,
}

impl Playlist {
    /// The open.spotify.com URL of the playlist, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available cover image.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }

    /// Number of items in the playlist, whether or not they were expanded.
    pub fn total_tracks(&self) -> u32 {
        self.tracks.total
    }
}

impl Cached for Playlist {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.playlists
    }
}

/// An entry of a playlist.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct PlaylistItem {
    /// ISO timestamp when the item was added, `None` for very old playlists
    pub added_at: Option<String>,
    pub added_by: Option<User>,
    pub is_local: bool,
    /// `None` when the item is no longer available
    pub track: Option<PlayableItem>,
}

/// Something that can sit in a playlist or a play queue.
#[derive(Debug, Serialize, Clone)]
#[serde(untagged)]
pub enum PlayableItem {
    Track(Track),
    Episode(Episode),
}

impl PlayableItem {
    pub fn id(&self) -> &str {
        match self {
            PlayableItem::Track(track) => &track.id,
            PlayableItem::Episode(episode) => &episode.id,
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            PlayableItem::Track(track) => &track.uri,
            PlayableItem::Episode(episode) => &episode.uri,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            PlayableItem::Track(track) => &track.name,
            PlayableItem::Episode(episode) => &episode.name,
        }
    }

    pub fn duration_ms(&self) -> u64 {
        match self {
            PlayableItem::Track(track) => track.duration_ms,
            PlayableItem::Episode(episode) => episode.duration_ms,
        }
    }
}

// Dispatch on the `type` member; anything that is not an episode is a track.
impl<'de> Deserialize<'de> for PlayableItem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        match value.get("type").and_then(Value::as_str) {
            Some("episode") => Episode::deserialize(value)
                .map(PlayableItem::Episode)
                .map_err(D::Error::custom),
            _ => Track::deserialize(value)
                .map(PlayableItem::Track)
                .map_err(D::Error::custom),
        }
    }
}

/// Playlist attributes for [`PlaylistManager::create`] and
/// [`PlaylistManager::edit`]. Unset fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaylistDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collaborative: Option<bool>,
}

impl PlaylistDetails {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Options for [`PlaylistManager::reorder_items`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReorderOptions {
    /// Position of the first item to move
    pub range_start: u32,
    /// Position the items are moved in front of
    pub insert_before: u32,
    /// Number of items to move, 1 when unset
    pub range_length: Option<u32>,
    /// Playlist version the change applies to
    pub snapshot_id: Option<String>,
}

#[derive(Deserialize)]
struct SnapshotResponse {
    snapshot_id: String,
}

/// Endpoints for reading and modifying playlists (`/playlists`).
#[derive(Debug, Clone)]
pub struct PlaylistManager {
    client: Client,
}

impl Client {
    /// Manager for playlist endpoints.
    pub fn playlists(&self) -> PlaylistManager {
        PlaylistManager::new(self.clone())
    }
}

impl PlaylistManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for playlists.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Playlist>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Playlist], options)
            .await?;

        Ok(results.playlists)
    }

    /// Get a playlist by ID, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Playlist>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(None),
        });

        self.client
            .get_cached(id, force, &format!("/playlists/{id}"), FetchRequest::get().params(params))
            .await
    }

    /// Get one page of a playlist's items.
    pub async fn get_tracks(
        &self,
        id: &str,
        options: PagingOptions,
    ) -> Result<Vec<PlaylistItem>, Error> {
        let params = options.params(&self.client);

        let resp: Option<Page<PlaylistItem>> = self
            .client
            .fetch_as(&format!("/playlists/{id}/tracks"), FetchRequest::get().params(params))
            .await?;

        Ok(resp.map(|page| page.items).unwrap_or_default())
    }

    /// Create a playlist owned by `user_id`.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotrs::PlaylistDetails;
    ///
    /// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
    /// let details = PlaylistDetails {
    ///     description: Some("Songs for the road".to_string()),
    ///     public: Some(false),
    ///     ..PlaylistDetails::named("Road Trip")
    /// };
    /// if let Some(playlist) = client.playlists().create("smedjan", details).await? {
    ///     println!("Created {}", playlist.id);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        &self,
        user_id: &str,
        details: PlaylistDetails,
    ) -> Result<Option<Arc<Playlist>>, Error> {
        let body = serde_json::to_value(&details)?;

        let playlist: Option<Playlist> = self
            .client
            .fetch_as(&format!("/users/{user_id}/playlists"), FetchRequest::post().body(body))
            .await?;

        Ok(playlist.map(|playlist| self.client.cache().insert(playlist)))
    }

    /// Change a playlist's name, description or visibility.
    pub async fn edit(&self, id: &str, details: PlaylistDetails) -> Result<(), Error> {
        let body = serde_json::to_value(&details)?;

        self.client
            .fetch(&format!("/playlists/{id}"), FetchRequest::put().body(body))
            .await?;

        // The cached copy is stale now
        self.client.cache().store::<Playlist>().remove(id);

        Ok(())
    }

    /// Add items to a playlist, at `position` or at the end.
    ///
    /// Returns the new snapshot id, `None` without a request when `uris` is
    /// empty.
    pub async fn add_items<S: AsRef<str>>(
        &self,
        id: &str,
        uris: &[S],
        position: Option<u32>,
    ) -> Result<Option<String>, Error> {
        if uris.is_empty() {
            return Ok(None);
        }

        let uris: Vec<&str> = uris.iter().map(AsRef::as_ref).collect();
        let body = serde_json::json!({
            "uris": uris,
            "position": position,
        });

        self.snapshot(id, FetchRequest::post().body(body)).await
    }

    /// Remove every occurrence of the given items from a playlist.
    ///
    /// Returns the new snapshot id, `None` without a request when `uris` is
    /// empty.
    pub async fn remove_items<S: AsRef<str>>(
        &self,
        id: &str,
        uris: &[S],
        snapshot_id: Option<&str>,
    ) -> Result<Option<String>, Error> {
        if uris.is_empty() {
            return Ok(None);
        }

        let tracks: Vec<Value> = uris
            .iter()
            .map(|uri| serde_json::json!({ "uri": uri.as_ref() }))
            .collect();
        let body = serde_json::json!({
            "tracks": tracks,
            "snapshot_id": snapshot_id,
        });

        self.snapshot(id, FetchRequest::delete().body(body)).await
    }

    /// Move a range of items within a playlist.
    ///
    /// Returns the new snapshot id.
    pub async fn reorder_items(
        &self,
        id: &str,
        options: ReorderOptions,
    ) -> Result<Option<String>, Error> {
        let body = serde_json::json!({
            "range_start": options.range_start,
            "insert_before": options.insert_before,
            "range_length": options.range_length,
            "snapshot_id": options.snapshot_id,
        });

        self.snapshot(id, FetchRequest::put().body(body)).await
    }

    /// Replace all items of a playlist.
    ///
    /// Returns the new snapshot id.
    pub async fn replace_items<S: AsRef<str>>(
        &self,
        id: &str,
        uris: &[S],
    ) -> Result<Option<String>, Error> {
        let params = serde_json::json!({ "uris": join_ids(uris) });

        self.snapshot(id, FetchRequest::put().params(params)).await
    }

    /// Get the cover images of a playlist.
    pub async fn get_images(&self, id: &str) -> Result<Vec<Image>, Error> {
        let images: Option<Vec<Image>> = self
            .client
            .fetch_as(&format!("/playlists/{id}/images"), FetchRequest::get())
            .await?;

        Ok(images.unwrap_or_default())
    }

    // Item mutations all go to the tracks endpoint and change the snapshot.
    async fn snapshot(&self, id: &str, request: FetchRequest) -> Result<Option<String>, Error> {
        let resp: Option<SnapshotResponse> = self
            .client
            .fetch_as(&format!("/playlists/{id}/tracks"), request)
            .await?;

        self.client.cache().store::<Playlist>().remove(id);

        Ok(resp.map(|resp| resp.snapshot_id))
    }
}

use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::Copyright;
use crate::Error;
use crate::ExternalIds;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Image;
use crate::Page;
use crate::PagingOptions;
use crate::Restrictions;
use crate::SearchOptions;
use crate::SearchType;
use crate::artist::Artist;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::join_ids;
use crate::largest_image;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Represents an album from the Spotify catalog.
///
/// Simplified albums (embedded in tracks, search results or artist
/// discographies) leave the full-only fields such as `tracks`, `label` or
/// `copyrights` empty.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Album {
    /// Spotify ID of the album, empty for albums of local files
    #[serde(deserialize_with = "deserialize_null_default")]
    pub id: String,
    /// Album name
    pub name: String,
    /// Spotify URI, e.g. `spotify:album:...`
    pub uri: String,
    /// Object type, always "album"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    /// "album", "single" or "compilation"
    pub album_type: Option<String>,
    /// Relation to the artist in artist discographies ("appears_on", ...)
    pub album_group: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    /// Cover art in various sizes, widest first
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub artists: Vec<Artist>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub available_markets: Vec<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub copyrights: Vec<Copyright>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_ids: ExternalIds,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub genres: Vec<String>,
    pub label: Option<String>,
    pub popularity: Option<u32>,
    /// Release date, precision given by `release_date_precision`
    pub release_date: Option<String>,
    /// "year", "month" or "day"
    pub release_date_precision: Option<String>,
    pub total_tracks: u32,
    pub restrictions: Option<Restrictions>,
    /// First page of the album's tracks (full album only)
    pub tracks: Option<Page<Track>>,
}

impl Album {
    /// The open.spotify.com URL of the album, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available cover image.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }

    /// Year of release, whatever the date precision.
    pub fn release_year(&self) -> Option<i32> {
        self.release_date
            .as_deref()
            .and_then(|date| date.get(..4))
            .and_then(|year| year.parse().ok())
    }
}

impl Cached for Album {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.albums
    }
}

#[derive(Deserialize)]
struct AlbumsResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    albums: Vec<Album>,
}

/// Endpoints of the album catalog (`/albums`).
#[derive(Debug, Clone)]
pub struct AlbumManager {
    client: Client,
}

impl Client {
    /// Manager for album endpoints.
    pub fn albums(&self) -> AlbumManager {
        AlbumManager::new(self.clone())
    }
}

impl AlbumManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for albums.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Album>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Album], options)
            .await?;

        Ok(results.albums)
    }

    /// Get an album by ID, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Album>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(None),
        });

        self.client
            .get_cached(id, force, &format!("/albums/{id}"), FetchRequest::get().params(params))
            .await
    }

    /// Get several albums at once. Unknown ids are skipped.
    pub async fn get_multiple<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Album>>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({
            "ids": join_ids(ids),
            "market": self.client.market_or(None),
        });

        let resp: Option<AlbumsResponse> = self
            .client
            .fetch_as("/albums", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.albums))
            .unwrap_or_default())
    }

    /// Get one page of an album's tracks.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
    /// let tracks = client
    ///     .albums()
    ///     .get_tracks("4aawyAB9vmqN3uQ7FjRGTy", spotrs::PagingOptions::new(50, 0))
    ///     .await?;
    /// for track in tracks {
    ///     println!("{}. {}", track.track_number, track.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_tracks(
        &self,
        id: &str,
        options: PagingOptions,
    ) -> Result<Vec<Arc<Track>>, Error> {
        let params = options.params(&self.client);

        let resp: Option<Page<Track>> = self
            .client
            .fetch_as(&format!("/albums/{id}/tracks"), FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }
}

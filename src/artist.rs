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
use crate::SearchOptions;
use crate::SearchType;
use crate::album::Album;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::join_ids;
use crate::largest_image;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{AsRefStr, EnumString};

/// Represents an artist from the Spotify catalog.
///
/// Artists embedded in tracks and albums only carry the id, name, uri and
/// links; the remaining fields are empty until the artist is fetched.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Artist {
    /// Spotify ID of the artist, empty for artists of local files
    #[serde(deserialize_with = "deserialize_null_default")]
    pub id: String,
    /// Artist name
    pub name: String,
    /// Spotify URI, e.g. `spotify:artist:...`
    pub uri: String,
    /// Object type, always "artist"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    /// Profile pictures in various sizes
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Genres the artist is associated with
    #[serde(deserialize_with = "deserialize_null_default")]
    pub genres: Vec<String>,
    pub followers: Option<Followers>,
    /// Popularity between 0 and 100
    pub popularity: Option<u32>,
}

impl Artist {
    /// The open.spotify.com URL of the artist, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available profile picture.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }
}

impl Cached for Artist {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.artists
    }
}

/// Relation between an artist and an album in the artist's discography.
#[derive(Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AlbumGroup {
    Album,
    Single,
    AppearsOn,
    Compilation,
}

/// Options for [`ArtistManager::get_albums`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArtistAlbumsOptions {
    /// Album groups to include, all of them when empty
    pub include_groups: Vec<AlbumGroup>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    pub market: Option<String>,
}

#[derive(Deserialize)]
struct ArtistsResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    artists: Vec<Artist>,
}

#[derive(Deserialize)]
struct TopTracksResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    tracks: Vec<Track>,
}

/// Endpoints of the artist catalog (`/artists`).
#[derive(Debug, Clone)]
pub struct ArtistManager {
    client: Client,
}

impl Client {
    /// Manager for artist endpoints.
    pub fn artists(&self) -> ArtistManager {
        ArtistManager::new(self.clone())
    }
}

impl ArtistManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for artists.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Artist>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Artist], options)
            .await?;

        Ok(results.artists)
    }

    /// Get an artist by ID, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Artist>>, Error> {
        self.client
            .get_cached(id, force, &format!("/artists/{id}"), FetchRequest::get())
            .await
    }

    /// Get several artists at once. Unknown ids are skipped.
    pub async fn get_multiple<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Artist>>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({ "ids": join_ids(ids) });

        let resp: Option<ArtistsResponse> = self
            .client
            .fetch_as("/artists", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.artists))
            .unwrap_or_default())
    }

    /// Get the artist's top tracks in a market.
    ///
    /// The endpoint requires a market; without one, the client default is
    /// used.
    pub async fn get_top_tracks(
        &self,
        id: &str,
        market: Option<&str>,
    ) -> Result<Vec<Arc<Track>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(market),
        });

        let resp: Option<TopTracksResponse> = self
            .client
            .fetch_as(
                &format!("/artists/{id}/top-tracks"),
                FetchRequest::get().params(params),
            )
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.tracks))
            .unwrap_or_default())
    }

    /// Get artists similar to the given one.
    pub async fn get_related_artists(&self, id: &str) -> Result<Vec<Arc<Artist>>, Error> {
        let resp: Option<ArtistsResponse> = self
            .client
            .fetch_as(&format!("/artists/{id}/related-artists"), FetchRequest::get())
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.artists))
            .unwrap_or_default())
    }

    /// Get one page of the artist's discography.
    pub async fn get_albums(
        &self,
        id: &str,
        options: ArtistAlbumsOptions,
    ) -> Result<Vec<Arc<Album>>, Error> {
        let include_groups = if options.include_groups.is_empty() {
            None
        } else {
            Some(join_ids(options.include_groups.as_slice()))
        };

        let params = serde_json::json!({
            "include_groups": include_groups,
            "limit": options.limit,
            "offset": options.offset,
            "market": self.client.market_or(options.market.as_deref()),
        });

        let resp: Option<Page<Album>> = self
            .client
            .fetch_as(&format!("/artists/{id}/albums"), FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }
}

#![doc = include_str!("../README.md")]

mod album;
mod artist;
mod browse;
mod cache;
mod episode;
mod fetch;
mod playlist;
mod search;
mod show;
mod track;
mod user;

pub use album::*;
pub use artist::*;
pub use browse::*;
pub use cache::*;
pub use episode::*;
pub use fetch::*;
pub use playlist::*;
pub use search::*;
pub use show::*;
pub use track::*;
pub use user::*;

use arc_swap::ArcSwapOption;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::Arc;
use strum_macros::{AsRefStr, EnumString};

pub(crate) static SPOTIFY_API_BASE_URL: &str = "https://api.spotify.com/v1";

/// Error object returned by the Spotify Web API.
///
/// Non-2xx responses carry a body of the form
/// `{"error": {"status": 401, "message": "..."}}`; this is the inner object.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct SpotifyApiError {
    /// HTTP status code
    pub status: u16,
    /// Human-readable error message
    #[serde(default)]
    pub message: String,
}

impl Display for SpotifyApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status, self.message)
    }
}

/// Errors that can occur when using the spotrs library.
///
/// Transport failures and error responses from the service are passed
/// through unchanged. [`Error::Api`] is raised by the library itself when an
/// operation needs data that the service did not return.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed (network issues, timeouts, etc.)
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    /// Spotify API returned an error response
    #[error("Spotify API error: {0}")]
    SpotifyApiError(SpotifyApiError),
    /// JSON serialization/deserialization failed
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
    /// The configured base URL or request path is not a valid URL
    #[error(transparent)]
    InvalidUrl(#[from] url::ParseError),
    /// No access token available - client needs a token
    #[error("No access token available - have you set a token on the client?")]
    NoAccessTokenAvailable,
    /// Data that an operation requires was not returned
    #[error("{0}")]
    Api(String),
}

/// Main entry point for the Spotify Web API.
///
/// A `Client` bundles the [`Fetch`] collaborator that performs HTTP calls,
/// the per-entity [`Cache`], and a handful of request defaults. It is cheap to
/// clone: clones share the fetcher, the cache and the current-user record.
///
/// Endpoint families are exposed through managers, e.g. [`Client::tracks`]
/// or [`Client::user`].
///
/// # Example
///
/// ```no_run
/// use spotrs::{CacheSettings, Client};
///
/// # async fn example() -> Result<(), spotrs::Error> {
/// let client = Client::new("access_token")
///     .with_market("GB")
///     .with_cache_settings(CacheSettings::all());
///
/// if let Some(track) = client.tracks().get("11dFghVXANMlKmJXsNCbNl", false).await? {
///     println!("{} ({:?})", track.name, track.duration());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    fetcher: Arc<dyn Fetch>,
    cache: Arc<Cache>,
    market: Option<String>,
    current_user: Arc<ArcSwapOption<User>>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("cache", &self.cache.settings())
            .field("market", &self.market)
            .finish_non_exhaustive()
    }
}

impl Client {
    /// Create a client that talks to the Spotify Web API with the given
    /// bearer token.
    ///
    /// Obtaining the token is up to the caller.
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::from_fetcher(Arc::new(HttpFetcher::new(access_token)))
    }

    /// Create a client on top of any [`Fetch`] implementation.
    ///
    /// This is the seam used to plug in a custom transport or a test double.
    pub fn from_fetcher(fetcher: Arc<dyn Fetch>) -> Self {
        Self {
            fetcher,
            cache: Arc::new(Cache::default()),
            market: None,
            current_user: Arc::new(ArcSwapOption::from(None)),
        }
    }

    /// Set the default market (ISO 3166-1 alpha-2 country code) using the
    /// builder pattern.
    ///
    /// Endpoints that accept a `market` parameter send this value when the
    /// call itself does not specify one.
    pub fn with_market(mut self, market: impl Into<String>) -> Self {
        self.market = Some(market.into());
        self
    }

    /// Replace the cache with a fresh one using the given settings.
    pub fn with_cache_settings(mut self, settings: CacheSettings) -> Self {
        self.cache = Arc::new(Cache::new(settings));
        self
    }

    /// Set the default market for API requests.
    pub fn set_market(&mut self, market: impl Into<String>) {
        self.market = Some(market.into());
    }

    /// Get the default market, if one is set.
    pub fn get_market(&self) -> Option<&str> {
        self.market.as_deref()
    }

    /// The entity cache shared by every manager of this client.
    pub fn cache(&self) -> &Cache {
        &self.cache
    }

    /// The underlying fetch collaborator.
    pub fn fetcher(&self) -> &Arc<dyn Fetch> {
        &self.fetcher
    }

    /// Send a raw request through the fetch collaborator.
    ///
    /// Returns `Ok(None)` when the service answered successfully without a
    /// body.
    pub async fn fetch(&self, path: &str, request: FetchRequest) -> Result<Option<Value>, Error> {
        log::trace!("{} {}", request.method, path);
        self.fetcher.fetch(path, request).await
    }

    // Fetch and convert the payload into `T` at the boundary.
    pub(crate) async fn fetch_as<T: DeserializeOwned>(
        &self,
        path: &str,
        request: FetchRequest,
    ) -> Result<Option<T>, Error> {
        let value = match self.fetch(path, request).await? {
            Some(value) => value,
            None => return Ok(None),
        };

        match serde_json::from_value(value) {
            Ok(t) => Ok(Some(t)),
            Err(e) => {
                log::debug!("Requested path: {}", path);
                log::debug!("JSON deserialization error: {}", e);
                Err(Error::SerdeJson(e))
            }
        }
    }

    // Cache hit unless `force`, otherwise fetch and refresh the cached entry.
    pub(crate) async fn get_cached<T>(
        &self,
        id: &str,
        force: bool,
        path: &str,
        request: FetchRequest,
    ) -> Result<Option<Arc<T>>, Error>
    where
        T: Cached + DeserializeOwned,
    {
        if !force {
            if let Some(cached) = self.cache.get::<T>(id) {
                log::trace!("Cache hit for {}", path);
                return Ok(Some(cached));
            }
        }

        let item: Option<T> = self.fetch_as(path, request).await?;
        Ok(item.map(|item| self.cache.insert(item)))
    }

    // Run every item through the cache-aware factory, keeping order.
    pub(crate) fn create_all<T: Cached>(&self, items: Vec<T>) -> Vec<Arc<T>> {
        items.into_iter().map(|item| self.cache.create(item)).collect()
    }

    // The market to send: the explicit one, else the client default.
    pub(crate) fn market_or(&self, market: Option<&str>) -> Option<String> {
        market.or(self.market.as_deref()).map(str::to_string)
    }

    pub(crate) fn current_user(&self) -> &ArcSwapOption<User> {
        &self.current_user
    }
}

/// An image hosted by Spotify (cover art, profile picture, ...).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Image {
    /// Source URL of the image
    pub url: String,
    /// Height in pixels, if known
    pub height: Option<u32>,
    /// Width in pixels, if known
    pub width: Option<u32>,
}

/// Follower information for an artist, user or playlist.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct Followers {
    /// Always `None` in current API responses
    pub href: Option<String>,
    /// Total number of followers
    #[serde(default)]
    pub total: u64,
}

/// Copyright statement attached to an album or show.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Copyright {
    pub text: String,
    /// `C` for copyright, `P` for performance copyright
    #[serde(rename = "type")]
    pub kind: String,
}

/// Content restriction applied to a track, album or episode.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Restrictions {
    /// Reason of the restriction, e.g. "market", "product" or "explicit"
    pub reason: String,
}

/// Map of external URLs keyed by platform (usually just `spotify`).
pub type ExternalUrls = HashMap<String, String>;

/// Map of external identifiers keyed by scheme (`isrc`, `ean`, `upc`).
pub type ExternalIds = HashMap<String, String>;

/// Return the image with the largest surface, images without dimensions last.
pub fn largest_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .max_by_key(|image| image.width.unwrap_or(0) as u64 * image.height.unwrap_or(0) as u64)
}

/// Return the image with the smallest known surface.
pub fn smallest_image(images: &[Image]) -> Option<&Image> {
    images
        .iter()
        .filter(|image| image.width.is_some() && image.height.is_some())
        .min_by_key(|image| image.width.unwrap_or(0) as u64 * image.height.unwrap_or(0) as u64)
        .or_else(|| images.first())
}

/// Types of resources available through search.
#[derive(
    Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy, Hash,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SearchType {
    Album,
    Artist,
    Playlist,
    Track,
    Show,
    Episode,
}

impl SearchType {
    /// Every searchable type, in the order the API documents them.
    pub const ALL: [SearchType; 6] = [
        SearchType::Album,
        SearchType::Artist,
        SearchType::Playlist,
        SearchType::Track,
        SearchType::Show,
        SearchType::Episode,
    ];
}

/// Time frame over which top items are computed.
#[derive(
    Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy, Default,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum TimeRange {
    /// Approximately the last 4 weeks
    ShortTerm,
    /// Approximately the last 6 months
    #[default]
    MediumTerm,
    /// Roughly the last year
    LongTerm,
}

/// Pagination options shared by most listing endpoints.
///
/// Unset fields are left out of the request and the service default applies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PagingOptions {
    /// Maximum number of items to return
    pub limit: Option<u32>,
    /// Index of the first item to return
    pub offset: Option<u32>,
    /// Market to apply track relinking for; falls back to the client default
    pub market: Option<String>,
}

impl PagingOptions {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
            market: None,
        }
    }

    pub(crate) fn params(&self, client: &Client) -> Value {
        serde_json::json!({
            "limit": self.limit,
            "offset": self.offset,
            "market": client.market_or(self.market.as_deref()),
        })
    }
}

/// An offset-based page of items as returned by the Spotify API.
///
/// `null` entries inside `items` are dropped while deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Page<T> {
    /// Link to the full result of this endpoint
    #[serde(default)]
    pub href: Option<String>,
    /// Items in the current page
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<T>,
    /// Maximum number of items per page
    #[serde(default)]
    pub limit: u32,
    /// URL of the next page, if any
    #[serde(default)]
    pub next: Option<String>,
    /// Offset of the current page
    #[serde(default)]
    pub offset: u32,
    /// URL of the previous page, if any
    #[serde(default)]
    pub previous: Option<String>,
    /// Total number of items available
    #[serde(default)]
    pub total: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            href: None,
            items: Vec::new(),
            limit: 0,
            next: None,
            offset: 0,
            previous: None,
            total: 0,
        }
    }
}

/// Cursor values of a [`CursorPage`].
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Cursors {
    pub after: Option<String>,
    pub before: Option<String>,
}

/// A cursor-based page of items, used by the following and recently played
/// endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct CursorPage<T> {
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default, deserialize_with = "deserialize_items")]
    pub items: Vec<T>,
    #[serde(default)]
    pub limit: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub cursors: Cursors,
    pub total: Option<u32>,
}

impl<T> Default for CursorPage<T> {
    fn default() -> Self {
        Self {
            href: None,
            items: Vec::new(),
            limit: 0,
            next: None,
            cursors: Cursors::default(),
            total: None,
        }
    }
}

/// An item from the user's library together with the time it was saved.
#[derive(Debug, Clone)]
pub struct Saved<T> {
    /// ISO timestamp when the item was saved
    pub added_at: String,
    /// The saved item
    pub item: Arc<T>,
}

// Utility function to deserialize a null value as a default value
pub(crate) fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + serde::Deserialize<'de>,
{
    Option::deserialize(deserializer).map(|opt| opt.unwrap_or_default())
}

// The API uses `null` for items it could not resolve; skip them.
pub(crate) fn deserialize_items<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    let items: Option<Vec<Option<T>>> = Option::deserialize(deserializer)?;
    Ok(items.unwrap_or_default().into_iter().flatten().collect())
}

// Comma separated id list as the API expects it.
pub(crate) fn join_ids<S: AsRef<str>>(ids: &[S]) -> String {
    ids.iter().map(AsRef::as_ref).collect::<Vec<_>>().join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_skips_null_items() {
        let page: Page<Image> = serde_json::from_value(serde_json::json!({
            "items": [{"url": "a"}, null, {"url": "b", "height": 64, "width": 64}],
            "total": 3
        }))
        .unwrap();

        assert_eq!(page.items.len(), 2);
        assert_eq!(page.items[1].url, "b");
        assert_eq!(page.total, 3);
        assert!(!page.has_next());
    }

    #[test]
    fn page_reference_form_has_no_items() {
        let page: Page<Image> = serde_json::from_value(serde_json::json!({
            "href": "https://api.spotify.com/v1/playlists/x/tracks",
            "total": 42
        }))
        .unwrap();

        assert!(page.is_empty());
        assert_eq!(page.total, 42);
    }

    #[test]
    fn image_selection() {
        let images = vec![
            Image { url: "300".into(), height: Some(300), width: Some(300) },
            Image { url: "640".into(), height: Some(640), width: Some(640) },
            Image { url: "64".into(), height: Some(64), width: Some(64) },
        ];

        assert_eq!(largest_image(&images).unwrap().url, "640");
        assert_eq!(smallest_image(&images).unwrap().url, "64");
        assert!(largest_image(&[]).is_none());
    }

    #[test]
    fn search_type_strings() {
        assert_eq!(SearchType::Track.as_ref(), "track");
        assert_eq!("episode".parse::<SearchType>().unwrap(), SearchType::Episode);
        assert_eq!(TimeRange::ShortTerm.as_ref(), "short_term");
        assert_eq!(TimeRange::default(), TimeRange::MediumTerm);
    }

    #[test]
    fn join_ids_uses_commas() {
        assert_eq!(join_ids(&["a", "b", "c"]), "a,b,c");
        assert_eq!(join_ids::<&str>(&[]), "");
    }
}

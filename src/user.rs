use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::CursorPage;
use crate::Error;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Followers;
use crate::Image;
use crate::Page;
use crate::PagingOptions;
use crate::Saved;
use crate::TimeRange;
use crate::album::Album;
use crate::artist::Artist;
use crate::deserialize_null_default;
use crate::episode::Episode;
use crate::join_ids;
use crate::largest_image;
use crate::playlist::Playlist;
use crate::show::Show;
use crate::track::Track;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use strum_macros::{AsRefStr, EnumString};

/// Represents a Spotify user profile.
///
/// The private fields (`country`, `email`, `product`, `explicit_content`) are
/// only filled for the current user and only with the matching scopes.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
#[serde(default)]
pub struct User {
    pub id: String,
    /// Name displayed on the profile, `None` if not available
    pub display_name: Option<String>,
    pub uri: String,
    /// Object type, always "user"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    pub followers: Option<Followers>,
    /// Country of the account (ISO 3166-1 alpha-2)
    pub country: Option<String>,
    pub email: Option<String>,
    /// Subscription level, e.g. "premium" or "free"
    pub product: Option<String>,
    pub explicit_content: Option<ExplicitContent>,
}

impl User {
    /// The open.spotify.com URL of the profile, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available profile picture.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }

    /// Display name, falling back to the user id.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

impl Cached for User {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.users
    }
}

/// Explicit content settings of the current user.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ExplicitContent {
    pub filter_enabled: bool,
    pub filter_locked: bool,
}

/// Kind of entity that can be followed through `/me/following`.
#[derive(Debug, Serialize, Deserialize, EnumString, AsRefStr, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FollowType {
    Artist,
    User,
}

/// Options for [`UserClient::get_top_artists`] and
/// [`UserClient::get_top_tracks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopOptions {
    pub time_range: Option<TimeRange>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

/// Options for [`UserClient::get_recently_played`].
///
/// `after` and `before` are Unix timestamps in milliseconds; only one of
/// them may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentlyPlayedOptions {
    pub limit: Option<u32>,
    pub after: Option<i64>,
    pub before: Option<i64>,
}

/// Options for [`UserClient::get_followed_artists`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowedArtistsOptions {
    pub limit: Option<u32>,
    /// Last artist id of the previous page
    pub after: Option<String>,
}

/// The context a track was played from.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct PlayContext {
    /// "album", "artist", "playlist" or "show"
    #[serde(rename = "type")]
    pub kind: String,
    pub uri: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
}

/// A track from the current user's listening history.
#[derive(Debug, Clone)]
pub struct RecentlyPlayed {
    pub track: Arc<Track>,
    /// ISO timestamp of the play
    pub played_at: String,
    pub context: Option<PlayContext>,
}

#[derive(Deserialize)]
struct PlayHistory {
    track: Track,
    played_at: String,
    context: Option<PlayContext>,
}

// Library entries name the item after its type ("album", "track", ...).
#[derive(Deserialize)]
struct SavedItem<T> {
    added_at: String,
    #[serde(alias = "album", alias = "track", alias = "show", alias = "episode")]
    item: T,
}

#[derive(Deserialize)]
struct FollowedArtistsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    artists: CursorPage<Artist>,
}

// Flags come back in query order; pad or cut so every id gets one.
fn membership(flags: Option<Vec<bool>>, len: usize) -> Vec<bool> {
    let mut flags = flags.unwrap_or_default();
    flags.resize(len, false);
    flags
}

/// Endpoints about arbitrary users (`/users`).
#[derive(Debug, Clone)]
pub struct UserManager {
    client: Client,
}

impl Client {
    /// Manager for public user endpoints.
    pub fn users(&self) -> UserManager {
        UserManager::new(self.clone())
    }

    /// Client for the user the access token belongs to.
    pub fn user(&self) -> UserClient {
        UserClient::new(self.clone())
    }
}

impl UserManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get a user's public profile, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<User>>, Error> {
        self.client
            .get_cached(id, force, &format!("/users/{id}"), FetchRequest::get())
            .await
    }

    /// Get one page of a user's public playlists.
    pub async fn get_playlists(
        &self,
        id: &str,
        options: PagingOptions,
    ) -> Result<Vec<Arc<Playlist>>, Error> {
        let params = serde_json::json!({
            "limit": options.limit,
            "offset": options.offset,
        });

        let resp: Option<Page<Playlist>> = self
            .client
            .fetch_as(&format!("/users/{id}/playlists"), FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }

    /// Check for each user whether they follow the playlist.
    ///
    /// The result has one flag per id, all `false` when the service returns
    /// nothing.
    pub async fn follows_playlist<S: AsRef<str>>(
        &self,
        playlist_id: &str,
        user_ids: &[S],
    ) -> Result<Vec<bool>, Error> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({ "ids": join_ids(user_ids) });

        let flags: Option<Vec<bool>> = self
            .client
            .fetch_as(
                &format!("/playlists/{playlist_id}/followers/contains"),
                FetchRequest::get().params(params),
            )
            .await?;

        Ok(membership(flags, user_ids.len()))
    }
}

/// Endpoints about the user the access token belongs to (`/me`).
///
/// The profile loaded by [`UserClient::patch_info`] is shared by every
/// `UserClient` of the same [`Client`].
///
/// # Example
///
/// ```no_run
/// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
/// let me = client.user();
/// let profile = me.patch_info().await?;
/// println!("Logged in as {}", profile.name());
///
/// let saved = me.has_tracks(&["4uLU6hMCjMI75M1A2tKUQC"]).await?;
/// println!("Saved: {}", saved[0]);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct UserClient {
    client: Client,
}

impl UserClient {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// The profile loaded by the last [`UserClient::patch_info`], if any.
    pub fn info(&self) -> Option<Arc<User>> {
        self.client.current_user().load_full()
    }

    /// Load (or reload) the current user's profile from `/me`.
    ///
    /// Fails with [`Error::Api`] when the service returns no profile, since
    /// every token belongs to some user.
    pub async fn patch_info(&self) -> Result<Arc<User>, Error> {
        let user: Option<User> = self.client.fetch_as("/me", FetchRequest::get()).await?;

        let user = user.ok_or_else(|| {
            Error::Api("Could not load private user data from the user authorized token".into())
        })?;

        let user = self.client.cache().insert(user);
        self.client.current_user().store(Some(user.clone()));

        Ok(user)
    }

    /// Get one page of the current user's playlists.
    pub async fn get_playlists(&self, options: PagingOptions) -> Result<Vec<Arc<Playlist>>, Error> {
        let params = serde_json::json!({
            "limit": options.limit,
            "offset": options.offset,
        });

        let resp: Option<Page<Playlist>> = self
            .client
            .fetch_as("/me/playlists", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }

    /// Get the current user's most listened artists.
    pub async fn get_top_artists(&self, options: TopOptions) -> Result<Vec<Arc<Artist>>, Error> {
        self.top("/me/top/artists", options).await
    }

    /// Get the current user's most listened tracks.
    pub async fn get_top_tracks(&self, options: TopOptions) -> Result<Vec<Arc<Track>>, Error> {
        self.top("/me/top/tracks", options).await
    }

    async fn top<T>(&self, path: &str, options: TopOptions) -> Result<Vec<Arc<T>>, Error>
    where
        T: Cached + DeserializeOwned,
    {
        let params = serde_json::json!({
            "time_range": options.time_range.map(|range| range.as_ref().to_string()),
            "limit": options.limit,
            "offset": options.offset,
        });

        let resp: Option<Page<T>> = self
            .client
            .fetch_as(path, FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }

    /// Get the tracks the current user played most recently.
    pub async fn get_recently_played(
        &self,
        options: RecentlyPlayedOptions,
    ) -> Result<Vec<RecentlyPlayed>, Error> {
        let params = serde_json::json!({
            "limit": options.limit,
            "after": options.after,
            "before": options.before,
        });

        let resp: Option<CursorPage<PlayHistory>> = self
            .client
            .fetch_as("/me/player/recently-played", FetchRequest::get().params(params))
            .await?;

        let history = resp.map(|page| page.items).unwrap_or_default();

        Ok(history
            .into_iter()
            .map(|entry| RecentlyPlayed {
                track: self.client.cache().create(entry.track),
                played_at: entry.played_at,
                context: entry.context,
            })
            .collect())
    }

    /// Get one page of the albums saved in the current user's library.
    pub async fn get_saved_albums(&self, options: PagingOptions) -> Result<Vec<Saved<Album>>, Error> {
        self.saved("/me/albums", options).await
    }

    /// Get one page of the tracks saved in the current user's library.
    pub async fn get_saved_tracks(&self, options: PagingOptions) -> Result<Vec<Saved<Track>>, Error> {
        self.saved("/me/tracks", options).await
    }

    /// Get one page of the shows saved in the current user's library.
    pub async fn get_saved_shows(&self, options: PagingOptions) -> Result<Vec<Saved<Show>>, Error> {
        self.saved("/me/shows", options).await
    }

    /// Get one page of the episodes saved in the current user's library.
    pub async fn get_saved_episodes(
        &self,
        options: PagingOptions,
    ) -> Result<Vec<Saved<Episode>>, Error> {
        self.saved("/me/episodes", options).await
    }

    async fn saved<T>(&self, path: &str, options: PagingOptions) -> Result<Vec<Saved<T>>, Error>
    where
        T: Cached + DeserializeOwned,
    {
        let params = options.params(&self.client);

        let resp: Option<Page<SavedItem<T>>> = self
            .client
            .fetch_as(path, FetchRequest::get().params(params))
            .await?;

        let items = resp.map(|page| page.items).unwrap_or_default();

        Ok(items
            .into_iter()
            .map(|saved| Saved {
                added_at: saved.added_at,
                item: self.client.cache().create(saved.item),
            })
            .collect())
    }

    pub async fn save_albums<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::put(), "/me/albums", ids).await
    }

    pub async fn remove_albums<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::delete(), "/me/albums", ids).await
    }

    /// Check which of the albums are saved in the current user's library.
    pub async fn has_albums<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/albums/contains", ids, None).await
    }

    pub async fn save_tracks<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::put(), "/me/tracks", ids).await
    }

    pub async fn remove_tracks<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::delete(), "/me/tracks", ids).await
    }

    /// Check which of the tracks are saved in the current user's library.
    pub async fn has_tracks<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/tracks/contains", ids, None).await
    }

    pub async fn save_shows<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::put(), "/me/shows", ids).await
    }

    pub async fn remove_shows<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::delete(), "/me/shows", ids).await
    }

    /// Check which of the shows are saved in the current user's library.
    pub async fn has_shows<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/shows/contains", ids, None).await
    }

    pub async fn save_episodes<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::put(), "/me/episodes", ids).await
    }

    pub async fn remove_episodes<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.library(FetchRequest::delete(), "/me/episodes", ids).await
    }

    /// Check which of the episodes are saved in the current user's library.
    pub async fn has_episodes<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/episodes/contains", ids, None).await
    }

    /// Check which of the users the current user follows.
    pub async fn follows_users<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/following/contains", ids, Some(FollowType::User))
            .await
    }

    /// Check which of the artists the current user follows.
    pub async fn follows_artists<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<bool>, Error> {
        self.contains("/me/following/contains", ids, Some(FollowType::Artist))
            .await
    }

    pub async fn follow_users<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.following(FetchRequest::put(), FollowType::User, ids).await
    }

    pub async fn follow_artists<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.following(FetchRequest::put(), FollowType::Artist, ids).await
    }

    pub async fn unfollow_users<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.following(FetchRequest::delete(), FollowType::User, ids).await
    }

    pub async fn unfollow_artists<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), Error> {
        self.following(FetchRequest::delete(), FollowType::Artist, ids).await
    }

    /// Follow a playlist, optionally showing it on the public profile.
    pub async fn follow_playlist(&self, id: &str, public: bool) -> Result<(), Error> {
        let body = serde_json::json!({ "public": public });

        self.client
            .fetch(&format!("/playlists/{id}/followers"), FetchRequest::put().body(body))
            .await?;

        Ok(())
    }

    pub async fn unfollow_playlist(&self, id: &str) -> Result<(), Error> {
        self.client
            .fetch(&format!("/playlists/{id}/followers"), FetchRequest::delete())
            .await?;

        Ok(())
    }

    /// Get one page of the artists the current user follows.
    pub async fn get_followed_artists(
        &self,
        options: FollowedArtistsOptions,
    ) -> Result<Vec<Arc<Artist>>, Error> {
        let params = serde_json::json!({
            "type": FollowType::Artist.as_ref(),
            "limit": options.limit,
            "after": options.after,
        });

        let resp: Option<FollowedArtistsResponse> = self
            .client
            .fetch_as("/me/following", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.artists.items))
            .unwrap_or_default())
    }

    async fn library<S: AsRef<str>>(
        &self,
        request: FetchRequest,
        path: &str,
        ids: &[S],
    ) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }

        let params = serde_json::json!({ "ids": join_ids(ids) });
        self.client.fetch(path, request.params(params)).await?;

        Ok(())
    }

    async fn following<S: AsRef<str>>(
        &self,
        request: FetchRequest,
        kind: FollowType,
        ids: &[S],
    ) -> Result<(), Error> {
        if ids.is_empty() {
            return Ok(());
        }

        let params = serde_json::json!({
            "type": kind.as_ref(),
            "ids": join_ids(ids),
        });
        self.client.fetch("/me/following", request.params(params)).await?;

        Ok(())
    }

    async fn contains<S: AsRef<str>>(
        &self,
        path: &str,
        ids: &[S],
        kind: Option<FollowType>,
    ) -> Result<Vec<bool>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({
            "type": kind.map(|kind| kind.as_ref().to_string()),
            "ids": join_ids(ids),
        });

        let flags: Option<Vec<bool>> = self
            .client
            .fetch_as(path, FetchRequest::get().params(params))
            .await?;

        Ok(membership(flags, ids.len()))
    }
}

use crate::Client;
use crate::Error;
use crate::FetchRequest;
use crate::Page;
use crate::SearchType;
use crate::album::Album;
use crate::artist::Artist;
use crate::deserialize_null_default;
use crate::episode::Episode;
use crate::join_ids;
use crate::playlist::Playlist;
use crate::show::Show;
use crate::track::Track;
use serde::Deserialize;
use std::sync::Arc;

/// Options for a catalog search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    /// Maximum number of results per type
    pub limit: Option<u32>,
    /// Index of the first result per type
    pub offset: Option<u32>,
    /// Only return content playable in this market
    pub market: Option<String>,
    /// Include externally hosted audio in episode results
    pub include_external: bool,
}

impl SearchOptions {
    pub fn with_limit(limit: u32) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }
}

/// Results from a search, one list per searched type.
///
/// Types that were not searched for are empty.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    pub tracks: Vec<Arc<Track>>,
    pub albums: Vec<Arc<Album>>,
    pub artists: Vec<Arc<Artist>>,
    pub playlists: Vec<Arc<Playlist>>,
    pub shows: Vec<Arc<Show>>,
    pub episodes: Vec<Arc<Episode>>,
}

impl SearchResults {
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
            && self.albums.is_empty()
            && self.artists.is_empty()
            && self.playlists.is_empty()
            && self.shows.is_empty()
            && self.episodes.is_empty()
    }
}

#[derive(Deserialize, Default)]
#[serde(default)]
struct SearchResponse {
    #[serde(deserialize_with = "deserialize_null_default")]
    tracks: Page<Track>,
    #[serde(deserialize_with = "deserialize_null_default")]
    albums: Page<Album>,
    #[serde(deserialize_with = "deserialize_null_default")]
    artists: Page<Artist>,
    #[serde(deserialize_with = "deserialize_null_default")]
    playlists: Page<Playlist>,
    #[serde(deserialize_with = "deserialize_null_default")]
    shows: Page<Show>,
    #[serde(deserialize_with = "deserialize_null_default")]
    episodes: Page<Episode>,
}

impl Client {
    /// Search the catalog across one or more types.
    ///
    /// An empty `types` slice searches every type.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotrs::{SearchOptions, SearchType};
    ///
    /// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
    /// let results = client
    ///     .search("Radiohead", &[SearchType::Artist, SearchType::Album], SearchOptions::with_limit(5))
    ///     .await?;
    ///
    /// for artist in &results.artists {
    ///     println!("Artist: {}", artist.name);
    /// }
    /// for album in &results.albums {
    ///     println!("Album: {}", album.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn search(
        &self,
        query: &str,
        types: &[SearchType],
        options: SearchOptions,
    ) -> Result<SearchResults, Error> {
        let types = if types.is_empty() {
            &SearchType::ALL[..]
        } else {
            types
        };

        let params = serde_json::json!({
            "q": query,
            "type": join_ids(types),
            "limit": options.limit,
            "offset": options.offset,
            "market": self.market_or(options.market.as_deref()),
            "include_external": options.include_external.then_some("audio"),
        });

        let resp: Option<SearchResponse> = self
            .fetch_as("/search", FetchRequest::get().params(params))
            .await?;

        let resp = resp.unwrap_or_default();

        Ok(SearchResults {
            tracks: self.create_all(resp.tracks.items),
            albums: self.create_all(resp.albums.items),
            artists: self.create_all(resp.artists.items),
            playlists: self.create_all(resp.playlists.items),
            shows: self.create_all(resp.shows.items),
            episodes: self.create_all(resp.episodes.items),
        })
    }
}

use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::Error;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Image;
use crate::Restrictions;
use crate::SearchOptions;
use crate::SearchType;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::join_ids;
use crate::largest_image;
use crate::show::Show;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Represents a podcast episode.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Episode {
    pub id: String,
    pub name: String,
    pub uri: String,
    /// Object type, always "episode"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    pub description: Option<String>,
    pub html_description: Option<String>,
    /// Episode length in milliseconds
    pub duration_ms: u64,
    pub explicit: bool,
    pub is_externally_hosted: Option<bool>,
    pub is_playable: Option<bool>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub languages: Vec<String>,
    /// Release date, precision given by `release_date_precision`
    pub release_date: Option<String>,
    pub release_date_precision: Option<String>,
    /// 30 second preview URL
    pub audio_preview_url: Option<String>,
    /// Playback position of the current user
    pub resume_point: Option<ResumePoint>,
    pub restrictions: Option<Restrictions>,
    /// The show the episode belongs to (full episode only)
    pub show: Option<Show>,
}

impl Episode {
    /// Episode length as a `Duration`.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// The open.spotify.com URL of the episode, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available cover image.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }
}

impl Cached for Episode {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.episodes
    }
}

/// Where the current user stopped listening to an episode.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ResumePoint {
    pub fully_played: bool,
    pub resume_position_ms: u64,
}

#[derive(Deserialize)]
struct EpisodesResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    episodes: Vec<Episode>,
}

/// Endpoints of the podcast episode catalog (`/episodes`).
#[derive(Debug, Clone)]
pub struct EpisodeManager {
    client: Client,
}

impl Client {
    /// Manager for episode endpoints.
    pub fn episodes(&self) -> EpisodeManager {
        EpisodeManager::new(self.clone())
    }
}

impl EpisodeManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for episodes.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Episode>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Episode], options)
            .await?;

        Ok(results.episodes)
    }

    /// Get an episode by ID, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Episode>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(None),
        });

        self.client
            .get_cached(id, force, &format!("/episodes/{id}"), FetchRequest::get().params(params))
            .await
    }

    /// Get several episodes at once. Unknown ids are skipped.
    pub async fn get_multiple<S: AsRef<str>>(
        &self,
        ids: &[S],
    ) -> Result<Vec<Arc<Episode>>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({
            "ids": join_ids(ids),
            "market": self.client.market_or(None),
        });

        let resp: Option<EpisodesResponse> = self
            .client
            .fetch_as("/episodes", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.episodes))
            .unwrap_or_default())
    }
}

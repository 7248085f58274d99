use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::Copyright;
use crate::Error;
use crate::ExternalUrls;
use crate::FetchRequest;
use crate::Image;
use crate::Page;
use crate::PagingOptions;
use crate::SearchOptions;
use crate::SearchType;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::episode::Episode;
use crate::join_ids;
use crate::largest_image;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Represents a podcast show.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Show {
    pub id: String,
    pub name: String,
    pub uri: String,
    /// Object type, always "show"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub external_urls: ExternalUrls,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub images: Vec<Image>,
    /// Plain-text description
    pub description: Option<String>,
    /// Description possibly containing HTML tags
    pub html_description: Option<String>,
    pub explicit: bool,
    /// ISO 639 codes of the languages used
    #[serde(deserialize_with = "deserialize_null_default")]
    pub languages: Vec<String>,
    /// e.g. "audio"
    pub media_type: Option<String>,
    pub publisher: Option<String>,
    pub total_episodes: Option<u32>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub available_markets: Vec<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub copyrights: Vec<Copyright>,
    pub is_externally_hosted: Option<bool>,
    /// First page of episodes (full show only)
    pub episodes: Option<Page<Episode>>,
}

impl Show {
    /// The open.spotify.com URL of the show, if known.
    pub fn external_url(&self) -> Option<&str> {
        self.external_urls.get("spotify").map(String::as_str)
    }

    /// The largest available cover image.
    pub fn largest_image(&self) -> Option<&Image> {
        largest_image(&self.images)
    }
}

impl Cached for Show {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.shows
    }
}

#[derive(Deserialize)]
struct ShowsResponse {
    #[serde(default, deserialize_with = "deserialize_items")]
    shows: Vec<Show>,
}

/// Endpoints of the podcast show catalog (`/shows`).
#[derive(Debug, Clone)]
pub struct ShowManager {
    client: Client,
}

impl Client {
    /// Manager for show endpoints.
    pub fn shows(&self) -> ShowManager {
        ShowManager::new(self.clone())
    }
}

impl ShowManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Search the catalog for shows.
    pub async fn search(
        &self,
        query: &str,
        options: SearchOptions,
    ) -> Result<Vec<Arc<Show>>, Error> {
        let results = self
            .client
            .search(query, &[SearchType::Show], options)
            .await?;

        Ok(results.shows)
    }

    /// Get a show by ID, from the cache unless `force` is set.
    pub async fn get(&self, id: &str, force: bool) -> Result<Option<Arc<Show>>, Error> {
        let params = serde_json::json!({
            "market": self.client.market_or(None),
        });

        self.client
            .get_cached(id, force, &format!("/shows/{id}"), FetchRequest::get().params(params))
            .await
    }

    /// Get several shows at once. Unknown ids are skipped.
    pub async fn get_multiple<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<Arc<Show>>, Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let params = serde_json::json!({
            "ids": join_ids(ids),
            "market": self.client.market_or(None),
        });

        let resp: Option<ShowsResponse> = self
            .client
            .fetch_as("/shows", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.shows))
            .unwrap_or_default())
    }

    /// Get one page of a show's episodes.
    pub async fn get_episodes(
        &self,
        id: &str,
        options: PagingOptions,
    ) -> Result<Vec<Arc<Episode>>, Error> {
        let params = options.params(&self.client);

        let resp: Option<Page<Episode>> = self
            .client
            .fetch_as(&format!("/shows/{id}/episodes"), FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|page| self.client.create_all(page.items))
            .unwrap_or_default())
    }
}

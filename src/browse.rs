use crate::Cache;
use crate::CacheStore;
use crate::Cached;
use crate::Client;
use crate::Error;
use crate::FetchRequest;
use crate::Image;
use crate::Page;
use crate::album::Album;
use crate::deserialize_items;
use crate::deserialize_null_default;
use crate::join_ids;
use crate::playlist::Playlist;
use crate::track::Track;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// A browse category, e.g. "Mood" or "Hip-Hop".
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub href: Option<String>,
    #[serde(deserialize_with = "deserialize_null_default")]
    pub icons: Vec<Image>,
}

impl Cached for Category {
    fn cache_id(&self) -> &str {
        &self.id
    }

    fn store(cache: &Cache) -> &CacheStore<Self> {
        &cache.categories
    }
}

/// Playlists featured by Spotify, with the headline shown above them.
#[derive(Debug, Clone, Default)]
pub struct FeaturedPlaylists {
    pub message: Option<String>,
    pub playlists: Vec<Arc<Playlist>>,
}

/// Seed a recommendation was computed from.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RecommendationSeed {
    pub id: String,
    /// "artist", "track" or "genre"
    #[serde(rename = "type")]
    pub kind: String,
    pub href: Option<String>,
    pub initial_pool_size: u32,
    pub after_filtering_size: u32,
    pub after_relinking_size: u32,
}

/// Tracks recommended from a set of seeds.
#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    pub seeds: Vec<RecommendationSeed>,
    pub tracks: Vec<Arc<Track>>,
}

/// Options for the browse listings.
///
/// `country` falls back to the client's default market.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrowseOptions {
    pub country: Option<String>,
    /// e.g. "es_MX"
    pub locale: Option<String>,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl BrowseOptions {
    fn params(&self, client: &Client) -> Value {
        serde_json::json!({
            "country": client.market_or(self.country.as_deref()),
            "locale": self.locale,
            "limit": self.limit,
            "offset": self.offset,
        })
    }
}

/// Options for [`BrowseManager::get_recommendations`].
///
/// Up to five seeds in total are accepted by the service. Tunable
/// attributes use the full parameter name, e.g. `min_energy` or
/// `target_tempo`. Whole numbers are sent without a fraction, as the
/// integer tunables (`target_popularity`, `min_key`, ...) require.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecommendationsOptions {
    pub seed_artists: Vec<String>,
    pub seed_genres: Vec<String>,
    pub seed_tracks: Vec<String>,
    pub limit: Option<u32>,
    pub market: Option<String>,
    pub tunables: BTreeMap<String, f64>,
}

// Integer tunables reject "50.0"; send whole numbers as integers.
fn tunable_value(value: f64) -> Value {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Value::from(value as i64)
    } else {
        Value::from(value)
    }
}

#[derive(Deserialize)]
struct NewReleasesResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    albums: Page<Album>,
}

#[derive(Deserialize)]
struct PlaylistsResponse {
    message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    playlists: Page<Playlist>,
}

#[derive(Deserialize)]
struct CategoriesResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    categories: Page<Category>,
}

#[derive(Deserialize)]
struct RecommendationsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    seeds: Vec<RecommendationSeed>,
    #[serde(default, deserialize_with = "deserialize_items")]
    tracks: Vec<Track>,
}

#[derive(Deserialize)]
struct GenreSeedsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    genres: Vec<String>,
}

/// Endpoints of the browse section and recommendations.
#[derive(Debug, Clone)]
pub struct BrowseManager {
    client: Client,
}

impl Client {
    /// Manager for browse and recommendation endpoints.
    pub fn browse(&self) -> BrowseManager {
        BrowseManager::new(self.clone())
    }
}

impl BrowseManager {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Get one page of new album releases.
    pub async fn get_new_releases(&self, options: BrowseOptions) -> Result<Vec<Arc<Album>>, Error> {
        let params = options.params(&self.client);

        let resp: Option<NewReleasesResponse> = self
            .client
            .fetch_as("/browse/new-releases", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.albums.items))
            .unwrap_or_default())
    }

    /// Get one page of featured playlists.
    pub async fn get_featured_playlists(
        &self,
        options: BrowseOptions,
    ) -> Result<FeaturedPlaylists, Error> {
        let params = options.params(&self.client);

        let resp: Option<PlaylistsResponse> = self
            .client
            .fetch_as("/browse/featured-playlists", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| FeaturedPlaylists {
                message: resp.message,
                playlists: self.client.create_all(resp.playlists.items),
            })
            .unwrap_or_default())
    }

    /// Get one page of browse categories.
    pub async fn get_categories(&self, options: BrowseOptions) -> Result<Vec<Arc<Category>>, Error> {
        let params = options.params(&self.client);

        let resp: Option<CategoriesResponse> = self
            .client
            .fetch_as("/browse/categories", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.categories.items))
            .unwrap_or_default())
    }

    /// Get a single category, from the cache unless `force` is set.
    pub async fn get_category(&self, id: &str, force: bool) -> Result<Option<Arc<Category>>, Error> {
        let params = serde_json::json!({
            "country": self.client.market_or(None),
        });

        self.client
            .get_cached(
                id,
                force,
                &format!("/browse/categories/{id}"),
                FetchRequest::get().params(params),
            )
            .await
    }

    /// Get one page of a category's playlists.
    pub async fn get_category_playlists(
        &self,
        id: &str,
        options: BrowseOptions,
    ) -> Result<Vec<Arc<Playlist>>, Error> {
        let params = serde_json::json!({
            "country": self.client.market_or(options.country.as_deref()),
            "limit": options.limit,
            "offset": options.offset,
        });

        let resp: Option<PlaylistsResponse> = self
            .client
            .fetch_as(
                &format!("/browse/categories/{id}/playlists"),
                FetchRequest::get().params(params),
            )
            .await?;

        Ok(resp
            .map(|resp| self.client.create_all(resp.playlists.items))
            .unwrap_or_default())
    }

    /// Get track recommendations for the given seeds.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use spotrs::RecommendationsOptions;
    ///
    /// # async fn example(client: spotrs::Client) -> Result<(), spotrs::Error> {
    /// let mut options = RecommendationsOptions {
    ///     seed_genres: vec!["ambient".to_string()],
    ///     limit: Some(10),
    ///     ..RecommendationsOptions::default()
    /// };
    /// options.tunables.insert("max_energy".to_string(), 0.4);
    ///
    /// let recommendations = client.browse().get_recommendations(options).await?;
    /// for track in recommendations.tracks {
    ///     println!("{}", track.name);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_recommendations(
        &self,
        options: RecommendationsOptions,
    ) -> Result<Recommendations, Error> {
        let mut params = serde_json::json!({
            "limit": options.limit,
            "market": self.client.market_or(options.market.as_deref()),
        });

        for (key, seeds) in [
            ("seed_artists", &options.seed_artists),
            ("seed_genres", &options.seed_genres),
            ("seed_tracks", &options.seed_tracks),
        ] {
            if !seeds.is_empty() {
                params[key] = Value::String(join_ids(seeds.as_slice()));
            }
        }

        for (key, value) in &options.tunables {
            params[key.as_str()] = tunable_value(*value);
        }

        let resp: Option<RecommendationsResponse> = self
            .client
            .fetch_as("/recommendations", FetchRequest::get().params(params))
            .await?;

        Ok(resp
            .map(|resp| Recommendations {
                seeds: resp.seeds,
                tracks: self.client.create_all(resp.tracks),
            })
            .unwrap_or_default())
    }

    /// Get the genres accepted as recommendation seeds.
    pub async fn get_available_genre_seeds(&self) -> Result<Vec<String>, Error> {
        let resp: Option<GenreSeedsResponse> = self
            .client
            .fetch_as("/recommendations/available-genre-seeds", FetchRequest::get())
            .await?;

        Ok(resp.map(|resp| resp.genres).unwrap_or_default())
    }
}

use crate::album::Album;
use crate::artist::Artist;
use crate::browse::Category;
use crate::episode::Episode;
use crate::playlist::Playlist;
use crate::show::Show;
use crate::track::Track;
use crate::user::User;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Which entity types the [`Cache`] keeps.
///
/// Everything is off by default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    pub users: bool,
    pub artists: bool,
    pub tracks: bool,
    pub albums: bool,
    pub playlists: bool,
    pub shows: bool,
    pub episodes: bool,
    pub categories: bool,
}

impl CacheSettings {
    /// Cache every entity type.
    pub fn all() -> Self {
        Self {
            users: true,
            artists: true,
            tracks: true,
            albums: true,
            playlists: true,
            shows: true,
            episodes: true,
            categories: true,
        }
    }

    /// Cache nothing.
    pub fn none() -> Self {
        Self::default()
    }
}

/// An entity that can live in the [`Cache`].
pub trait Cached: Send + Sync + Sized + 'static {
    /// Identifier the entry is keyed by
    fn cache_id(&self) -> &str;

    /// The store holding entities of this type
    fn store(cache: &Cache) -> &CacheStore<Self>;
}

/// ID-keyed store for one entity type.
///
/// Entries stay until they are removed or the store is dropped; there is no
/// eviction.
pub struct CacheStore<T> {
    enabled: bool,
    entries: RwLock<HashMap<String, Arc<T>>>,
}

impl<T: Cached> CacheStore<T> {
    fn new(enabled: bool) -> Self {
        Self {
            enabled,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn get(&self, id: &str) -> Option<Arc<T>> {
        self.entries.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.read().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn remove(&self, id: &str) -> Option<Arc<T>> {
        self.entries.write().remove(id)
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    // Existing entry wins; the new item is dropped.
    fn create(&self, item: T) -> Arc<T> {
        if !self.enabled || item.cache_id().is_empty() {
            return Arc::new(item);
        }

        let id = item.cache_id().to_string();
        self.entries
            .write()
            .entry(id)
            .or_insert_with(|| Arc::new(item))
            .clone()
    }

    // New item wins.
    fn insert(&self, item: T) -> Arc<T> {
        let item = Arc::new(item);
        if self.enabled && !item.cache_id().is_empty() {
            self.entries
                .write()
                .insert(item.cache_id().to_string(), item.clone());
        }
        item
    }
}

/// In-memory entity cache shared by all managers of a client.
///
/// [`Cache::create`] is the cache-aware factory: for a given id it always
/// hands back the same `Arc`, so two lookups of the same entity are
/// reference-identical.
///
/// # Example
///
/// ```
/// use spotrs::{Cache, CacheSettings, Track};
/// use std::sync::Arc;
///
/// let cache = Cache::new(CacheSettings::all());
/// let first: Track = serde_json::from_value(serde_json::json!({"id": "t1", "name": "One"})).unwrap();
/// let second: Track = serde_json::from_value(serde_json::json!({"id": "t1", "name": "Uno"})).unwrap();
///
/// let a = cache.create(first);
/// let b = cache.create(second);
/// assert!(Arc::ptr_eq(&a, &b));
/// assert_eq!(b.name, "One");
/// ```
pub struct Cache {
    settings: CacheSettings,
    pub(crate) users: CacheStore<User>,
    pub(crate) artists: CacheStore<Artist>,
    pub(crate) tracks: CacheStore<Track>,
    pub(crate) albums: CacheStore<Album>,
    pub(crate) playlists: CacheStore<Playlist>,
    pub(crate) shows: CacheStore<Show>,
    pub(crate) episodes: CacheStore<Episode>,
    pub(crate) categories: CacheStore<Category>,
}

impl Default for Cache {
    fn default() -> Self {
        Self::new(CacheSettings::default())
    }
}

impl Cache {
    pub fn new(settings: CacheSettings) -> Self {
        Self {
            settings,
            users: CacheStore::new(settings.users),
            artists: CacheStore::new(settings.artists),
            tracks: CacheStore::new(settings.tracks),
            albums: CacheStore::new(settings.albums),
            playlists: CacheStore::new(settings.playlists),
            shows: CacheStore::new(settings.shows),
            episodes: CacheStore::new(settings.episodes),
            categories: CacheStore::new(settings.categories),
        }
    }

    pub fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// The store for entities of type `T`.
    pub fn store<T: Cached>(&self) -> &CacheStore<T> {
        T::store(self)
    }

    /// Return the cached entity with the item's id, or cache and return the
    /// item itself.
    ///
    /// Items with an empty id, or of a type whose caching is disabled, are
    /// wrapped without being stored.
    pub fn create<T: Cached>(&self, item: T) -> Arc<T> {
        T::store(self).create(item)
    }

    /// Cache the item, replacing any entry with the same id.
    pub fn insert<T: Cached>(&self, item: T) -> Arc<T> {
        T::store(self).insert(item)
    }

    pub fn get<T: Cached>(&self, id: &str) -> Option<Arc<T>> {
        T::store(self).get(id)
    }

    /// Drop every cached entity.
    pub fn clear(&self) {
        self.users.clear();
        self.artists.clear();
        self.tracks.clear();
        self.albums.clear();
        self.playlists.clear();
        self.shows.clear();
        self.episodes.clear();
        self.categories.clear();
    }
}

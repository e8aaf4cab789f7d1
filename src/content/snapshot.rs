//! Content snapshots and the remote feed fallback chain
//!
//! Remote store (one attempt) -> last cached snapshot -> built-in defaults.
//! Failures surface as a banner string, never as a blocking error.

use std::cell::RefCell;
use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::SiteContent;
use crate::error::ContentError;

/// Cache key for the edited page content
pub const CONTENT_KEY: &str = "stackfolio_content";
/// Cache key for the last good project feed
pub const PROJECT_FEED_KEY: &str = "stackfolio_projects";
/// Cache key for the last good video feed
pub const VIDEO_FEED_KEY: &str = "stackfolio_videos";

/// Shown when the page renders cached or built-in data
pub const OFFLINE_BANNER: &str = "Could not reach the content store. Showing locally saved data.";

/// String key/value store for snapshots (LocalStorage in the browser)
pub trait SnapshotCache {
    fn get(&self, key: &str) -> Result<Option<String>, ContentError>;
    fn set(&self, key: &str, value: &str) -> Result<(), ContentError>;
    fn remove(&self, key: &str) -> Result<(), ContentError>;
}

/// In-memory cache for native runs and tests
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RefCell<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl SnapshotCache for MemoryCache {
    fn get(&self, key: &str) -> Result<Option<String>, ContentError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), ContentError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), ContentError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

/// A remote collection, fetched once per page load
pub trait ItemSource<T> {
    fn fetch(&self) -> Result<Vec<T>, ContentError>;
}

/// Where a feed's items came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedSource {
    Remote,
    Cache,
    /// Nothing available; callers show their built-in list
    Defaults,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedOutcome<T> {
    pub items: Vec<T>,
    pub source: FeedSource,
    /// Non-blocking notice for the viewer
    pub banner: Option<String>,
}

fn read_cached<T: DeserializeOwned>(cache: &dyn SnapshotCache, key: &str) -> Option<T> {
    let json = match cache.get(key) {
        Ok(Some(json)) => json,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Snapshot cache read failed for {}: {}", key, e);
            return None;
        }
    };
    match serde_json::from_str(&json) {
        Ok(value) => Some(value),
        Err(e) => {
            log::warn!("Discarding malformed snapshot {}: {}", key, e);
            let _ = cache.remove(key);
            None
        }
    }
}

/// Fetch a feed, refreshing the cache on success and falling back on failure
pub fn load_feed<T>(source: &dyn ItemSource<T>, cache: &dyn SnapshotCache, key: &str) -> FeedOutcome<T>
where
    T: Serialize + DeserializeOwned,
{
    match source.fetch() {
        Ok(items) => {
            match serde_json::to_string(&items) {
                Ok(json) => {
                    if let Err(e) = cache.set(key, &json) {
                        log::warn!("Could not cache feed {}: {}", key, e);
                    }
                }
                Err(e) => log::warn!("Could not encode feed {}: {}", key, e),
            }
            log::info!("Loaded {} items for {} from the content store", items.len(), key);
            FeedOutcome {
                items,
                source: FeedSource::Remote,
                banner: None,
            }
        }
        Err(e) => {
            log::warn!("Feed {} unavailable: {}", key, e);
            match read_cached::<Vec<T>>(cache, key) {
                Some(items) => FeedOutcome {
                    items,
                    source: FeedSource::Cache,
                    banner: Some(OFFLINE_BANNER.to_string()),
                },
                None => FeedOutcome {
                    items: Vec::new(),
                    source: FeedSource::Defaults,
                    banner: Some(OFFLINE_BANNER.to_string()),
                },
            }
        }
    }
}

/// Saved page content, or the defaults when nothing usable is cached
pub fn load_content(cache: &dyn SnapshotCache) -> SiteContent {
    match read_cached::<SiteContent>(cache, CONTENT_KEY) {
        Some(content) => {
            log::info!("Loaded saved content");
            content
        }
        None => SiteContent::default(),
    }
}

/// Persist edited content; returns the encoded size in bytes
pub fn save_content(cache: &dyn SnapshotCache, content: &SiteContent) -> Result<usize, ContentError> {
    let json = content.to_json()?;
    cache.set(CONTENT_KEY, &json)?;
    log::info!("Content saved ({} bytes)", json.len());
    Ok(json.len())
}

/// Forget edited content, back to the defaults on next load
pub fn reset_content(cache: &dyn SnapshotCache) -> Result<(), ContentError> {
    cache.remove(CONTENT_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ProjectRecord;

    struct Remote(Result<Vec<ProjectRecord>, String>);

    impl ItemSource<ProjectRecord> for Remote {
        fn fetch(&self) -> Result<Vec<ProjectRecord>, ContentError> {
            self.0.clone().map_err(ContentError::unreachable)
        }
    }

    fn record(id: &str) -> ProjectRecord {
        ProjectRecord {
            id: id.into(),
            title: id.into(),
            description: String::new(),
            url: String::new(),
            image_url: None,
            tags: Vec::new(),
            created_at: 1.0,
            published: true,
        }
    }

    #[test]
    fn test_remote_success_refreshes_cache() {
        let cache = MemoryCache::new();
        let outcome = load_feed(&Remote(Ok(vec![record("a")])), &cache, PROJECT_FEED_KEY);
        assert_eq!(outcome.source, FeedSource::Remote);
        assert!(outcome.banner.is_none());
        assert!(cache.get(PROJECT_FEED_KEY).expect("readable").is_some());
    }

    #[test]
    fn test_failure_uses_cache_then_defaults() {
        let cache = MemoryCache::new();
        let down = Remote(Err("timeout".into()));

        let outcome = load_feed(&down, &cache, PROJECT_FEED_KEY);
        assert_eq!(outcome.source, FeedSource::Defaults);
        assert!(outcome.items.is_empty());
        assert_eq!(outcome.banner.as_deref(), Some(OFFLINE_BANNER));

        load_feed(&Remote(Ok(vec![record("a"), record("b")])), &cache, PROJECT_FEED_KEY);
        let outcome = load_feed(&down, &cache, PROJECT_FEED_KEY);
        assert_eq!(outcome.source, FeedSource::Cache);
        assert_eq!(outcome.items.len(), 2);
        assert!(outcome.banner.is_some());
    }

    #[test]
    fn test_malformed_feed_cache_is_discarded() {
        let cache = MemoryCache::new();
        cache.set(PROJECT_FEED_KEY, "{not json").expect("writable");
        let outcome = load_feed(&Remote(Err("offline".into())), &cache, PROJECT_FEED_KEY);
        assert_eq!(outcome.source, FeedSource::Defaults);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_content_round_trip_and_reset() {
        let cache = MemoryCache::new();
        assert_eq!(load_content(&cache), SiteContent::default());

        let mut edited = SiteContent::default();
        edited.footer.message = "thanks".into();
        let size = save_content(&cache, &edited).expect("saved");
        assert!(size > 0);
        assert_eq!(load_content(&cache).footer.message, "thanks");

        reset_content(&cache).expect("removed");
        assert_eq!(load_content(&cache), SiteContent::default());
    }

    #[test]
    fn test_malformed_content_falls_back_to_defaults() {
        let cache = MemoryCache::new();
        cache.set(CONTENT_KEY, "[1, 2").expect("writable");
        assert_eq!(load_content(&cache), SiteContent::default());
        assert_eq!(cache.get(CONTENT_KEY).expect("readable"), None);
    }
}

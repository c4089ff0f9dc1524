use std::collections::HashMap;

use serde_json::Value;

pub const LIST_RESOURCE: &str = "/api/resumes";
pub const DETAIL_RESOURCE: &str = "/api/resumes/:id";

/// Identifies one cached query: the route path plus the resume id for
/// single-resource reads.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    pub resource: &'static str,
    pub id: Option<i32>,
}

impl QueryKey {
    pub fn list() -> Self {
        Self {
            resource: LIST_RESOURCE,
            id: None,
        }
    }

    pub fn detail(id: i32) -> Self {
        Self {
            resource: DETAIL_RESOURCE,
            id: Some(id),
        }
    }
}

/// A cached query result. `data` is `None` when the server answered with
/// "nothing to show" (logged out, or no such resume).
#[derive(Debug, Clone, PartialEq)]
pub struct CachedQuery {
    pub data: Option<Value>,
    pub stale: bool,
}

/// Client-side query cache. Owned by the caller and passed into every
/// `ResumeClient` call; nothing here is global.
#[derive(Debug, Default)]
pub struct QueryCache {
    entries: HashMap<QueryKey, CachedQuery>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &QueryKey) -> Option<&CachedQuery> {
        self.entries.get(key)
    }

    /// Returns the entry only if it can be served without refetching.
    pub fn fresh(&self, key: &QueryKey) -> Option<&CachedQuery> {
        self.entries.get(key).filter(|entry| !entry.stale)
    }

    pub fn store(&mut self, key: QueryKey, data: Option<Value>) {
        self.entries.insert(key, CachedQuery { data, stale: false });
    }

    /// Marks an entry stale. The last known data stays readable until the
    /// next fetch replaces it.
    pub fn invalidate(&mut self, key: &QueryKey) {
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
    }

    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |entry| entry.stale)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_keys_distinguish_list_and_detail() {
        assert_ne!(QueryKey::list(), QueryKey::detail(1));
        assert_ne!(QueryKey::detail(1), QueryKey::detail(2));
        assert_eq!(QueryKey::detail(3), QueryKey::detail(3));
    }

    #[test]
    fn test_missing_entry_counts_as_stale() {
        let cache = QueryCache::new();
        assert!(cache.is_stale(&QueryKey::list()));
        assert!(cache.fresh(&QueryKey::list()).is_none());
    }

    #[test]
    fn test_invalidate_keeps_last_data() {
        let mut cache = QueryCache::new();
        cache.store(QueryKey::list(), Some(json!([])));
        cache.invalidate(&QueryKey::list());

        assert!(cache.is_stale(&QueryKey::list()));
        assert!(cache.fresh(&QueryKey::list()).is_none());
        assert_eq!(cache.get(&QueryKey::list()).unwrap().data, Some(json!([])));
    }

    #[test]
    fn test_invalidate_only_touches_its_key() {
        let mut cache = QueryCache::new();
        cache.store(QueryKey::list(), Some(json!([])));
        cache.store(QueryKey::detail(1), Some(json!({ "id": 1 })));
        cache.invalidate(&QueryKey::detail(1));

        assert!(!cache.is_stale(&QueryKey::list()));
        assert!(cache.is_stale(&QueryKey::detail(1)));
    }

    #[test]
    fn test_no_data_entry_is_still_fresh() {
        let mut cache = QueryCache::new();
        cache.store(QueryKey::list(), None);
        let entry = cache.fresh(&QueryKey::list()).unwrap();
        assert!(entry.data.is_none());
        assert_eq!(cache.len(), 1);
    }
}

//! Thread-safe wrapper around [`Lru`], lazily constructed on first use.
//!
//! A [`Group`](crate::Group) holds one `Cache` for its local entries. The
//! inner [`Lru`] is built on the first call that needs it rather than at
//! `Cache::new` time, so constructing a `Group` never allocates the cache's
//! backing storage until it is actually populated.

use parking_lot::Mutex;

use crate::byte_view::ByteView;
use crate::lru::Lru;

/// A lazily initialized, mutex-guarded [`Lru`].
pub(crate) struct Cache {
    cache_bytes: u64,
    inner: Mutex<Option<Lru>>,
}

impl Cache {
    /// Builds a cache with the given byte budget (`0` = unbounded). No
    /// allocation happens until the first `get` or `add`.
    pub(crate) fn new(cache_bytes: u64) -> Self {
        Cache {
            cache_bytes,
            inner: Mutex::new(None),
        }
    }

    /// Looks up `key`, returning `None` on a miss or if the cache has never
    /// been populated.
    pub(crate) fn get(&self, key: &str) -> Option<ByteView> {
        let mut guard = self.inner.lock();
        guard.as_mut()?.get(key)
    }

    /// Inserts `key`, building the backing [`Lru`] on first use.
    pub(crate) fn add(&self, key: String, value: ByteView) {
        let mut guard = self.inner.lock();
        guard
            .get_or_insert_with(|| Lru::new(self.cache_bytes))
            .put(key, value);
    }

    /// Removes `key` if present.
    pub(crate) fn remove(&self, key: &str) {
        if let Some(lru) = self.inner.lock().as_mut() {
            lru.remove(key);
        }
    }

    /// The number of resident entries, or `0` if never populated.
    pub(crate) fn len(&self) -> usize {
        self.inner.lock().as_ref().map_or(0, Lru::len)
    }

    /// The current byte usage, or `0` if never populated.
    pub(crate) fn used_bytes(&self) -> u64 {
        self.inner.lock().as_ref().map_or(0, Lru::used_bytes)
    }
}

impl std::fmt::Debug for Cache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cache")
            .field("cache_bytes", &self.cache_bytes)
            .field("len", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_on_an_unpopulated_cache_does_not_allocate_the_lru() {
        let cache = Cache::new(1024);
        assert_eq!(cache.get("missing"), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn add_then_get_round_trips() {
        let cache = Cache::new(1024);
        cache.add("a".to_string(), ByteView::from("1"));
        assert_eq!(cache.get("a"), Some(ByteView::from("1")));
    }

    #[test]
    fn remove_evicts_the_entry() {
        let cache = Cache::new(1024);
        cache.add("a".to_string(), ByteView::from("1"));
        cache.remove("a");
        assert_eq!(cache.get("a"), None);
    }

    #[test]
    fn remove_on_an_unpopulated_cache_is_a_no_op() {
        let cache = Cache::new(1024);
        cache.remove("anything");
        assert_eq!(cache.len(), 0);
    }
}

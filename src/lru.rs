//! Least-recently-used cache used as a [`Group`](crate::Group)'s local store.
//!
//! Entries are indexed by key in a `HashMap` and ordered by recency in an
//! intrusive doubly-linked [`List`](crate::list::List); both operations are
//! O(1). Eviction is driven by a byte budget rather than an entry count: a
//! resident entry "costs" `key.len() + value.len()` bytes, and `put` evicts
//! from the back of the list until the budget is satisfied again.

use std::collections::HashMap;

use crate::byte_view::ByteView;
use crate::list::{Entry, List};

struct Node {
    key: String,
    value: ByteView,
}

fn entry_cost(key: &str, value: &ByteView) -> u64 {
    (key.len() + value.len()) as u64
}

/// A byte-budgeted LRU cache from `String` keys to [`ByteView`] values.
///
/// `max_bytes == 0` means unbounded: entries are never evicted on account of
/// size, only ever explicitly removed or cleared. Otherwise `put` guarantees
/// `used_bytes() <= max_bytes()` once it returns, evicting least-recently-used
/// entries first.
pub(crate) struct Lru {
    max_bytes: u64,
    used_bytes: u64,
    index: HashMap<String, *mut Entry<Node>>,
    order: List<Node>,
    on_evicted: Option<Box<dyn FnMut(&str, &ByteView) + Send>>,
}

impl Lru {
    /// Builds an empty cache with the given byte budget (`0` = unbounded).
    pub(crate) fn new(max_bytes: u64) -> Self {
        Lru {
            max_bytes,
            used_bytes: 0,
            index: HashMap::new(),
            order: List::new(),
            on_evicted: None,
        }
    }

    /// Installs a callback invoked once per entry evicted by `put`, with the
    /// evicted key and value. Not called for `remove` or `clear`.
    pub(crate) fn set_on_evicted<F>(&mut self, f: F)
    where
        F: FnMut(&str, &ByteView) + Send + 'static,
    {
        self.on_evicted = Some(Box::new(f));
    }

    /// The number of resident entries.
    pub(crate) fn len(&self) -> usize {
        self.index.len()
    }

    /// `true` if the cache holds no entries.
    pub(crate) fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// The configured byte budget (`0` means unbounded).
    pub(crate) fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    /// The sum of `key.len() + value.len()` over every resident entry.
    pub(crate) fn used_bytes(&self) -> u64 {
        self.used_bytes
    }

    /// Looks up `key`, promoting it to most-recently-used on a hit.
    pub(crate) fn get(&mut self, key: &str) -> Option<ByteView> {
        let node = *self.index.get(key)?;
        unsafe {
            // SAFETY: `node` came from `self.index` and is still linked into
            // `self.order`; it is not a sigil.
            self.order.move_to_front(node);
            Some((*node).get_value().value.clone())
        }
    }

    /// Looks up `key` without changing its recency.
    pub(crate) fn peek(&self, key: &str) -> Option<ByteView> {
        let node = *self.index.get(key)?;
        unsafe { Some((*node).get_value().value.clone()) }
    }

    /// Inserts or overwrites `key`, then evicts from the back until the cache
    /// is back within budget.
    pub(crate) fn put(&mut self, key: String, value: ByteView) {
        if let Some(&node) = self.index.get(&key) {
            unsafe {
                let old_cost = entry_cost(&key, &(*node).get_value().value);
                let new_cost = entry_cost(&key, &value);
                (*node).get_value_mut().value = value;
                self.used_bytes = self.used_bytes - old_cost + new_cost;
                self.order.move_to_front(node);
            }
        } else {
            let cost = entry_cost(&key, &value);
            let node = self.order.push_front(Node {
                key: key.clone(),
                value,
            });
            self.index.insert(key, node);
            self.used_bytes += cost;
        }
        self.evict_as_needed();
    }

    fn evict_as_needed(&mut self) {
        if self.max_bytes == 0 {
            return;
        }
        while self.used_bytes > self.max_bytes && !self.is_empty() {
            self.evict_oldest();
        }
    }

    fn evict_oldest(&mut self) {
        if let Some(node) = self.order.pop_back() {
            self.index.remove(&node.key);
            self.used_bytes -= entry_cost(&node.key, &node.value);
            if let Some(callback) = self.on_evicted.as_mut() {
                callback(&node.key, &node.value);
            }
        }
    }

    /// Removes `key`, returning its value if it was present. Does not invoke
    /// `on_evicted`.
    pub(crate) fn remove(&mut self, key: &str) -> Option<ByteView> {
        let node = self.index.remove(key)?;
        unsafe {
            // SAFETY: `node` was just removed from `self.index` and is still
            // linked into `self.order`.
            let removed = self.order.remove(node);
            self.used_bytes -= entry_cost(&removed.key, &removed.value);
            Some(removed.value)
        }
    }

    /// Drops every entry. Does not invoke `on_evicted`.
    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.order.clear();
        self.used_bytes = 0;
    }
}

impl std::fmt::Debug for Lru {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lru")
            .field("len", &self.len())
            .field("used_bytes", &self.used_bytes)
            .field("max_bytes", &self.max_bytes)
            .finish()
    }
}

// SAFETY: `Lru` owns every node reachable from `index`/`order`; no pointer
// escapes this module, and `on_evicted` is required to be `Send`.
unsafe impl Send for Lru {}

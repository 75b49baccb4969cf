//! Consistent-hash ring used to route a key to a peer.

use std::collections::HashMap;

use crate::config::RingConfig;

/// A byte-to-`u32` hash function.
pub type Hasher = fn(&[u8]) -> u32;

fn crc32_hasher(data: &[u8]) -> u32 {
    crc32fast::hash(data)
}

/// Maps keys onto a sorted ring of virtual nodes, each owned by a peer.
///
/// `replicas` virtual nodes are placed per added peer to smooth load across a
/// small cluster; `get` finds the first virtual node at or after a key's hash
/// and returns the peer that owns it, wrapping around the ring's end.
pub struct HashRing {
    hasher: Hasher,
    replicas: usize,
    ring: Vec<u32>,
    vnode_to_node: HashMap<u32, String>,
}

impl std::fmt::Debug for HashRing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HashRing")
            .field("replicas", &self.replicas)
            .field("vnodes", &self.ring.len())
            .finish()
    }
}

impl HashRing {
    /// Builds an empty ring with `replicas` virtual nodes per peer.
    ///
    /// # Panics
    /// Panics if `replicas == 0`; a ring with no virtual nodes per peer can
    /// never route to that peer, which is a configuration error.
    pub fn new(replicas: usize, hasher: Option<Hasher>) -> Self {
        assert!(replicas >= 1, "replicas must be at least 1");
        HashRing {
            hasher: hasher.unwrap_or(crc32_hasher),
            replicas,
            ring: Vec::new(),
            vnode_to_node: HashMap::new(),
        }
    }

    /// Builds an empty ring from a [`RingConfig`].
    ///
    /// Equivalent to `HashRing::new(cfg.replicas, cfg.hasher)`.
    ///
    /// # Panics
    /// Panics if `cfg.replicas == 0`, per [`HashRing::new`].
    pub fn from_config(cfg: RingConfig) -> Self {
        HashRing::new(cfg.replicas, cfg.hasher)
    }

    /// Returns `true` if no peer has been added yet.
    pub fn is_empty(&self) -> bool {
        self.ring.is_empty()
    }

    /// Adds peers to the ring, placing `replicas` virtual nodes for each.
    ///
    /// If two virtual nodes hash identically, the later write wins in the
    /// lookup table but both occurrences stay in the ring, giving that peer
    /// extra weight at that point.
    pub fn add<S: AsRef<str>>(&mut self, nodes: impl IntoIterator<Item = S>) {
        for node in nodes {
            let node = node.as_ref();
            for i in 0..self.replicas {
                let h = (self.hasher)(format!("{i}{node}").as_bytes());
                self.ring.push(h);
                self.vnode_to_node.insert(h, node.to_string());
            }
        }
        self.ring.sort_unstable();
    }

    /// Removes every virtual node owned by `node`.
    pub fn remove(&mut self, node: &str) {
        for i in 0..self.replicas {
            let h = (self.hasher)(format!("{i}{node}").as_bytes());
            if self.vnode_to_node.get(&h).map(String::as_str) == Some(node) {
                self.vnode_to_node.remove(&h);
            }
            self.ring.retain(|&v| v != h);
        }
    }

    /// Returns the peer responsible for `key`, or `None` if the ring is empty.
    pub fn get(&self, key: &str) -> Option<&str> {
        if self.ring.is_empty() {
            return None;
        }
        let h = (self.hasher)(key.as_bytes());
        let idx = match self.ring.binary_search(&h) {
            Ok(i) => i,
            Err(i) => i,
        };
        let idx = idx % self.ring.len();
        self.vnode_to_node.get(&self.ring[idx]).map(String::as_str)
    }
}

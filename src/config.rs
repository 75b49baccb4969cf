//! Configuration structures for groups and the consistent-hash ring.
//!
//! Both structs have all-public fields: construct them directly, no builder
//! boilerplate. This mirrors how the rest of the crate treats configuration —
//! a plain value, not a fluent API.

use crate::ring::Hasher;

/// Configuration for a [`Group`](crate::Group).
///
/// # Sizing `cache_bytes`
///
/// `cache_bytes` bounds the local LRU cache's resident size, counting
/// `key.len() + value.len()` per entry (see [`crate::lru`]). Set it to
/// `0` for an unbounded local cache, or to a concrete budget sized to the
/// fraction of process memory this group should be allowed to hold.
#[derive(Debug, Clone, Copy)]
pub struct GroupConfig {
    /// Byte budget for the group's local cache. `0` means unbounded.
    pub cache_bytes: u64,
    /// Whether a value fetched from a peer is also cached locally.
    ///
    /// Defaults to `false` in [`GroupConfig::default`]: a peer-owned key is
    /// resident in exactly one node's cache unless an embedder opts in to the
    /// redundancy of caching it locally too.
    pub cache_peer_results: bool,
}

impl Default for GroupConfig {
    fn default() -> Self {
        GroupConfig {
            cache_bytes: 8 * 1024 * 1024,
            cache_peer_results: false,
        }
    }
}

/// Configuration for a [`HashRing`](crate::HashRing).
#[derive(Debug, Clone, Copy, Default)]
pub struct RingConfig {
    /// Virtual nodes placed per added peer. Larger values smooth load across
    /// a small cluster at the cost of more setup work and memory; `0` is a
    /// configuration error (see [`HashRing::new`](crate::HashRing::new)).
    pub replicas: usize,
    /// Overrides the ring's hash function. `None` uses CRC32/IEEE via the
    /// `crc32fast` crate.
    pub hasher: Option<Hasher>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn group_config_default_is_bounded_and_conservative() {
        let config = GroupConfig::default();
        assert!(config.cache_bytes > 0);
        assert!(!config.cache_peer_results);
    }

    #[test]
    fn ring_config_default_has_no_hasher_override() {
        let config = RingConfig::default();
        assert_eq!(config.replicas, 0);
        assert!(config.hasher.is_none());
    }
}

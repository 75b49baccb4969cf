//! Counters tracking a [`Group`](crate::Group)'s cache behavior.

use std::sync::atomic::{AtomicU64, Ordering};

/// Atomic counters for a single group, readable without blocking any caller.
///
/// Every field is incremented with [`Ordering::Relaxed`]: these are
/// observability counters, not synchronization points, so no ordering
/// relationship with other memory accesses is implied or required.
#[derive(Debug, Default)]
pub struct GroupMetrics {
    hits: AtomicU64,
    misses: AtomicU64,
    local_loads: AtomicU64,
    peer_loads: AtomicU64,
    getter_errors: AtomicU64,
    peer_errors: AtomicU64,
}

impl GroupMetrics {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_local_load(&self) {
        self.local_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_peer_load(&self) {
        self.peer_loads.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_getter_error(&self) {
        self.getter_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_peer_error(&self) {
        self.peer_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Cache hits: the key was already resident locally.
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Cache misses: the key had to be loaded, locally or from a peer.
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Misses resolved by the local getter.
    pub fn local_loads(&self) -> u64 {
        self.local_loads.load(Ordering::Relaxed)
    }

    /// Misses resolved by a peer fetch.
    pub fn peer_loads(&self) -> u64 {
        self.peer_loads.load(Ordering::Relaxed)
    }

    /// Local getter invocations that returned an error.
    pub fn getter_errors(&self) -> u64 {
        self.getter_errors.load(Ordering::Relaxed)
    }

    /// Peer fetches that returned an error.
    pub fn peer_errors(&self) -> u64 {
        self.peer_errors.load(Ordering::Relaxed)
    }
}

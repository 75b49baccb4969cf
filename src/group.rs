//! The group orchestrator: composes the local cache, singleflight loader,
//! and peer routing into one miss-resolution pipeline.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, trace, warn};

use crate::byte_view::ByteView;
use crate::cache::Cache;
use crate::config::GroupConfig;
use crate::error::{Error, Result};
use crate::metrics::GroupMetrics;
use crate::peer::{PeerGetter, PeerPicker, PeerRequest};
use crate::singleflight::SingleFlight;

/// A group's data source: loads the bytes for a key on a cache miss.
///
/// `get` is expected to behave as a pure function of `key` from the caller's
/// perspective — the group may call it concurrently for distinct keys, and
/// relies on singleflight to prevent concurrent calls for the *same* key.
pub trait Getter: Send + Sync {
    /// Loads the value for `key`, or fails.
    fn get(&self, key: &str) -> Result<Vec<u8>>;
}

/// Adapts a plain closure to [`Getter`].
pub struct GetterFn<F>(
    /// The wrapped closure.
    pub F,
);

impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> Result<Vec<u8>> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for GetterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GetterFn").finish_non_exhaustive()
    }
}

/// A named cache namespace fronting one [`Getter`].
///
/// Reads are served from a local, byte-budgeted LRU cache; on a miss, a
/// singleflight loader collapses concurrent misses for the same key into one
/// resolution, which consults a peer (if one is registered and selected for
/// the key) before falling back to the local `Getter`.
pub struct Group {
    name: String,
    getter: Arc<dyn Getter>,
    main_cache: Cache,
    peers: RwLock<Option<Arc<dyn PeerPicker>>>,
    loader: SingleFlight<ByteView>,
    cache_peer_results: bool,
    metrics: GroupMetrics,
}

impl fmt::Debug for Group {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Group").field("name", &self.name).finish()
    }
}

impl Group {
    /// Builds a group that is never registered in the process-wide registry.
    ///
    /// Intended for tests that need an isolated group without touching
    /// global state, and for embedders who want to manage group lifetime
    /// themselves rather than going through [`crate::new_group`].
    pub fn new_detached(name: impl Into<String>, config: GroupConfig, getter: Arc<dyn Getter>) -> Arc<Group> {
        Arc::new(Group {
            name: name.into(),
            getter,
            main_cache: Cache::new(config.cache_bytes),
            peers: RwLock::new(None),
            loader: SingleFlight::new(),
            cache_peer_results: config.cache_peer_results,
            metrics: GroupMetrics::default(),
        })
    }

    /// The group's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// This group's accumulated cache counters.
    pub fn metrics(&self) -> &GroupMetrics {
        &self.metrics
    }

    /// Installs the peer picker used to route misses to other nodes.
    ///
    /// Only the first call takes effect; later calls are a no-op (logged at
    /// `warn`) so an already-serving picker can never be silently replaced.
    pub fn register_peers(&self, peers: Arc<dyn PeerPicker>) {
        let mut guard = self.peers.write();
        if guard.is_some() {
            warn!(group = %self.name, "register_peers called again; keeping the existing picker");
            return;
        }
        *guard = Some(peers);
    }

    /// Looks up `key`, loading it on a miss.
    ///
    /// Fails with [`Error::EmptyKey`] for an empty key without touching the
    /// cache or the loader.
    pub fn get(&self, key: &str) -> Result<ByteView> {
        if key.is_empty() {
            return Err(Error::EmptyKey);
        }

        if let Some(value) = self.main_cache.get(key) {
            trace!(group = %self.name, key, "cache hit");
            self.metrics.record_hit();
            return Ok(value);
        }

        debug!(group = %self.name, key, "cache miss, loading");
        self.metrics.record_miss();
        self.loader.do_call(key, || self.load(key))
    }

    fn load(&self, key: &str) -> Result<ByteView> {
        if let Some(peer) = self.peers.read().as_ref().and_then(|picker| picker.pick_peer(key)) {
            match self.get_from_peer(&peer, key) {
                Ok(value) => {
                    self.metrics.record_peer_load();
                    if self.cache_peer_results {
                        self.main_cache.add(key.to_string(), value.clone());
                    }
                    return Ok(value);
                }
                Err(e) => {
                    warn!(group = %self.name, key, error = %e, "peer fetch failed, falling back to local load");
                    self.metrics.record_peer_error();
                }
            }
        }
        self.get_locally(key)
    }

    fn get_from_peer(&self, peer: &Arc<dyn PeerGetter>, key: &str) -> Result<ByteView> {
        let request = PeerRequest {
            group: self.name.clone(),
            key: key.to_string(),
        };
        let response = peer.get(&request)?;
        Ok(ByteView::from_vec(response.value))
    }

    fn get_locally(&self, key: &str) -> Result<ByteView> {
        let bytes = match self.getter.get(key) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.metrics.record_getter_error();
                return Err(e);
            }
        };
        let value = ByteView::from_vec(bytes);
        self.main_cache.add(key.to_string(), value.clone());
        self.metrics.record_local_load();
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::thread;

    fn getter<F>(f: F) -> Arc<dyn Getter>
    where
        F: Fn(&str) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Arc::new(GetterFn(f))
    }

    #[test]
    fn empty_key_fails_before_touching_the_loader() {
        let group = Group::new_detached("g1", GroupConfig::default(), getter(|_| Ok(b"x".to_vec())));
        assert!(matches!(group.get(""), Err(Error::EmptyKey)));
    }

    #[test]
    fn a_miss_loads_once_and_a_hit_does_not_call_the_getter_again() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = Arc::clone(&calls);
        let group = Group::new_detached(
            "g2",
            GroupConfig::default(),
            getter(move |key| {
                calls2.fetch_add(1, Ordering::SeqCst);
                Ok(format!("value_of_{key}").into_bytes())
            }),
        );

        let first = group.get("hello").unwrap();
        assert_eq!(first.to_vec(), b"value_of_hello");

        let second = group.get("hello").unwrap();
        assert_eq!(second.to_vec(), b"value_of_hello");

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(group.metrics().hits(), 1);
        assert_eq!(group.metrics().misses(), 1);
        assert_eq!(group.metrics().local_loads(), 1);
    }

    struct AlwaysFailingPeer;

    impl PeerGetter for AlwaysFailingPeer {
        fn get(&self, request: &PeerRequest) -> Result<crate::peer::PeerResponse> {
            Err(Error::peer_failed(request.key.clone(), std::io::Error::other("unreachable")))
        }
    }

    struct AlwaysPickPeer(Arc<dyn PeerGetter>);

    impl PeerPicker for AlwaysPickPeer {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
            Some(Arc::clone(&self.0))
        }
    }

    #[test]
    fn a_failing_peer_falls_back_to_the_local_getter() {
        let group = Group::new_detached(
            "g3",
            GroupConfig::default(),
            getter(|key| Ok(format!("local_{key}").into_bytes())),
        );
        group.register_peers(Arc::new(AlwaysPickPeer(Arc::new(AlwaysFailingPeer))));

        let value = group.get("k").unwrap();
        assert_eq!(value.to_vec(), b"local_k");
        assert_eq!(group.metrics().peer_errors(), 1);
        assert_eq!(group.metrics().local_loads(), 1);
    }

    struct EchoPeer;

    impl PeerGetter for EchoPeer {
        fn get(&self, request: &PeerRequest) -> Result<crate::peer::PeerResponse> {
            Ok(crate::peer::PeerResponse {
                value: format!("peer_{}", request.key).into_bytes(),
            })
        }
    }

    #[test]
    fn a_successful_peer_fetch_is_not_cached_locally_by_default() {
        let group = Group::new_detached(
            "g4",
            GroupConfig::default(),
            getter(|_| panic!("local getter should not run when a peer answers")),
        );
        group.register_peers(Arc::new(AlwaysPickPeer(Arc::new(EchoPeer))));

        let value = group.get("k").unwrap();
        assert_eq!(value.to_vec(), b"peer_k");
        assert_eq!(group.metrics().peer_loads(), 1);
        // cache_peer_results defaults to false: nothing should be resident.
        assert_eq!(group.main_cache.len(), 0);
    }

    #[test]
    fn cache_peer_results_opts_into_local_caching_of_peer_responses() {
        let config = GroupConfig {
            cache_bytes: 1024,
            cache_peer_results: true,
        };
        let group = Group::new_detached("g5", config, getter(|_| panic!("unused")));
        group.register_peers(Arc::new(AlwaysPickPeer(Arc::new(EchoPeer))));

        group.get("k").unwrap();
        assert_eq!(group.main_cache.len(), 1);
    }

    #[test]
    fn register_peers_ignores_a_second_call() {
        let group = Group::new_detached("g6", GroupConfig::default(), getter(|_| Ok(b"x".to_vec())));
        group.register_peers(Arc::new(AlwaysPickPeer(Arc::new(EchoPeer))));
        group.register_peers(Arc::new(AlwaysPickPeer(Arc::new(AlwaysFailingPeer))));

        // Still wired to the first (echoing) picker.
        let value = group.get("k").unwrap();
        assert_eq!(value.to_vec(), b"peer_k");
    }

    #[test]
    fn concurrent_misses_for_the_same_key_invoke_the_getter_once() {
        let calls = Arc::new(AtomicU32::new(0));
        let calls2 = Arc::clone(&calls);
        let group = Arc::new(Group::new_detached(
            "g7",
            GroupConfig::default(),
            getter(move |key| {
                calls2.fetch_add(1, Ordering::SeqCst);
                thread::sleep(std::time::Duration::from_millis(30));
                Ok(format!("value_of_{key}").into_bytes())
            }),
        ));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let group = Arc::clone(&group);
                thread::spawn(move || group.get("shared-key").unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap().to_vec(), b"value_of_shared-key");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

#![doc = include_str!("../README.md")]

mod byte_view;
mod cache;

/// Configuration structures for groups and the consistent-hash ring.
pub mod config;

/// The crate's error type and result alias.
pub mod error;

/// The group orchestrator tying the cache, loader, and peer routing together.
pub mod group;

/// Intrusive recency list backing [`lru::Lru`].
mod list;

/// The byte-budgeted LRU cache used as a group's local store.
mod lru;

/// Per-group cache counters.
pub mod metrics;

/// Peer selection and remote-fetch traits.
pub mod peer;

/// The process-wide named-group registry.
pub mod registry;

/// Consistent-hash ring used to route keys to peers.
pub mod ring;

/// Duplicate-call suppression for concurrent misses on the same key.
mod singleflight;

pub use byte_view::ByteView;
pub use config::{GroupConfig, RingConfig};
pub use error::{Error, Result};
pub use group::{Getter, GetterFn, Group};
pub use metrics::GroupMetrics;
pub use peer::{PeerGetter, PeerPicker, PeerRequest, PeerResponse};
pub use registry::{get_group, new_group, new_group_with_config};
pub use ring::HashRing;

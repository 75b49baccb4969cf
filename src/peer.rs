//! Peer routing and remote fetch abstractions.
//!
//! These traits let a [`Group`](crate::Group) ask "which peer, if any, owns
//! this key" and then fetch from that peer, without the crate committing to
//! any particular transport or wire encoding.

use crate::error::Result;

/// A request for a key within a named group, addressed to a peer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerRequest {
    /// The group the key belongs to.
    pub group: String,
    /// The key being fetched.
    pub key: String,
}

/// A peer's response to a [`PeerRequest`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerResponse {
    /// The raw value bytes returned by the peer.
    pub value: Vec<u8>,
}

/// Selects, for a given key, the peer (if any) responsible for owning it.
///
/// Implementations typically wrap a [`HashRing`](crate::HashRing) plus a
/// table mapping peer names to [`PeerGetter`] handles.
pub trait PeerPicker: Send + Sync {
    /// Returns the peer that should serve `key`, or `None` if `key` should be
    /// loaded locally (an empty ring, or the local node itself owns it).
    fn pick_peer(&self, key: &str) -> Option<std::sync::Arc<dyn PeerGetter>>;
}

/// Fetches a key's value from a single remote peer.
///
/// The transport and wire encoding are left to the implementation; this
/// crate only specifies the request/response shape.
pub trait PeerGetter: Send + Sync {
    /// Performs the remote fetch.
    fn get(&self, request: &PeerRequest) -> Result<PeerResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    struct EchoGetter;

    impl PeerGetter for EchoGetter {
        fn get(&self, request: &PeerRequest) -> Result<PeerResponse> {
            Ok(PeerResponse {
                value: format!("{}:{}", request.group, request.key).into_bytes(),
            })
        }
    }

    struct AlwaysPeer(Arc<dyn PeerGetter>);

    impl PeerPicker for AlwaysPeer {
        fn pick_peer(&self, _key: &str) -> Option<Arc<dyn PeerGetter>> {
            Some(Arc::clone(&self.0))
        }
    }

    #[test]
    fn picker_and_getter_compose() {
        let picker = AlwaysPeer(Arc::new(EchoGetter));
        let peer = picker.pick_peer("k").expect("peer selected");
        let response = peer
            .get(&PeerRequest {
                group: "g".to_string(),
                key: "k".to_string(),
            })
            .unwrap();
        assert_eq!(response.value, b"g:k");
    }
}

//! The crate's single error type.

use std::fmt;
use std::sync::Arc;

/// A boxed source error, used for variants that wrap a caller-supplied failure.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors produced by this crate.
///
/// Every fallible operation in the crate returns `Result<T, Error>`. See the
/// module-level documentation for the disposition of each variant (which are
/// surfaced to the caller versus recovered internally).
#[derive(Debug, thiserror::Error, Clone)]
pub enum Error {
    /// `Group::get` was called with an empty key.
    #[error("key must not be empty")]
    EmptyKey,

    /// `new_group` was called with no getter.
    #[error("group \"{name}\" was constructed without a getter")]
    NoGetter {
        /// The name the group would have been registered under.
        name: String,
    },

    /// `new_group` was called with a name that is already registered.
    #[error("group \"{name}\" is already registered")]
    GroupAlreadyRegistered {
        /// The name that was already present in the registry.
        name: String,
    },

    /// The user-supplied [`Getter`](crate::Getter) returned an error.
    #[error("getter for key {key:?} failed")]
    GetterFailed {
        /// The key that was being loaded.
        key: String,
        /// The underlying error returned by the getter.
        #[source]
        source: ArcError,
    },

    /// A peer's [`PeerGetter`](crate::PeerGetter) returned an error.
    #[error("peer fetch for key {key:?} failed")]
    PeerFailed {
        /// The key that was being fetched.
        key: String,
        /// The underlying transport error.
        #[source]
        source: ArcError,
    },

    /// A peer returned a response that could not be decoded.
    #[error("peer response for key {key:?} could not be decoded")]
    PeerDecodeFailed {
        /// The key that was being fetched.
        key: String,
        /// The underlying decode error.
        #[source]
        source: ArcError,
    },

    /// The local getter or a peer call panicked inside a singleflight leader.
    #[error("loader for key {key:?} panicked")]
    LoaderPanicked {
        /// The key whose load panicked.
        key: String,
    },
}

impl Error {
    /// Builds a [`Error::GetterFailed`] from any boxable error.
    pub fn getter_failed(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::GetterFailed {
            key: key.into(),
            source: ArcError(Arc::from(source.into())),
        }
    }

    /// Builds a [`Error::PeerFailed`] from any boxable error.
    pub fn peer_failed(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::PeerFailed {
            key: key.into(),
            source: ArcError(Arc::from(source.into())),
        }
    }

    /// Builds a [`Error::PeerDecodeFailed`] from any boxable error.
    pub fn peer_decode_failed(key: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Error::PeerDecodeFailed {
            key: key.into(),
            source: ArcError(Arc::from(source.into())),
        }
    }
}

/// A cloneable wrapper around a boxed error source.
///
/// Singleflight fans a single result out to every waiter, so the stored
/// [`Error`] must be `Clone`; a raw `Box<dyn Error>` is not. Wrapping it in an
/// `Arc` gives every waiter a cheap, shared handle to the same source error.
#[derive(Clone)]
pub struct ArcError(pub Arc<BoxError>);

impl fmt::Debug for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self.0, f)
    }
}

impl fmt::Display for ArcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&**self.0, f)
    }
}

impl std::error::Error for ArcError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        (**self.0).source()
    }
}

/// The crate's result alias.
pub type Result<T> = std::result::Result<T, Error>;

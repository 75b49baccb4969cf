//! Immutable byte-sequence values handed out by the cache.
//!
//! A [`ByteView`] is the unit of value storage for every [`Group`](crate::Group):
//! whatever the user's [`Getter`](crate::Getter) or a peer returns is copied once
//! into a `ByteView` and from then on is shared, read-only, between every caller
//! that observes the same cache entry.

use bytes::Bytes;
use core::fmt;

/// An immutable, cheaply-cloneable view over a byte sequence.
///
/// Cloning a `ByteView` bumps a refcount; it never copies the underlying bytes.
/// Reading the contents (via [`ByteView::to_vec`] or [`ByteView::as_slice`])
/// never exposes a handle the caller could use to mutate the stored buffer —
/// the only way to get an owned, mutable copy is to allocate a new `Vec<u8>`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ByteView {
    bytes: Bytes,
}

impl ByteView {
    /// Builds a `ByteView` by copying `data` into an owned buffer.
    ///
    /// This is the only constructor: callers cannot hand in a `Bytes` whose
    /// storage they still hold a mutable alias to, so the "stored buffer is
    /// never mutated after construction" invariant holds regardless of what
    /// the caller does with `data` afterwards.
    pub fn copy_from(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Wraps an owned `Vec<u8>` without copying.
    ///
    /// Since the `Vec` is moved in, there is no outstanding alias that could
    /// mutate it afterwards.
    pub fn from_vec(data: Vec<u8>) -> Self {
        Self {
            bytes: Bytes::from(data),
        }
    }

    /// Returns the number of bytes in the view. O(1).
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` if the view holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns a read-only slice over the contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns a defensive, owned copy of the contents.
    ///
    /// Mutating the returned `Vec` never affects this view or any other clone
    /// of it (P6): it is a fresh allocation, not a window into shared storage.
    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }

    /// Interprets the contents as UTF-8, copying into an owned `String`.
    ///
    /// Returns `None` if the bytes are not valid UTF-8.
    pub fn to_string_lossy(&self) -> Option<String> {
        core::str::from_utf8(&self.bytes).ok().map(str::to_owned)
    }
}

impl fmt::Debug for ByteView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteView").field("len", &self.len()).finish()
    }
}

impl From<Vec<u8>> for ByteView {
    fn from(data: Vec<u8>) -> Self {
        Self::from_vec(data)
    }
}

impl From<&[u8]> for ByteView {
    fn from(data: &[u8]) -> Self {
        Self::copy_from(data)
    }
}

impl From<String> for ByteView {
    fn from(data: String) -> Self {
        Self::from_vec(data.into_bytes())
    }
}

impl From<&str> for ByteView {
    fn from(data: &str) -> Self {
        Self::copy_from(data.as_bytes())
    }
}

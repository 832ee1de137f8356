//! The public multiset built on the raw layout and the tree operations.

use std::fmt;

use crate::{
    ops::{Delete, Fmt, Insert, Match, Visit},
    raw::RawNode,
};

/// A compact radix tree (PATRICIA trie) that stores byte string keys as a
/// multiset.
///
/// Every key carries a reference count: repeated insertions are counted and
/// repeated removals decrement the count until the key disappears. Chains of
/// single-child structural nodes are merged away, so the tree stays compact
/// under any sequence of operations.
///
/// Keys are opaque byte strings of length at least one; the empty key is not
/// a legal key.
///
/// # Examples
///
/// ```
/// use radix_bag::RadixBag;
///
/// let mut bag = RadixBag::new();
/// assert!(bag.insert(b"test"));
/// assert!(bag.insert(b"testing"));
/// assert!(!bag.insert(b"test"));
/// assert_eq!(bag.len(), 3);
/// assert_eq!(bag.count(b"test"), 2);
///
/// assert!(bag.remove(b"test"));
/// assert!(bag.remove(b"test"));
/// assert!(!bag.contains(b"test"));
/// assert!(bag.contains(b"testing"));
/// ```
pub struct RadixBag {
    root: RawNode,
    size: usize,
}

impl RadixBag {
    /// Creates an empty bag.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: RawNode::alloc(0, 0, 0),
            size: 0,
        }
    }

    /// Inserts one occurrence of the key. Returns true if the key was not
    /// present before.
    pub fn insert(&mut self, key: &[u8]) -> bool {
        debug_assert!(!key.is_empty(), "keys hold at least one byte");
        let outcome = unsafe { Insert::apply(self.root, key) };
        self.root = outcome.root;
        self.size += 1;
        outcome.was_absent
    }

    /// Removes one occurrence of the key. Returns true if the key was
    /// present.
    pub fn remove(&mut self, key: &[u8]) -> bool {
        debug_assert!(!key.is_empty(), "keys hold at least one byte");
        let outcome = unsafe { Delete::apply(self.root, key) };
        self.root = outcome.root;
        if outcome.removed {
            self.size -= 1;
        }
        outcome.removed
    }

    /// Returns true if at least one occurrence of the key is present.
    #[must_use]
    pub fn contains(&self, key: &[u8]) -> bool {
        self.count(key) > 0
    }

    /// Returns the number of occurrences of the key.
    #[must_use]
    pub fn count(&self, key: &[u8]) -> u32 {
        debug_assert!(!key.is_empty(), "keys hold at least one byte");
        let matched = unsafe { Match::against(self.root, key) };
        let prefix_len = unsafe { matched.current.prefix_len() } as usize;
        if matched.nkey == key.len() && matched.nprefix == prefix_len {
            unsafe { matched.current.refcount() }
        } else {
            0
        }
    }

    /// Total number of occurrences across all keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.size
    }

    /// Returns true if the bag holds no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Calls the visitor once for each distinct present key with the key's
    /// bytes and its occurrence count. The order of keys is unspecified.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&[u8], u32),
    {
        unsafe { Visit::keys(self.root, &mut visitor) };
    }

    /// Total number of bytes allocated for the tree's nodes.
    #[must_use]
    pub fn heap_bytes(&self) -> usize {
        unsafe { Visit::allocated_bytes(self.root) }
    }

    /// Writes a human-readable dump of the tree shape to standard output.
    pub fn print(&self) {
        print!("{self}");
    }
}

impl Default for RadixBag {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for RadixBag {
    fn drop(&mut self) {
        unsafe { Visit::reclaim(self.root) };
    }
}

impl fmt::Display for RadixBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        unsafe { Fmt::pretty(self.root, f) }
    }
}

impl fmt::Debug for RadixBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

//! Memory layout of tree nodes.
//!
//! Every node is a single contiguous allocation. A fixed header of three
//! little 32-bit integers comes first: the reference count of the key held
//! by the node (zero for purely structural nodes), the length of the node's
//! compressed prefix, and the number of outgoing edges. Three variable
//! sections follow: the prefix bytes, the first byte of each child's prefix,
//! and the child references, with the latter two in one-to-one index
//! correspondence. Descending an edge is a linear scan over the first-byte
//! section followed by an indexed read from the child section.
//!
//! Nothing in the region is naturally aligned past the first byte, so every
//! multi-byte field is accessed with unaligned loads and stores.

use std::{
    alloc::{self, Layout},
    fmt, mem,
    ptr::{self, NonNull},
    slice,
};

const REFCOUNT_OFFSET: usize = 0;
const PREFIX_LEN_OFFSET: usize = 4;
const EDGE_COUNT_OFFSET: usize = 8;

/// Byte width of the fixed header.
const HEADER_LEN: usize = 12;

/// Byte width of one stored child reference.
const CHILD_LEN: usize = mem::size_of::<*mut u8>();

/// A reference to a node's backing allocation.
///
/// The tree stores each of these exactly once: in the owning parent's child
/// section, or in the tree's root field. An operation that resizes a node
/// receives a new `RawNode` and must write it back into that single slot.
#[derive(Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
pub struct RawNode(NonNull<u8>);

impl fmt::Debug for RawNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RawNode").field(&self.0).finish()
    }
}

impl RawNode {
    fn layout(prefix_len: usize, edge_count: usize) -> Layout {
        let size = HEADER_LEN + prefix_len + edge_count * (1 + CHILD_LEN);
        Layout::from_size_align(size, 1).expect("node size fits a layout")
    }

    /// Allocates a node and initializes its header. The three variable
    /// sections are left uninitialized and must be written by the caller.
    pub fn alloc(refcount: u32, prefix_len: u32, edge_count: u32) -> Self {
        let layout = Self::layout(prefix_len as usize, edge_count as usize);
        let Some(data) = NonNull::new(unsafe { alloc::alloc(layout) }) else {
            alloc::handle_alloc_error(layout);
        };
        let node = Self(data);
        unsafe {
            node.write_u32(REFCOUNT_OFFSET, refcount);
            node.write_u32(PREFIX_LEN_OFFSET, prefix_len);
            node.write_u32(EDGE_COUNT_OFFSET, edge_count);
        }
        node
    }

    /// Reallocates the region for the new prefix length and edge count and
    /// updates the header. The leading `min(old, new)` prefix bytes survive;
    /// the first-byte and child sections must be re-laid by the caller. The
    /// region may move, so the returned reference replaces `self`.
    pub unsafe fn resize(self, prefix_len: u32, edge_count: u32) -> Self {
        let old_layout = unsafe {
            Self::layout(self.prefix_len() as usize, self.edge_count() as usize)
        };
        let new_layout = Self::layout(prefix_len as usize, edge_count as usize);
        let data = unsafe { alloc::realloc(self.0.as_ptr(), old_layout, new_layout.size()) };
        let Some(data) = NonNull::new(data) else {
            alloc::handle_alloc_error(new_layout);
        };
        let node = Self(data);
        unsafe {
            node.write_u32(PREFIX_LEN_OFFSET, prefix_len);
            node.write_u32(EDGE_COUNT_OFFSET, edge_count);
        }
        node
    }

    /// Releases the node's backing allocation.
    pub unsafe fn dealloc(self) {
        let layout = unsafe {
            Self::layout(self.prefix_len() as usize, self.edge_count() as usize)
        };
        unsafe { alloc::dealloc(self.0.as_ptr(), layout) };
    }

    /// Number of times the key spelled by the path to this node was inserted.
    pub unsafe fn refcount(self) -> u32 {
        unsafe { self.read_u32(REFCOUNT_OFFSET) }
    }

    pub unsafe fn set_refcount(self, refcount: u32) {
        unsafe { self.write_u32(REFCOUNT_OFFSET, refcount) };
    }

    pub unsafe fn prefix_len(self) -> u32 {
        unsafe { self.read_u32(PREFIX_LEN_OFFSET) }
    }

    pub unsafe fn edge_count(self) -> u32 {
        unsafe { self.read_u32(EDGE_COUNT_OFFSET) }
    }

    /// The node's compressed prefix. Empty only for the root.
    pub unsafe fn prefix<'a>(self) -> &'a [u8] {
        unsafe {
            slice::from_raw_parts(
                self.0.as_ptr().add(HEADER_LEN),
                self.prefix_len() as usize,
            )
        }
    }

    /// Overwrites prefix bytes starting at the given position.
    pub unsafe fn write_prefix(self, at: usize, bytes: &[u8]) {
        debug_assert!(at + bytes.len() <= unsafe { self.prefix_len() } as usize);
        unsafe {
            ptr::copy_nonoverlapping(
                bytes.as_ptr(),
                self.0.as_ptr().add(HEADER_LEN + at),
                bytes.len(),
            );
        }
    }

    /// The first byte of each child's prefix, in edge order.
    pub unsafe fn first_bytes<'a>(self) -> &'a [u8] {
        unsafe {
            slice::from_raw_parts(
                self.0.as_ptr().add(self.first_bytes_offset()),
                self.edge_count() as usize,
            )
        }
    }

    /// The child reference stored at the given edge index.
    pub unsafe fn child(self, index: usize) -> Self {
        debug_assert!(index < unsafe { self.edge_count() } as usize);
        let data = unsafe {
            let at = self.children_offset() + index * CHILD_LEN;
            ptr::read_unaligned(self.0.as_ptr().add(at).cast::<*mut u8>())
        };
        Self(unsafe { NonNull::new_unchecked(data) })
    }

    /// Overwrites the child reference at the given edge index.
    pub unsafe fn set_child(self, index: usize, child: Self) {
        debug_assert!(index < unsafe { self.edge_count() } as usize);
        unsafe {
            let at = self.children_offset() + index * CHILD_LEN;
            ptr::write_unaligned(self.0.as_ptr().add(at).cast::<*mut u8>(), child.0.as_ptr());
        }
    }

    /// Overwrites both halves of the edge at the given index.
    pub unsafe fn set_edge(self, index: usize, first_byte: u8, child: Self) {
        debug_assert!(index < unsafe { self.edge_count() } as usize);
        unsafe {
            self.0.as_ptr().add(self.first_bytes_offset() + index).write(first_byte);
            self.set_child(index, child);
        }
    }

    /// Copies the whole first-byte and child sections from a node with the
    /// same edge count.
    pub unsafe fn copy_edges_from(self, source: Self) {
        debug_assert_eq!(unsafe { self.edge_count() }, unsafe { source.edge_count() });
        let count = unsafe { self.edge_count() } as usize;
        unsafe {
            ptr::copy_nonoverlapping(
                source.0.as_ptr().add(source.first_bytes_offset()),
                self.0.as_ptr().add(self.first_bytes_offset()),
                count,
            );
            ptr::copy_nonoverlapping(
                source.0.as_ptr().add(source.children_offset()),
                self.0.as_ptr().add(self.children_offset()),
                count * CHILD_LEN,
            );
        }
    }

    /// Re-lays the child section after the node grew by one edge: the header
    /// must already hold the new edge count, and the surviving entries still
    /// sit one byte below their new offset. The last edge slot is left for
    /// the caller to fill.
    pub unsafe fn shift_children_right(self) {
        unsafe {
            let at = self.children_offset();
            let count = self.edge_count() as usize - 1;
            ptr::copy(
                self.0.as_ptr().add(at - 1),
                self.0.as_ptr().add(at),
                count * CHILD_LEN,
            );
        }
    }

    /// Re-lays the child section before the node shrinks by one edge: the
    /// header still holds the old edge count, and the surviving entries move
    /// one byte down to where the shrunk layout expects them.
    pub unsafe fn shift_children_left(self) {
        unsafe {
            let at = self.children_offset();
            let count = self.edge_count() as usize - 1;
            ptr::copy(
                self.0.as_ptr().add(at),
                self.0.as_ptr().add(at - 1),
                count * CHILD_LEN,
            );
        }
    }

    /// Total size of the backing allocation in bytes.
    pub unsafe fn size_in_bytes(self) -> usize {
        unsafe {
            HEADER_LEN
                + self.prefix_len() as usize
                + self.edge_count() as usize * (1 + CHILD_LEN)
        }
    }

    unsafe fn first_bytes_offset(self) -> usize {
        HEADER_LEN + unsafe { self.prefix_len() } as usize
    }

    unsafe fn children_offset(self) -> usize {
        unsafe { self.first_bytes_offset() + self.edge_count() as usize }
    }

    unsafe fn read_u32(self, at: usize) -> u32 {
        unsafe { ptr::read_unaligned(self.0.as_ptr().add(at).cast::<u32>()) }
    }

    unsafe fn write_u32(self, at: usize, value: u32) {
        unsafe { ptr::write_unaligned(self.0.as_ptr().add(at).cast::<u32>(), value) };
    }
}

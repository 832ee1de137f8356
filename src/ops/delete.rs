use crate::raw::RawNode;

use super::Match;

/// The outcome of a removal.
#[derive(Debug, Clone, Copy)]
pub struct Removed {
    /// The tree's root, which moves when the removal resized the root.
    pub root: RawNode,
    /// Whether the key was present and one occurrence was removed.
    pub removed: bool,
}

/// Keyed removal with chain merging.
pub struct Delete;

impl Delete {
    /// Removes one occurrence of `key` from the tree rooted at `root`.
    pub unsafe fn apply(root: RawNode, key: &[u8]) -> Removed {
        let matched = unsafe { Match::against(root, key) };
        let current = matched.current;
        let (prefix_len, refcount) = unsafe { (current.prefix_len(), current.refcount()) };
        if matched.nkey != key.len() || matched.nprefix != prefix_len as usize || refcount == 0 {
            return Removed { root, removed: false };
        }

        unsafe { current.set_refcount(refcount - 1) };
        if refcount > 1 {
            // Other occurrences keep the key present.
            return Removed { root, removed: true };
        }

        let edges = unsafe { current.edge_count() };
        if edges > 1 {
            // Still a branch point; nothing to restructure.
            return Removed { root, removed: true };
        }
        if edges == 1 {
            // A former key with a single child is now an over-long chain;
            // absorb the child to restore compaction.
            let child = unsafe { current.child(0) };
            let merged = unsafe { Self::absorb_child(current, child) };
            unsafe { matched.parent.set_child(matched.edge_idx, merged) };
            return Removed { root, removed: true };
        }
        unsafe { Self::unlink_leaf(root, &matched) }
    }

    /// Detaches the emptied leaf `matched.current` from its parent.
    unsafe fn unlink_leaf(root: RawNode, matched: &Match) -> Removed {
        let parent = matched.parent;
        let (prefix_len, refcount, edges) =
            unsafe { (parent.prefix_len(), parent.refcount(), parent.edge_count()) };

        if edges == 2 && refcount == 0 && prefix_len > 0 {
            // Dropping the leaf would leave a single-edge internal node;
            // merge the parent with the surviving sibling instead.
            let sibling = unsafe { parent.child(1 - matched.edge_idx) };
            unsafe { matched.current.dealloc() };
            let merged = unsafe { Self::absorb_child(parent, sibling) };
            unsafe { matched.grandparent.set_child(matched.gp_edge_idx, merged) };
            return Removed { root, removed: true };
        }

        // Drop the leaf's edge, moving the last edge into its slot.
        let last = edges as usize - 1;
        unsafe {
            let (first_byte, child) = (parent.first_bytes()[last], parent.child(last));
            parent.set_edge(matched.edge_idx, first_byte, child);
            parent.shift_children_left();
        }
        let parent = unsafe { parent.resize(prefix_len, last as u32) };
        unsafe { matched.current.dealloc() };
        let root = if prefix_len == 0 {
            parent // only the root has an empty prefix
        } else {
            unsafe { matched.grandparent.set_child(matched.gp_edge_idx, parent) };
            root
        };
        Removed { root, removed: true }
    }

    /// Splices `child` into `node`: the prefixes concatenate and `node`
    /// takes over the child's refcount and edges. Frees `child`.
    unsafe fn absorb_child(node: RawNode, child: RawNode) -> RawNode {
        let at = unsafe { node.prefix_len() };
        let (child_prefix_len, child_edges, child_refcount) =
            unsafe { (child.prefix_len(), child.edge_count(), child.refcount()) };
        let node = unsafe { node.resize(at + child_prefix_len, child_edges) };
        unsafe {
            node.write_prefix(at as usize, child.prefix());
            node.copy_edges_from(child);
            node.set_refcount(child_refcount);
            child.dealloc();
        }
        node
    }
}

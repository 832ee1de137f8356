use crate::raw::RawNode;

use super::Match;

/// The outcome of an insertion.
#[derive(Debug, Clone, Copy)]
pub struct Inserted {
    /// The tree's root, which moves when the insertion resized the root.
    pub root: RawNode,
    /// Whether the key went from absent to present.
    pub was_absent: bool,
}

/// Keyed insertion with prefix splitting.
pub struct Insert;

impl Insert {
    /// Inserts one occurrence of `key` into the tree rooted at `root`.
    pub unsafe fn apply(root: RawNode, key: &[u8]) -> Inserted {
        let matched = unsafe { Match::against(root, key) };
        let current = matched.current;
        let prefix_len = unsafe { current.prefix_len() } as usize;

        if matched.nkey < key.len() {
            let tail = &key[matched.nkey..];
            if matched.nprefix == prefix_len {
                // The whole prefix matched but no edge continues the key;
                // the unmatched tail becomes a new leaf below `current`.
                let grown = unsafe { Self::attach_leaf(current, tail) };
                let root = if unsafe { grown.prefix_len() } == 0 {
                    grown // only the root has an empty prefix
                } else {
                    unsafe { matched.parent.set_child(matched.edge_idx, grown) };
                    root
                };
                return Inserted { root, was_absent: true };
            }
            // The key diverges inside the prefix; split at the mismatch and
            // hang both the key tail and the old lower half below `current`.
            let split = unsafe { Self::split_at_mismatch(current, tail, matched.nprefix) };
            unsafe { matched.parent.set_child(matched.edge_idx, split) };
            return Inserted { root, was_absent: true };
        }

        if matched.nprefix < prefix_len {
            // The key is a proper prefix of this node; keep the matched head
            // here as a key and push the tail into a single child.
            let head = unsafe { Self::split_as_key(current, matched.nprefix) };
            unsafe { matched.parent.set_child(matched.edge_idx, head) };
            return Inserted { root, was_absent: true };
        }

        let refcount = unsafe { current.refcount() };
        unsafe { current.set_refcount(refcount + 1) };
        Inserted { root, was_absent: refcount == 0 }
    }

    /// Grows `node` by one edge pointing at a fresh leaf holding `tail`.
    unsafe fn attach_leaf(node: RawNode, tail: &[u8]) -> RawNode {
        let leaf = RawNode::alloc(1, tail.len() as u32, 0);
        unsafe { leaf.write_prefix(0, tail) };
        let (prefix_len, edges) = unsafe { (node.prefix_len(), node.edge_count()) };
        let node = unsafe { node.resize(prefix_len, edges + 1) };
        unsafe {
            node.shift_children_right();
            node.set_edge(edges as usize, tail[0], leaf);
        }
        node
    }

    /// Splits `node` at `nprefix`: the head keeps the matched bytes and
    /// becomes internal with two children, a fresh leaf holding the key tail
    /// and the lower half carrying everything the node used to be.
    unsafe fn split_at_mismatch(node: RawNode, tail: &[u8], nprefix: usize) -> RawNode {
        let key_node = RawNode::alloc(1, tail.len() as u32, 0);
        unsafe { key_node.write_prefix(0, tail) };
        let lower = unsafe { Self::split_off_tail(node, nprefix) };
        let node = unsafe { node.resize(nprefix as u32, 2) };
        unsafe {
            node.set_refcount(0);
            node.set_edge(0, tail[0], key_node);
            node.set_edge(1, lower.prefix()[0], lower);
        }
        node
    }

    /// Splits `node` at `nprefix` where the key ends exactly there: the head
    /// keeps the matched bytes, holds one occurrence of the key, and keeps a
    /// single edge to the lower half.
    unsafe fn split_as_key(node: RawNode, nprefix: usize) -> RawNode {
        let lower = unsafe { Self::split_off_tail(node, nprefix) };
        let node = unsafe { node.resize(nprefix as u32, 1) };
        unsafe {
            node.set_refcount(1);
            node.set_edge(0, lower.prefix()[0], lower);
        }
        node
    }

    /// Copies everything below the split point into a fresh node: the
    /// prefix bytes past `nprefix`, plus the node's refcount and edges.
    /// `node` itself is left untouched.
    unsafe fn split_off_tail(node: RawNode, nprefix: usize) -> RawNode {
        let tail_len = unsafe { node.prefix_len() } as usize - nprefix;
        let lower = unsafe {
            RawNode::alloc(node.refcount(), tail_len as u32, node.edge_count())
        };
        unsafe {
            lower.write_prefix(0, &node.prefix()[nprefix..]);
            lower.copy_edges_from(node);
        }
        lower
    }
}

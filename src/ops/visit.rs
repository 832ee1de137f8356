use crate::raw::RawNode;

/// Whole-tree traversals: key enumeration, byte accounting, and teardown.
pub struct Visit;

impl Visit {
    /// Depth-first enumeration of the present keys. Each distinct key is
    /// passed to the visitor exactly once, together with its insertion
    /// count; the order among siblings is unspecified.
    pub unsafe fn keys<F>(root: RawNode, visitor: &mut F)
    where
        F: FnMut(&[u8], u32),
    {
        let mut path = Vec::new();
        unsafe { Self::collect(root, &mut path, visitor) };
    }

    unsafe fn collect<F>(node: RawNode, path: &mut Vec<u8>, visitor: &mut F)
    where
        F: FnMut(&[u8], u32),
    {
        let depth = path.len();
        unsafe {
            path.extend_from_slice(node.prefix());
            let refcount = node.refcount();
            if refcount > 0 {
                visitor(path, refcount);
            }
            for index in 0..node.edge_count() as usize {
                Self::collect(node.child(index), path, visitor);
            }
        }
        path.truncate(depth);
    }

    /// Sums the backing allocation sizes of every node in the tree.
    pub unsafe fn allocated_bytes(root: RawNode) -> usize {
        let mut total = 0;
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            unsafe {
                total += node.size_in_bytes();
                for index in 0..node.edge_count() as usize {
                    stack.push(node.child(index));
                }
            }
        }
        total
    }

    /// Frees every node in the tree.
    pub unsafe fn reclaim(root: RawNode) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            unsafe {
                for index in 0..node.edge_count() as usize {
                    stack.push(node.child(index));
                }
                node.dealloc();
            }
        }
    }
}

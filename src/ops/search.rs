use crate::raw::RawNode;

/// The outcome of descending from the root along a key.
///
/// `parent` and `grandparent` trail the descent so that mutating operations
/// can rewrite the edges above `current` when a resize moves it. Before the
/// first step all three references equal the root; `edge_idx` and
/// `gp_edge_idx` are meaningful only once the corresponding descent
/// happened.
#[derive(Debug, Clone, Copy)]
pub struct Match {
    /// Number of key bytes consumed.
    pub nkey: usize,
    /// Number of bytes matched within `current`'s prefix.
    pub nprefix: usize,
    /// Index of the edge taken from `parent` to `current`.
    pub edge_idx: usize,
    /// Index of the edge taken from `grandparent` to `parent`.
    pub gp_edge_idx: usize,
    /// The deepest node whose path agrees with a prefix of the key.
    pub current: RawNode,
    pub parent: RawNode,
    pub grandparent: RawNode,
}

impl Match {
    /// Walks the tree from `root`, consuming key bytes while the compressed
    /// prefixes and edge bytes agree. Stops on a partial prefix match, on a
    /// missing edge, or when the key is exhausted. Read-only and total; the
    /// caller classifies the outcome.
    pub unsafe fn against(root: RawNode, key: &[u8]) -> Self {
        let mut matched = Self {
            nkey: 0,
            nprefix: 0,
            edge_idx: 0,
            gp_edge_idx: 0,
            current: root,
            parent: root,
            grandparent: root,
        };
        loop {
            let current = matched.current;
            let prefix = unsafe { current.prefix() };
            if prefix.is_empty() && unsafe { current.edge_count() } == 0 {
                break;
            }
            matched.nprefix = 0;
            while matched.nprefix < prefix.len()
                && matched.nkey < key.len()
                && prefix[matched.nprefix] == key[matched.nkey]
            {
                matched.nprefix += 1;
                matched.nkey += 1;
            }
            if matched.nprefix < prefix.len() {
                break; // partial prefix match, the caller may split
            }
            if matched.nkey == key.len() {
                break;
            }
            let next = key[matched.nkey];
            let Some(index) = unsafe { current.first_bytes() }
                .iter()
                .position(|&byte| byte == next)
            else {
                break; // no outgoing edge continues the key
            };
            matched.grandparent = matched.parent;
            matched.parent = current;
            matched.current = unsafe { current.child(index) };
            matched.gp_edge_idx = matched.edge_idx;
            matched.edge_idx = index;
        }
        matched
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        ops::{Insert, Visit},
        raw::RawNode,
    };

    use super::Match;

    fn build(keys: &[&[u8]]) -> RawNode {
        let mut root = RawNode::alloc(0, 0, 0);
        for key in keys {
            root = unsafe { Insert::apply(root, key) }.root;
        }
        root
    }

    #[test]
    fn empty_tree_matches_nothing() {
        let root = build(&[]);
        let matched = unsafe { Match::against(root, b"abc") };
        assert_eq!(matched.nkey, 0);
        assert_eq!(matched.nprefix, 0);
        assert_eq!(matched.current, root);
        unsafe { Visit::reclaim(root) };
    }

    #[test]
    fn full_match_consumes_key_and_prefix() {
        let root = build(&[b"romane", b"romulus"]);
        let matched = unsafe { Match::against(root, b"romane") };
        assert_eq!(matched.nkey, 6);
        unsafe {
            assert_eq!(matched.nprefix, matched.current.prefix_len() as usize);
            assert_eq!(matched.current.refcount(), 1);
        }
        unsafe { Visit::reclaim(root) };
    }

    #[test]
    fn mismatch_stops_inside_a_prefix() {
        let root = build(&[b"romane"]);
        let matched = unsafe { Match::against(root, b"romulus") };
        assert_eq!(matched.nkey, 3);
        assert_eq!(matched.nprefix, 3);
        unsafe {
            assert_eq!(matched.current.prefix(), b"romane");
        }
        unsafe { Visit::reclaim(root) };
    }

    #[test]
    fn descent_tracks_both_ancestors() {
        let root = build(&[b"romane", b"romanus", b"romulus"]);
        let matched = unsafe { Match::against(root, b"romanus") };
        assert_eq!(matched.nkey, 7);
        unsafe {
            // The path is root -> "rom" -> "an" -> "us"; the grandparent is
            // the deepest branch above the matched leaf.
            assert_eq!(matched.current.prefix(), b"us");
            assert_eq!(matched.parent.prefix(), b"an");
            assert_eq!(matched.grandparent.prefix(), b"rom");
            assert_eq!(matched.parent.child(matched.edge_idx), matched.current);
            assert_eq!(matched.grandparent.child(matched.gp_edge_idx), matched.parent);
        }
        unsafe { Visit::reclaim(root) };
    }

    #[test]
    fn exhausted_key_stops_before_edges() {
        let root = build(&[b"test", b"testing"]);
        let matched = unsafe { Match::against(root, b"test") };
        assert_eq!(matched.nkey, 4);
        unsafe {
            assert_eq!(matched.current.prefix(), b"test");
            assert_eq!(matched.nprefix, 4);
        }
        unsafe { Visit::reclaim(root) };
    }
}

use std::fmt;

use crate::raw::RawNode;

/// Human-readable rendering of the tree shape.
pub struct Fmt;

impl Fmt {
    /// Writes one line per node showing its prefix bytes, with a `[*]`
    /// marker on nodes that currently hold a key. Non-printable bytes are
    /// escaped. This is a debugging aid, not a stable format.
    pub unsafe fn pretty(root: RawNode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "[root]")?;
        for index in 0..unsafe { root.edge_count() } as usize {
            unsafe { Self::subtree(root.child(index), 1, f)? };
        }
        Ok(())
    }

    unsafe fn subtree(node: RawNode, level: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, refcount, edges) =
            unsafe { (node.prefix(), node.refcount(), node.edge_count()) };
        write!(f, "{:indent$}`-> {}", "", prefix.escape_ascii(), indent = 5 * level - 4)?;
        if refcount > 0 {
            write!(f, " [*]")?;
        }
        writeln!(f)?;
        for index in 0..edges as usize {
            unsafe { Self::subtree(node.child(index), level + 1, f)? };
        }
        Ok(())
    }
}

//! Nodes and handles of the [`AvlTree`][crate::AvlTree].

use std::sync::atomic::{AtomicU64, Ordering};

/// Source of node stamps, shared by every tree in the process.
static NEXT_STAMP: AtomicU64 = AtomicU64::new(0);

/// A stamp never handed out before. Stamps tell a live node apart from an
/// earlier occupant of its slab slot and from the nodes of other trees.
pub(crate) fn next_stamp() -> u64 {
    NEXT_STAMP.fetch_add(1, Ordering::Relaxed)
}

// ////////////////////////////////////////////////////////////////////////////
// NodeId
// ////////////////////////////////////////////////////////////////////////////

/// A handle to a node of an [`AvlTree`][crate::AvlTree].
///
/// Handles are returned by [`insert`][crate::AvlTree::insert] and
/// [`search`][crate::AvlTree::search] and stay valid until the node they name
/// is deleted. A handle to a deleted node is *stale*: every accessor returns
/// `None` for it and [`delete`][crate::AvlTree::delete] rejects it with
/// [`Error::StaleNode`][crate::Error::StaleNode].
///
/// Handles are only meaningful for the tree that produced them; a handle
/// presented to any other tree (a clone included) is treated as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    pub(crate) index: usize,
    pub(crate) stamp: u64,
}

// ////////////////////////////////////////////////////////////////////////////
// AvlNode
// ////////////////////////////////////////////////////////////////////////////

/// A tree node. Children are owned through the tree's slab; `parent` is a
/// back-reference used only to walk upwards.
#[derive(Debug, Clone)]
pub(crate) struct AvlNode<K> {
    pub(crate) key: K,
    /// Height of the subtree rooted here; a leaf has height 1.
    pub(crate) height: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
    /// Identifies this node for the lifetime of the process.
    pub(crate) stamp: u64,
}

impl<K> AvlNode<K> {
    /// Create a new, freshly stamped leaf hanging off `parent`.
    pub(crate) fn leaf(key: K, parent: Option<usize>) -> Self {
        AvlNode {
            key,
            height: 1,
            parent,
            left: None,
            right: None,
            stamp: next_stamp(),
        }
    }
}

// ////////////////////////////////////////////////////////////////////////////
// Rotation
// ////////////////////////////////////////////////////////////////////////////

/// The four ways of restoring balance at a node whose balance factor reached
/// ±2.
///
/// ```text
///      Left               Right             LeftRight           RightLeft
///   x                        x                x                  x
///    \                      /                /                    \
///     y         y          y        y       y          z           y         z
///      \   =>  / \        /    =>  / \       \    =>  / \         /    =>   / \
///       z     x   z      z        z   x       z      y   x       z         x   y
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Rotation {
    /// Single rotation for a right-heavy node whose right child is not
    /// left-heavy.
    Left,
    /// Single rotation for a left-heavy node whose left child is not
    /// right-heavy.
    Right,
    /// Left rotation of the left child, then right rotation of the node.
    LeftRight,
    /// Right rotation of the right child, then left rotation of the node.
    RightLeft,
}

//! Errors surfaced by the tree and the skiplist.
//!
//! Absence of a key is never an error: `search`, `contains` and delete-by-key
//! report it through `Option`/`bool`. The variants here cover misuse of the
//! API (asking an empty structure for something, indexing past the end,
//! handing back a node handle that no longer exists) and the diagnostics
//! produced by the invariant checkers.

use thiserror::Error;

/// Errors returned by [`AvlTree`][crate::AvlTree] and
/// [`RankedSkipList`][crate::RankedSkipList] operations.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    /// The operation needs at least one element.
    #[error("the structure is empty")]
    EmptyStructure,
    /// A rank was requested outside of `[0, len)`.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The requested rank.
        index: usize,
        /// The number of elements at the time of the request.
        len: usize,
    },
    /// The node handle does not refer to a live node of this tree.
    #[error("node handle is stale or belongs to another tree")]
    StaleNode,
}

/// A structural invariant that was found broken by `check_invariants`.
///
/// These are never produced by normal operation; seeing one means the
/// rebalancing or span bookkeeping has a bug.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvariantViolation {
    /// A cached height disagrees with the heights of the children.
    #[error("node {node}: cached height {cached} but children imply {expected}")]
    Height {
        /// Slab key of the offending node.
        node: usize,
        /// The height stored in the node.
        cached: usize,
        /// `1 + max(left, right)`.
        expected: usize,
    },
    /// A node's balance factor left `{-1, 0, 1}`.
    #[error("node {node}: balance factor {balance} out of bounds")]
    Balance {
        /// Slab key of the offending node.
        node: usize,
        /// The observed balance factor.
        balance: isize,
    },
    /// Keys are out of order.
    #[error("node {node}: key out of order")]
    Order {
        /// Slab key of the node at which the order broke.
        node: usize,
    },
    /// A child's parent handle does not point back at its parent, or the
    /// root has a parent.
    #[error("node {node}: parent link is inconsistent")]
    ParentLink {
        /// Slab key of the offending node.
        node: usize,
    },
    /// The spans of a skiplist level do not cover the whole list.
    #[error("level {level}: spans sum to {sum}, expected {expected}")]
    Span {
        /// The level index, 0 being the base.
        level: usize,
        /// The sum of spans observed on the level.
        sum: usize,
        /// `len + 1`.
        expected: usize,
    },
    /// A skiplist node's `below` link does not lead to a node with the
    /// same value.
    #[error("level {level}: tower link below node {node} is broken")]
    Tower {
        /// The level index, 0 being the base.
        level: usize,
        /// Index of the offending node within its level.
        node: usize,
    },
    /// A skiplist level's `prev` link does not mirror its `next` link.
    #[error("level {level}: back link of node {node} is broken")]
    BackLink {
        /// The level index, 0 being the base.
        level: usize,
        /// Index of the offending node within its level.
        node: usize,
    },
    /// The stored element count does not match the number of reachable
    /// elements.
    #[error("stored length {stored} but found {found} elements")]
    Length {
        /// The element counter.
        stored: usize,
        /// The number of elements actually reachable.
        found: usize,
    },
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{Error, InvariantViolation};

    #[test]
    fn messages() {
        assert_eq!(Error::EmptyStructure.to_string(), "the structure is empty");
        assert_eq!(
            Error::OutOfRange { index: 5, len: 5 }.to_string(),
            "index 5 out of range for length 5"
        );
        assert_eq!(
            InvariantViolation::Span {
                level: 2,
                sum: 4,
                expected: 6
            }
            .to_string(),
            "level 2: spans sum to 4, expected 6"
        );
    }
}

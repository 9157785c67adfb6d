//! A single level of a [`RankedSkipList`][crate::RankedSkipList].
//!
//! Each level is an independent doubly linked list stored in its own slab
//! and bounded by a pair of sentinels. The left sentinel always lives in slot
//! [`HEAD`] and the right sentinel in slot [`TAIL`], on every level, so a
//! sentinel's `below` link is simply the same slot one level down.
//!
//! ```text
//! level 2:  -∞ --------------------------> 8 ----> +∞
//! level 1:  -∞ ------------> 4 ---> 5 ---> 8 ----> +∞
//! level 0:  -∞ ---> 1 ---> 3 ---> 4 ---> 5 ---> 8 ---> +∞
//! ```
//!
//! Every forward link records its *span*: how many base-level positions it
//! jumps over. The left sentinel is at position 0, the elements at positions
//! `1..=len`, and the right sentinel at `len + 1`, so the spans of a level
//! always add up to `len + 1`.

use slab::Slab;

/// Slot of the left sentinel on every level.
pub(crate) const HEAD: usize = 0;
/// Slot of the right sentinel on every level.
pub(crate) const TAIL: usize = 1;

/// What a level node stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Negative infinity, smaller than every value.
    LeftSentinel,
    /// Positive infinity, larger than every value.
    RightSentinel,
    /// A value, by its key in the list's value slab.
    Value(usize),
}

#[derive(Debug, Clone)]
pub(crate) struct LevelNode {
    pub(crate) kind: Kind,
    pub(crate) prev: Option<usize>,
    pub(crate) next: Option<usize>,
    /// The node of the same tower one level down; `None` on level 0.
    pub(crate) below: Option<usize>,
    /// Base-level positions between this node and `next`; 0 for the right
    /// sentinel.
    pub(crate) span: usize,
}

#[derive(Debug, Clone)]
pub(crate) struct Level {
    nodes: Slab<LevelNode>,
}

impl Level {
    /// A level holding only its sentinels, spanning a list of `len` elements.
    /// Levels above the base have their sentinels stacked on the sentinels of
    /// the level below.
    pub(crate) fn new(len: usize, stacked: bool) -> Self {
        let below = |slot| stacked.then_some(slot);
        let mut nodes = Slab::with_capacity(2);
        let head = nodes.insert(LevelNode {
            kind: Kind::LeftSentinel,
            prev: None,
            next: Some(TAIL),
            below: below(HEAD),
            span: len + 1,
        });
        let tail = nodes.insert(LevelNode {
            kind: Kind::RightSentinel,
            prev: Some(HEAD),
            next: None,
            below: below(TAIL),
            span: 0,
        });
        debug_assert_eq!((head, tail), (HEAD, TAIL));
        Level { nodes }
    }

    #[inline]
    pub(crate) fn node(&self, index: usize) -> &LevelNode {
        &self.nodes[index]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, index: usize) -> &mut LevelNode {
        &mut self.nodes[index]
    }

    /// The successor of `index`, which must not be the right sentinel.
    pub(crate) fn next_of(&self, index: usize) -> usize {
        match self.nodes[index].next {
            Some(next) => next,
            None => unreachable!("the right sentinel has no successor"),
        }
    }

    /// Links a new node right after `prev` and returns its slot. The span of
    /// the new node is left at 0 for the caller to fill in.
    pub(crate) fn insert_after(&mut self, prev: usize, kind: Kind, below: Option<usize>) -> usize {
        let next = self.next_of(prev);
        let index = self.nodes.insert(LevelNode {
            kind,
            prev: Some(prev),
            next: Some(next),
            below,
            span: 0,
        });
        self.nodes[prev].next = Some(index);
        self.nodes[next].prev = Some(index);
        index
    }

    /// Unlinks the node right after `prev` and returns it. Spans are left for
    /// the caller to fold.
    pub(crate) fn remove_after(&mut self, prev: usize) -> LevelNode {
        let index = self.next_of(prev);
        assert!(
            index != TAIL,
            "attempted to unlink the right sentinel of a level"
        );
        let next = self.next_of(index);
        self.nodes[prev].next = Some(next);
        self.nodes[next].prev = Some(prev);
        self.nodes.remove(index)
    }

    /// Number of value nodes on this level.
    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.nodes.len() - 2
    }

    /// Iterates over the level from the left sentinel to the right sentinel
    /// as `(slot, node)`.
    pub(crate) fn iter(&self) -> impl Iterator<Item = (usize, &LevelNode)> {
        let mut current = Some(HEAD);
        std::iter::from_fn(move || {
            let index = current?;
            let node = &self.nodes[index];
            current = node.next;
            Some((index, node))
        })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::{HEAD, Kind, Level, TAIL};

    fn kinds(level: &Level) -> Vec<Kind> {
        level.iter().map(|(_, node)| node.kind).collect()
    }

    #[test]
    fn fresh_level() {
        let level = Level::new(4, true);
        assert_eq!(level.len(), 0);
        assert_eq!(kinds(&level), vec![Kind::LeftSentinel, Kind::RightSentinel]);
        assert_eq!(level.node(HEAD).span, 5);
        assert_eq!(level.node(HEAD).below, Some(HEAD));
        assert_eq!(level.node(TAIL).span, 0);
        assert_eq!(level.node(TAIL).below, Some(TAIL));

        let base = Level::new(0, false);
        assert_eq!(base.node(HEAD).below, None);
        assert_eq!(base.node(HEAD).span, 1);
    }

    #[test]
    fn link_and_unlink() {
        let mut level = Level::new(0, false);
        let a = level.insert_after(HEAD, Kind::Value(0), None);
        let b = level.insert_after(a, Kind::Value(1), None);
        let c = level.insert_after(HEAD, Kind::Value(2), None);
        assert_eq!(level.len(), 3);
        assert_eq!(
            kinds(&level),
            vec![
                Kind::LeftSentinel,
                Kind::Value(2),
                Kind::Value(0),
                Kind::Value(1),
                Kind::RightSentinel
            ]
        );
        assert_eq!(level.node(a).prev, Some(c));
        assert_eq!(level.node(TAIL).prev, Some(b));

        let removed = level.remove_after(c);
        assert_eq!(removed.kind, Kind::Value(0));
        assert_eq!(level.node(c).next, Some(b));
        assert_eq!(level.node(b).prev, Some(c));
        assert_eq!(level.len(), 2);
    }

    #[test]
    #[should_panic(expected = "right sentinel")]
    fn cannot_unlink_sentinel() {
        let mut level = Level::new(0, false);
        let _ = level.remove_after(HEAD);
    }
}

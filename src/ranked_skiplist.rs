//! A sorted skiplist with rank (order-statistic) queries.

use std::{
    cmp::Ordering,
    collections::HashMap,
    fmt::{self, Write as _},
};

use log::debug;
use slab::Slab;

use crate::{
    error::{Error, InvariantViolation},
    level_generator::{Geometric, LevelGenerator},
    skiplevel::{HEAD, Kind, Level, LevelNode, TAIL},
};

// ////////////////////////////////////////////////////////////////////////////
// RankedSkipList
// ////////////////////////////////////////////////////////////////////////////

/// A skiplist which keeps its values sorted and answers "which value is at
/// rank `i`" in `O(log(n))` on average.
///
/// Every value is stored once and represented by a *tower* of nodes: one on
/// the base level and one on each of the levels it was promoted to. Each
/// forward link remembers its span, the number of base-level positions it
/// skips, so that a search can count how many values it has passed while it
/// descends.
///
/// The number of levels a new value is promoted to is drawn from a
/// [`LevelGenerator`], by default a [`Geometric`] distribution with `p = 1/2`
/// capped at 32 levels. Levels are created lazily, the first time a value is
/// promoted that high.
///
/// Equal values are allowed; a new value is placed in front of the values it
/// is equal to, and equal values are indistinguishable for search purposes.
///
/// # Examples
///
/// ```
/// use skiptree::RankedSkipList;
///
/// let mut list = RankedSkipList::new();
/// list.extend([5, 3, 8, 1, 4]);
///
/// assert_eq!(list.element_at(0).map(|e| *e.value()), Ok(1));
/// assert_eq!(list.element_at(4).map(|e| *e.value()), Ok(8));
/// assert!(list.search(&3).is_some());
/// assert!(list.search(&99).is_none());
/// ```
pub struct RankedSkipList<T, G = Geometric> {
    /// Each stored value, referenced by the towers through its slot.
    values: Slab<T>,
    /// `levels[0]` is the base level holding every value; the last level is
    /// where searches start.
    levels: Vec<Level>,
    level_generator: G,
}

/// The node a search stopped at on one level, and its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cursor {
    node: usize,
    rank: usize,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<T> RankedSkipList<T> {
    /// Create a new skiplist using the default [`Geometric`] level generator
    /// (32 levels, `p = 1/2`), seeded from the thread-local entropy source.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let list: RankedSkipList<i64> = RankedSkipList::new();
    /// assert!(list.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_level_generator(Geometric::default())
    }
}

impl<T, G> RankedSkipList<T, G>
where
    G: LevelGenerator,
{
    /// Create a new skiplist drawing tower heights from `level_generator`.
    ///
    /// This is how reproducible layouts are obtained, for instance with a
    /// seeded [`Geometric`].
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{Geometric, RankedSkipList};
    ///
    /// let generator = Geometric::with_seed(16, 0.25, 42)?;
    /// let mut list = RankedSkipList::with_level_generator(generator);
    /// list.insert(1);
    /// assert_eq!(list.len(), 1);
    /// # Ok::<(), skiptree::GeometricError>(())
    /// ```
    #[inline]
    pub fn with_level_generator(level_generator: G) -> Self {
        RankedSkipList {
            values: Slab::new(),
            levels: vec![Level::new(0, false)],
            level_generator,
        }
    }
}

impl<T, G> RankedSkipList<T, G> {
    /// Returns the number of values in the skiplist.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the skiplist contains no values.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// The number of levels currently in use, at least 1.
    ///
    /// Levels are added when a value is promoted above the current top and
    /// are kept even if later deletions empty them.
    #[inline]
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Clears the skiplist, removing all values and all levels above the
    /// base.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let mut list: RankedSkipList<_> = (0..10).collect();
    /// list.clear();
    /// assert!(list.is_empty());
    /// assert_eq!(list.level_count(), 1);
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.values.clear();
        self.levels.clear();
        self.levels.push(Level::new(0, false));
    }

    /// Returns the value at `rank` (0-based, in ascending order), together
    /// with the height of the tower it was found on.
    ///
    /// The walk starts at the top level and follows a link only if its span
    /// does not overshoot the target position, dropping a level otherwise.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStructure`] if the list is empty, and
    /// [`Error::OutOfRange`] if `rank >= len`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{Error, RankedSkipList};
    ///
    /// let list: RankedSkipList<_> = [30, 10, 20].into_iter().collect();
    /// assert_eq!(list.element_at(1).map(|e| *e.value()), Ok(20));
    /// assert_eq!(
    ///     list.element_at(3).map(|e| *e.value()),
    ///     Err(Error::OutOfRange { index: 3, len: 3 })
    /// );
    /// ```
    pub fn element_at(&self, rank: usize) -> Result<Entry<'_, T>, Error> {
        let len = self.len();
        if len == 0 {
            return Err(Error::EmptyStructure);
        }
        if rank >= len {
            return Err(Error::OutOfRange { index: rank, len });
        }

        let target = rank + 1;
        let mut position = 0;
        let mut node = HEAD;
        for (depth, level) in self.levels.iter().enumerate().rev() {
            loop {
                let here = level.node(node);
                match here.next {
                    Some(next) if position + here.span <= target => {
                        position += here.span;
                        node = next;
                    }
                    _ => break,
                }
            }
            let here = level.node(node);
            if position == target {
                if let Kind::Value(slot) = here.kind {
                    return Ok(Entry {
                        value: &self.values[slot],
                        level: depth,
                    });
                }
            }
            match here.below {
                Some(below) => node = below,
                None => break,
            }
        }
        unreachable!("rank {rank} of {len} not reachable through the spans")
    }

    /// Returns a reference to the value at `rank`, or `None` if out of bounds.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = (0..10).rev().collect();
    /// assert_eq!(list.get(3), Some(&3));
    /// assert_eq!(list.get(10), None);
    /// ```
    #[inline]
    #[must_use]
    pub fn get(&self, rank: usize) -> Option<&T> {
        self.element_at(rank).ok().map(|entry| entry.value)
    }

    /// Returns the smallest value, or `None` if the list is empty.
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.iter().next()
    }

    /// Returns the largest value, or `None` if the list is empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.iter().next_back()
    }

    /// Returns an iterator over the values in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    /// assert_eq!(list.iter().rev().next(), Some(&3));
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T, G> {
        let base = self.base();
        Iter {
            list: self,
            front: base.next_of(HEAD),
            back: base.node(TAIL).prev.unwrap_or(HEAD),
            remaining: self.len(),
        }
    }

    /// Walks level `level` (0 being the base) from its left sentinel to its
    /// right sentinel, yielding each node's key and span.
    ///
    /// Returns `None` if the level does not exist. Together with
    /// [`level_count`][RankedSkipList::level_count] this exposes the whole
    /// layout, for instance to draw it.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{Key, RankedSkipList};
    ///
    /// let list: RankedSkipList<_> = [2, 1].into_iter().collect();
    /// let base: Vec<_> = list.level(0).expect("base level").collect();
    /// assert_eq!(base.len(), 4);
    /// assert_eq!(base[0].key, Key::NegInfinity);
    /// assert_eq!(base[1].key, Key::Value(&1));
    /// assert!(base.iter().all(|e| e.span == 1 || e.key == Key::PosInfinity));
    /// ```
    #[must_use]
    pub fn level(&self, level: usize) -> Option<impl Iterator<Item = LevelEntry<'_, T>>> {
        let level = self.levels.get(level)?;
        Some(level.iter().map(|(_, node)| LevelEntry {
            key: self.key_of(node.kind),
            span: node.span,
        }))
    }

    fn base(&self) -> &Level {
        &self.levels[0]
    }

    fn key_of(&self, kind: Kind) -> Key<'_, T> {
        match kind {
            Kind::LeftSentinel => Key::NegInfinity,
            Kind::RightSentinel => Key::PosInfinity,
            Kind::Value(slot) => Key::Value(&self.values[slot]),
        }
    }
}

impl<T, G> RankedSkipList<T, G>
where
    T: Ord,
{
    /// Looks for `value`, returning the topmost node holding it.
    ///
    /// On each level the search moves right while the next value is not
    /// greater than `value`, and drops a level when it cannot.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = [5, 3, 8].into_iter().collect();
    /// let entry = list.search(&3).expect("3 was inserted");
    /// assert_eq!(*entry.value(), 3);
    /// assert!(entry.height() >= 1);
    /// assert!(list.search(&4).is_none());
    /// ```
    #[must_use]
    pub fn search(&self, value: &T) -> Option<Entry<'_, T>> {
        let mut node = HEAD;
        for (depth, level) in self.levels.iter().enumerate().rev() {
            node = self.advance_while(level, node, 0, |ord| ord != Ordering::Greater, value).0;
            let here = level.node(node);
            if let Kind::Value(slot) = here.kind {
                if self.values[slot] == *value {
                    return Some(Entry {
                        value: &self.values[slot],
                        level: depth,
                    });
                }
            }
            node = here.below?;
        }
        None
    }

    /// Returns `true` if the skiplist holds `value`.
    #[inline]
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.search(value).is_some()
    }

    /// Returns the rank of the first occurrence of `value`, or `None` if it is
    /// absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let list: RankedSkipList<_> = [50, 10, 40, 20].into_iter().collect();
    /// assert_eq!(list.rank_of(&40), Some(2));
    /// assert_eq!(list.rank_of(&30), None);
    /// ```
    #[must_use]
    pub fn rank_of(&self, value: &T) -> Option<usize> {
        let base = self.descend(value).pop()?;
        let level = self.base();
        let next = level.next_of(base.node);
        (self.compare(level.node(next).kind, value) == Ordering::Equal).then_some(base.rank)
    }

    /// For every level, topmost first, the last node whose value is strictly
    /// less than `value`, together with its position on the base level.
    ///
    /// The left sentinel sits at position 0, so the base-level entry's rank is
    /// also the rank `value` would be inserted at.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{Key, LevelGenerator, RankedSkipList};
    ///
    /// struct Flat;
    /// impl LevelGenerator for Flat {
    ///     fn total(&self) -> usize { 1 }
    ///     fn level(&mut self) -> usize { 0 }
    /// }
    ///
    /// let mut list = RankedSkipList::with_level_generator(Flat);
    /// list.extend([10, 20, 30]);
    /// let path = list.find_predecessors(&25);
    /// assert_eq!(path.len(), 1);
    /// assert_eq!(path[0].key, Key::Value(&20));
    /// assert_eq!(path[0].rank, 2);
    /// assert_eq!(list.find_predecessors(&5)[0].key, Key::NegInfinity);
    /// ```
    #[must_use]
    pub fn find_predecessors(&self, value: &T) -> Vec<Predecessor<'_, T>> {
        self.descend(value)
            .into_iter()
            .zip((0..self.levels.len()).rev())
            .map(|(cursor, depth)| Predecessor {
                key: self.key_of(self.levels[depth].node(cursor.node).kind),
                rank: cursor.rank,
            })
            .collect()
    }

    /// The path behind [`find_predecessors`][Self::find_predecessors], as
    /// level slots.
    fn descend(&self, value: &T) -> Vec<Cursor> {
        let mut path = Vec::with_capacity(self.levels.len());
        let mut node = HEAD;
        let mut rank = 0;
        for level in self.levels.iter().rev() {
            (node, rank) = self.advance_while(level, node, rank, |ord| ord == Ordering::Less, value);
            path.push(Cursor { node, rank });
            if let Some(below) = level.node(node).below {
                node = below;
            }
        }
        path
    }

    /// Moves right along `level` from `node` while `pred` holds for the
    /// comparison of the next node against `value`, accumulating spans onto
    /// `rank`.
    fn advance_while(
        &self,
        level: &Level,
        mut node: usize,
        mut rank: usize,
        pred: impl Fn(Ordering) -> bool,
        value: &T,
    ) -> (usize, usize) {
        loop {
            let here = level.node(node);
            let Some(next) = here.next else { break };
            if !pred(self.compare(level.node(next).kind, value)) {
                break;
            }
            rank += here.span;
            node = next;
        }
        (node, rank)
    }

    /// Compares a node against `value`, sentinels bounding every value.
    fn compare(&self, kind: Kind, value: &T) -> Ordering {
        match kind {
            Kind::LeftSentinel => Ordering::Less,
            Kind::RightSentinel => Ordering::Greater,
            Kind::Value(slot) => self.values[slot].cmp(value),
        }
    }

    /// Removes one occurrence of `value`, returning `false` (and leaving the
    /// list untouched) if it is absent.
    ///
    /// On every level where the value has a node, that node is unlinked and
    /// its span folded into its predecessor's; on the levels above the tower
    /// the predecessor's span simply shrinks by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let mut list: RankedSkipList<_> = (0..10).collect();
    /// assert!(list.delete(&4));
    /// assert!(!list.delete(&4));
    /// assert_eq!(list.len(), 9);
    /// assert_eq!(list.get(4), Some(&5));
    /// ```
    pub fn delete(&mut self, value: &T) -> bool {
        if !self.contains(value) {
            return false;
        }

        let path = self.descend(value);
        let mut released = None;
        for (depth, predecessor) in (0..self.levels.len()).rev().zip(path) {
            let level = &self.levels[depth];
            let next = level.next_of(predecessor.node);
            let kind = level.node(next).kind;
            let hit = self.compare(kind, value) == Ordering::Equal;

            let level = &mut self.levels[depth];
            if hit {
                let removed = level.remove_after(predecessor.node);
                level.node_mut(predecessor.node).span += removed.span - 1;
                if depth == 0 {
                    released = Some(kind);
                }
            } else {
                level.node_mut(predecessor.node).span -= 1;
            }
        }

        let Some(Kind::Value(slot)) = released else {
            unreachable!("a present value had no node on the base level")
        };
        self.values.remove(slot);
        debug!("deleted value from slot {slot}, {} left", self.len());
        true
    }

    /// Verifies the structural invariants of the skiplist: sorted levels,
    /// consistent back links, span sums, towers stacked on matching nodes at
    /// matching positions, and the element count.
    ///
    /// This walks every level and is meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let expected = self.len() + 1;
        let mut below_positions: Option<HashMap<usize, usize>> = None;
        for (depth, level) in self.levels.iter().enumerate() {
            let mut positions = HashMap::new();
            let mut position = 0;
            let mut previous: Option<(usize, &LevelNode)> = None;
            for (index, node) in level.iter() {
                if let Some((prev_index, prev)) = previous {
                    if node.prev != Some(prev_index) {
                        return Err(InvariantViolation::BackLink { level: depth, node: index });
                    }
                    if self.kind_cmp(prev.kind, node.kind) == Ordering::Greater {
                        return Err(InvariantViolation::Order { node: index });
                    }
                    position += prev.span;
                }
                positions.insert(index, position);

                match (node.below, &below_positions) {
                    (None, None) => {}
                    (Some(below), Some(lower)) => {
                        let stacked = self.levels[depth - 1].node(below).kind == node.kind
                            && lower.get(&below) == Some(&position);
                        if !stacked {
                            return Err(InvariantViolation::Tower { level: depth, node: index });
                        }
                    }
                    _ => return Err(InvariantViolation::Tower { level: depth, node: index }),
                }
                previous = Some((index, node));
            }

            let sum = position;
            let tail_ok = previous.is_some_and(|(index, node)| index == TAIL && node.span == 0);
            if sum != expected || !tail_ok {
                return Err(InvariantViolation::Span {
                    level: depth,
                    sum,
                    expected,
                });
            }
            below_positions = Some(positions);
        }

        let found = self.base().len();
        if found != self.len() {
            return Err(InvariantViolation::Length {
                stored: self.len(),
                found,
            });
        }
        Ok(())
    }

    fn kind_cmp(&self, a: Kind, b: Kind) -> Ordering {
        match (a, b) {
            (Kind::Value(a), _) => self.compare(b, &self.values[a]).reverse(),
            (Kind::LeftSentinel, Kind::LeftSentinel) | (Kind::RightSentinel, Kind::RightSentinel) => {
                Ordering::Equal
            }
            (Kind::LeftSentinel, _) => Ordering::Less,
            (Kind::RightSentinel, _) => Ordering::Greater,
        }
    }
}

impl<T, G> RankedSkipList<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    /// Inserts `value`, keeping the list sorted.
    ///
    /// A tower height is drawn from the level generator; missing levels are
    /// created on demand. On every level the tower reaches, the new node is
    /// linked after the predecessor found by the search and the predecessor's
    /// span is split between the two. Levels above the tower only see their
    /// predecessor's span grow by one.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::RankedSkipList;
    ///
    /// let mut list = RankedSkipList::new();
    /// list.insert(2);
    /// list.insert(1);
    /// list.insert(2);
    /// assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![1, 2, 2]);
    /// ```
    pub fn insert(&mut self, value: T) {
        let mut path = self.descend(&value);
        path.reverse();
        let insert_rank = path.first().map_or(0, |base| base.rank);

        let cap = self.level_generator.total().max(1);
        let promotions = (self.level_generator.level() + 1).min(cap);
        if promotions > self.levels.len() {
            let added = promotions - self.levels.len();
            debug!("adding {added} levels for a tower of height {promotions}");
            for _ in 0..added {
                self.levels.push(Level::new(self.len(), true));
                path.push(Cursor { node: HEAD, rank: 0 });
            }
        }

        let slot = self.values.insert(value);
        let mut below = None;
        for (depth, predecessor) in path.into_iter().enumerate() {
            let level = &mut self.levels[depth];
            let old_span = level.node(predecessor.node).span;
            if depth < promotions {
                let node = level.insert_after(predecessor.node, Kind::Value(slot), below);
                level.node_mut(predecessor.node).span = insert_rank - predecessor.rank + 1;
                level.node_mut(node).span = predecessor.rank + old_span - insert_rank;
                below = Some(node);
            } else {
                level.node_mut(predecessor.node).span = old_span + 1;
            }
        }
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<T> Default for RankedSkipList<T> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl<T, G> fmt::Debug for RankedSkipList<T, G>
where
    T: fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Draws every level, topmost first, one column per base-level position.
/// Positions a level skips over are filled with dashes.
///
/// ```
/// use skiptree::{LevelGenerator, RankedSkipList};
///
/// struct Flat;
/// impl LevelGenerator for Flat {
///     fn total(&self) -> usize { 1 }
///     fn level(&mut self) -> usize { 0 }
/// }
///
/// let mut list = RankedSkipList::with_level_generator(Flat);
/// list.extend([2, 1]);
/// assert_eq!(list.to_string(), "-∞ 1  2  +∞");
/// ```
impl<T, G> fmt::Display for RankedSkipList<T, G>
where
    T: fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let labels: Vec<String> = self.iter().map(ToString::to_string).collect();
        let width = labels
            .iter()
            .map(|label| label.chars().count())
            .chain([2])
            .max()
            .unwrap_or(2);
        let gap = "-".repeat(width);

        for (line, level) in self.levels.iter().rev().enumerate() {
            if line > 0 {
                writeln!(f)?;
            }
            let mut row = String::new();
            let mut position = 0;
            for (_, node) in level.iter() {
                let label = match node.kind {
                    Kind::LeftSentinel => "-∞",
                    Kind::RightSentinel => "+∞",
                    Kind::Value(_) => labels[position - 1].as_str(),
                };
                if position > 0 {
                    row.push(' ');
                }
                write!(row, "{label:<width$}")?;
                for _ in 1..node.span {
                    row.push(' ');
                    row.push_str(&gap);
                }
                position += node.span;
            }
            f.write_str(row.trim_end())?;
        }
        Ok(())
    }
}

impl<T, G> Extend<T> for RankedSkipList<T, G>
where
    T: Ord,
    G: LevelGenerator,
{
    #[inline]
    fn extend<I: IntoIterator<Item = T>>(&mut self, iterable: I) {
        for value in iterable {
            self.insert(value);
        }
    }
}

impl<T> FromIterator<T> for RankedSkipList<T>
where
    T: Ord,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = T>>(iterable: I) -> Self {
        let mut list = Self::new();
        list.extend(iterable);
        list
    }
}

impl<'a, T, G> IntoIterator for &'a RankedSkipList<T, G> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T, G>;

    #[inline]
    fn into_iter(self) -> Iter<'a, T, G> {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Entries
// ///////////////////////////////////////////////

/// A node found by [`search`][RankedSkipList::search] or
/// [`element_at`][RankedSkipList::element_at].
#[derive(Debug)]
pub struct Entry<'a, T> {
    value: &'a T,
    /// Level the node sits on, 0 being the base.
    level: usize,
}

impl<'a, T> Entry<'a, T> {
    /// The value held by the node.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> &'a T {
        self.value
    }

    /// The level the node was reached on, 0 being the base level.
    #[inline]
    #[must_use]
    pub const fn level(&self) -> usize {
        self.level
    }

    /// The number of levels of the tower below and including this node.
    #[inline]
    #[must_use]
    pub const fn height(&self) -> usize {
        self.level + 1
    }
}

impl<T> Clone for Entry<'_, T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Entry<'_, T> {}

impl<T> PartialEq for Entry<'_, T>
where
    T: PartialEq,
{
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.level == other.level
    }
}

/// The key of a node on a skiplist level: a sentinel or a value.
#[derive(Debug, PartialEq, Eq)]
pub enum Key<'a, T> {
    /// The left sentinel.
    NegInfinity,
    /// A stored value.
    Value(&'a T),
    /// The right sentinel.
    PosInfinity,
}

/// A step of the search path returned by
/// [`RankedSkipList::find_predecessors`].
#[derive(Debug, PartialEq, Eq)]
pub struct Predecessor<'a, T> {
    /// The last node on the level that is strictly less than the target.
    pub key: Key<'a, T>,
    /// Base-level position of that node; the left sentinel is at 0.
    pub rank: usize,
}

/// One node of a skiplist level, as yielded by
/// [`RankedSkipList::level`].
#[derive(Debug, PartialEq, Eq)]
pub struct LevelEntry<'a, T> {
    /// What the node holds.
    pub key: Key<'a, T>,
    /// Base-level positions between this node and the next one on the same
    /// level; 0 for the right sentinel.
    pub span: usize,
}

// ///////////////////////////////////////////////
// Iterators
// ///////////////////////////////////////////////

/// Iterator over the values of a [`RankedSkipList`], in ascending order.
pub struct Iter<'a, T, G = Geometric> {
    list: &'a RankedSkipList<T, G>,
    front: usize,
    back: usize,
    remaining: usize,
}

impl<'a, T, G> Iter<'a, T, G> {
    fn value_at(&self, node: usize) -> &'a T {
        let list = self.list;
        match list.base().node(node).kind {
            Kind::Value(slot) => &list.values[slot],
            Kind::LeftSentinel | Kind::RightSentinel => {
                unreachable!("iterator walked onto a sentinel")
            }
        }
    }
}

impl<'a, T, G> Iterator for Iter<'a, T, G> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.value_at(self.front);
        self.front = self.list.base().next_of(self.front);
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T, G> DoubleEndedIterator for Iter<'_, T, G> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let value = self.value_at(self.back);
        self.back = self.list.base().node(self.back).prev.unwrap_or(HEAD);
        Some(value)
    }
}

impl<T, G> ExactSizeIterator for Iter<'_, T, G> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

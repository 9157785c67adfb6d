//! A height-balanced binary search tree.

use std::{cmp::Ordering, fmt, iter};

use log::trace;
use slab::Slab;

use crate::{
    avlnode::{AvlNode, NodeId, Rotation, next_stamp},
    error::{Error, InvariantViolation},
};

// ////////////////////////////////////////////////////////////////////////////
// AvlTree
// ////////////////////////////////////////////////////////////////////////////

/// An AVL tree: a binary search tree in which every node caches the height of
/// its subtree, and the heights of the two subtrees of any node differ by at
/// most one.
///
/// Insertion and deletion finish with a walk from the modified node up to the
/// root which refreshes the cached heights and performs a single or double
/// rotation at every node whose balance factor reached ±2. All operations are
/// therefore `O(log(n))` in the worst case.
///
/// Keys equal to an existing key are accepted and routed into its right
/// subtree; equal keys are indistinguishable for search purposes.
///
/// Nodes are addressed through [`NodeId`] handles, which lets callers (such as
/// a renderer) walk the structure of the tree through
/// [`root`][AvlTree::root], [`left`][AvlTree::left],
/// [`right`][AvlTree::right] and [`parent`][AvlTree::parent].
///
/// # Examples
///
/// ```
/// use skiptree::AvlTree;
///
/// let mut tree = AvlTree::new();
/// for key in [50, 30, 70, 20, 40, 60, 80, 10] {
///     tree.insert(key);
/// }
/// assert!(tree.iter().copied().eq([10, 20, 30, 40, 50, 60, 70, 80]));
///
/// assert!(tree.remove(&30));
/// assert!(!tree.contains(&30));
/// assert_eq!(tree.len(), 7);
/// ```
pub struct AvlTree<K> {
    nodes: Slab<AvlNode<K>>,
    root: Option<usize>,
}

// ///////////////////////////////////////////////
// Inherent methods
// ///////////////////////////////////////////////

impl<K> AvlTree<K> {
    /// Create a new, empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let tree: AvlTree<i64> = AvlTree::new();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        AvlTree {
            nodes: Slab::new(),
            root: None,
        }
    }

    /// Returns the number of keys in the tree.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if the tree contains no keys.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Removes every key. All outstanding handles become stale.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let mut tree: AvlTree<_> = (0..10).collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    #[inline]
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
    }

    /// The height of the tree, 0 when empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let tree: AvlTree<_> = (0..7).collect();
    /// assert_eq!(tree.height(), 3);
    /// ```
    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    /// Handle to the root node, or `None` if the tree is empty.
    #[inline]
    #[must_use]
    pub fn root(&self) -> Option<NodeId> {
        self.root.map(|index| self.handle(index))
    }

    /// The key stored in `node`, or `None` if the handle is stale.
    #[inline]
    #[must_use]
    pub fn key(&self, node: NodeId) -> Option<&K> {
        self.live(node).map(|n| &n.key)
    }

    /// The height of the subtree rooted at `node` (a leaf has height 1).
    #[inline]
    #[must_use]
    pub fn node_height(&self, node: NodeId) -> Option<usize> {
        self.live(node).map(|n| n.height)
    }

    /// The balance factor of `node`: the height of its left subtree minus the
    /// height of its right subtree. Always within `{-1, 0, 1}` between
    /// operations.
    #[inline]
    #[must_use]
    pub fn balance_factor(&self, node: NodeId) -> Option<isize> {
        self.live(node).map(|_| self.balance(node.index))
    }

    /// Handle to the left child of `node`.
    #[inline]
    #[must_use]
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)
            .and_then(|n| n.left)
            .map(|index| self.handle(index))
    }

    /// Handle to the right child of `node`.
    #[inline]
    #[must_use]
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)
            .and_then(|n| n.right)
            .map(|index| self.handle(index))
    }

    /// Handle to the parent of `node`; `None` for the root.
    #[inline]
    #[must_use]
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.live(node)
            .and_then(|n| n.parent)
            .map(|index| self.handle(index))
    }

    /// Returns the smallest key, or `None` if the tree is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let tree: AvlTree<_> = [3, 1, 2].into_iter().collect();
    /// assert_eq!(tree.first(), Some(&1));
    /// assert_eq!(tree.last(), Some(&3));
    /// ```
    #[inline]
    #[must_use]
    pub fn first(&self) -> Option<&K> {
        self.root.map(|root| &self.nodes[self.leftmost(root)].key)
    }

    /// Returns the largest key, or `None` if the tree is empty.
    #[inline]
    #[must_use]
    pub fn last(&self) -> Option<&K> {
        self.root.map(|root| &self.nodes[self.rightmost(root)].key)
    }

    /// Deletes the node named by `node` and returns its key.
    ///
    /// A node with at most one child is replaced by that child. A node with
    /// two children is replaced by its in-order predecessor (the rightmost
    /// node of its left subtree). Either way the tree is then rebalanced from
    /// the deepest modified node up to the root.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStructure`] if the tree is empty, and
    /// [`Error::StaleNode`] if `node` was already deleted.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::new();
    /// let five = tree.insert(5);
    /// tree.insert(3);
    ///
    /// assert_eq!(tree.delete(five), Ok(5));
    /// assert_eq!(tree.delete(five), Err(Error::StaleNode));
    /// ```
    pub fn delete(&mut self, node: NodeId) -> Result<K, Error> {
        if self.is_empty() {
            return Err(Error::EmptyStructure);
        }
        if self.live(node).is_none() {
            return Err(Error::StaleNode);
        }
        Ok(self.delete_at(node.index))
    }

    /// Returns an iterator over the keys in ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let tree: AvlTree<_> = [4, 2, 3, 1].into_iter().collect();
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4]);
    /// assert_eq!(tree.iter().rev().next(), Some(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn iter(&self) -> Iter<'_, K> {
        Iter {
            nodes: self.nodes(),
        }
    }

    /// Returns an iterator over the node handles in ascending key order.
    #[inline]
    #[must_use]
    pub fn nodes(&self) -> Nodes<'_, K> {
        Nodes {
            tree: self,
            front: self.root.map(|root| self.leftmost(root)),
            back: self.root.map(|root| self.rightmost(root)),
            remaining: self.len(),
        }
    }

    /// Lists every `(parent, child)` pair of the tree in pre-order, left child
    /// before right child.
    ///
    /// This is the edge list a graph renderer needs to draw the tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let tree: AvlTree<_> = [2, 1, 3].into_iter().collect();
    /// assert_eq!(tree.edges(), vec![(&2, &1), (&2, &3)]);
    /// ```
    #[must_use]
    pub fn edges(&self) -> Vec<(&K, &K)> {
        let mut edges = Vec::with_capacity(self.len().saturating_sub(1));
        let mut stack = Vec::new();
        if let Some(root) = self.root {
            self.push_child_edges(root, &mut stack);
        }
        while let Some((parent, child)) = stack.pop() {
            edges.push((&self.nodes[parent].key, &self.nodes[child].key));
            self.push_child_edges(child, &mut stack);
        }
        edges
    }

    /// Right edge first, so that the left subtree is emitted first.
    fn push_child_edges(&self, index: usize, stack: &mut Vec<(usize, usize)>) {
        let node = &self.nodes[index];
        for child in [node.right, node.left].into_iter().flatten() {
            stack.push((index, child));
        }
    }

    // /////////////////////////////
    // Navigation helpers
    // /////////////////////////////

    fn handle(&self, index: usize) -> NodeId {
        NodeId {
            index,
            stamp: self.nodes[index].stamp,
        }
    }

    /// The node `node` names, if it is still in this tree. A vacated or
    /// reused slot, or a slot of another tree, carries a different stamp.
    fn live(&self, node: NodeId) -> Option<&AvlNode<K>> {
        self.nodes
            .get(node.index)
            .filter(|candidate| candidate.stamp == node.stamp)
    }

    fn height_of(&self, link: Option<usize>) -> usize {
        link.map_or(0, |index| self.nodes[index].height)
    }

    fn left_height(&self, index: usize) -> usize {
        self.height_of(self.nodes[index].left)
    }

    fn right_height(&self, index: usize) -> usize {
        self.height_of(self.nodes[index].right)
    }

    #[expect(
        clippy::as_conversions,
        clippy::cast_possible_wrap,
        reason = "AVL heights are bounded by 1.44 log2(len) and always fit in an isize"
    )]
    fn balance(&self, index: usize) -> isize {
        self.left_height(index) as isize - self.right_height(index) as isize
    }

    fn update_height(&mut self, index: usize) {
        let height = 1 + self.left_height(index).max(self.right_height(index));
        self.nodes[index].height = height;
    }

    fn leftmost(&self, mut index: usize) -> usize {
        while let Some(left) = self.nodes[index].left {
            index = left;
        }
        index
    }

    fn rightmost(&self, mut index: usize) -> usize {
        while let Some(right) = self.nodes[index].right {
            index = right;
        }
        index
    }

    fn successor(&self, index: usize) -> Option<usize> {
        if let Some(right) = self.nodes[index].right {
            return Some(self.leftmost(right));
        }
        let mut child = index;
        let mut parent = self.nodes[index].parent;
        while let Some(p) = parent {
            if self.nodes[p].left == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    fn predecessor(&self, index: usize) -> Option<usize> {
        if let Some(left) = self.nodes[index].left {
            return Some(self.rightmost(left));
        }
        let mut child = index;
        let mut parent = self.nodes[index].parent;
        while let Some(p) = parent {
            if self.nodes[p].right == Some(child) {
                return Some(p);
            }
            child = p;
            parent = self.nodes[p].parent;
        }
        None
    }

    // /////////////////////////////
    // Pointer manipulation
    // /////////////////////////////

    fn set_left(&mut self, parent: usize, child: Option<usize>) {
        self.nodes[parent].left = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(parent);
        }
    }

    fn set_right(&mut self, parent: usize, child: Option<usize>) {
        self.nodes[parent].right = child;
        if let Some(child) = child {
            self.nodes[child].parent = Some(parent);
        }
    }

    /// Puts `new` where `old` used to hang below `parent` (or at the root when
    /// `parent` is `None`).
    fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => {
                self.root = new;
                if let Some(new) = new {
                    self.nodes[new].parent = None;
                }
            }
            Some(parent) if self.nodes[parent].left == Some(old) => self.set_left(parent, new),
            Some(parent) => {
                assert_eq!(
                    self.nodes[parent].right,
                    Some(old),
                    "node {old} is not a child of {parent}"
                );
                self.set_right(parent, new);
            }
        }
    }

    /// Rotates `x` down to the left, lifting its right child. Heights are left
    /// for the caller to refresh.
    fn rotate_left(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].right else {
            unreachable!("left rotation at node {x} without a right child")
        };
        let inner = self.nodes[y].left;
        self.set_right(x, inner);
        self.set_left(y, Some(x));
        y
    }

    /// Rotates `x` down to the right, lifting its left child. Heights are left
    /// for the caller to refresh.
    fn rotate_right(&mut self, x: usize) -> usize {
        let Some(y) = self.nodes[x].left else {
            unreachable!("right rotation at node {x} without a left child")
        };
        let inner = self.nodes[y].right;
        self.set_left(x, inner);
        self.set_right(y, Some(x));
        y
    }

    /// Applies `rotation` at `node`, splices the new local root into the
    /// place `node` occupied and refreshes the heights of the rotated subtree.
    fn rotate(&mut self, node: usize, rotation: Rotation) -> usize {
        let parent = self.nodes[node].parent;
        let subtree = match rotation {
            Rotation::Left => self.rotate_left(node),
            Rotation::Right => self.rotate_right(node),
            Rotation::LeftRight => {
                let Some(left) = self.nodes[node].left else {
                    unreachable!("left-right rotation at node {node} without a left child")
                };
                let lifted = self.rotate_left(left);
                self.set_left(node, Some(lifted));
                self.rotate_right(node)
            }
            Rotation::RightLeft => {
                let Some(right) = self.nodes[node].right else {
                    unreachable!("right-left rotation at node {node} without a right child")
                };
                let lifted = self.rotate_right(right);
                self.set_right(node, Some(lifted));
                self.rotate_left(node)
            }
        };
        self.replace_child(parent, node, Some(subtree));

        let children = [self.nodes[subtree].left, self.nodes[subtree].right];
        for child in children.into_iter().flatten() {
            self.update_height(child);
        }
        self.update_height(subtree);
        subtree
    }

    /// Picks the rotation restoring balance at `node`, or `None` if `node` is
    /// balanced. Ties in the child favour the single rotation.
    fn select_rotation(&self, node: usize) -> Option<Rotation> {
        let balance = self.balance(node);
        debug_assert!(
            (-2..=2).contains(&balance),
            "balance factor {balance} at node {node} escaped rebalancing"
        );
        match balance {
            -1..=1 => None,
            b if b < 0 => {
                let Some(right) = self.nodes[node].right else {
                    unreachable!("right-heavy node {node} without a right child")
                };
                if self.right_height(right) >= self.left_height(right) {
                    Some(Rotation::Left)
                } else {
                    Some(Rotation::RightLeft)
                }
            }
            _ => {
                let Some(left) = self.nodes[node].left else {
                    unreachable!("left-heavy node {node} without a left child")
                };
                if self.left_height(left) >= self.right_height(left) {
                    Some(Rotation::Right)
                } else {
                    Some(Rotation::LeftRight)
                }
            }
        }
    }

    /// Walks from `start` up to the root, refreshing heights and rotating
    /// wherever a node is out of balance.
    fn restructure(&mut self, start: usize) {
        let mut current = Some(start);
        while let Some(node) = current {
            // Parent from before any rotation: `node` may move down, but
            // the walk carries on above the rotated subtree.
            let parent = self.nodes[node].parent;
            self.update_height(node);
            if let Some(rotation) = self.select_rotation(node) {
                trace!("rotation {rotation:?} at node {node}");
                self.rotate(node, rotation);
            }
            current = parent;
        }
    }

    fn delete_at(&mut self, target: usize) -> K {
        let AvlNode {
            parent,
            left,
            right,
            ..
        } = self.nodes[target];

        let rebalance_from = match (left, right) {
            (None, child) | (child, None) => {
                trace!("deleting node {target} with at most one child");
                self.replace_child(parent, target, child);
                parent
            }
            (Some(left), Some(right)) => {
                let substitute = self.rightmost(left);
                trace!("deleting node {target} using predecessor {substitute}");
                let deepest = if substitute == left {
                    // The predecessor keeps its own left subtree.
                    substitute
                } else {
                    let Some(substitute_parent) = self.nodes[substitute].parent else {
                        unreachable!("predecessor {substitute} below {left} has no parent")
                    };
                    let orphan = self.nodes[substitute].left;
                    self.replace_child(Some(substitute_parent), substitute, orphan);
                    self.set_left(substitute, Some(left));
                    substitute_parent
                };
                self.set_right(substitute, Some(right));
                self.replace_child(parent, target, Some(substitute));
                Some(deepest)
            }
        };

        let node = self.nodes.remove(target);
        if let Some(start) = rebalance_from {
            self.restructure(start);
        }
        node.key
    }
}

impl<K> AvlTree<K>
where
    K: Ord,
{
    /// Inserts `key` and returns a handle to its node.
    ///
    /// The key is attached as a new leaf (equal keys go to the right), then
    /// the tree is rebalanced from the leaf's parent up to the root.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// let node = tree.insert(1);
    /// tree.insert(2);
    /// tree.insert(3);
    ///
    /// assert_eq!(tree.key(node), Some(&1));
    /// // The third insertion rotated 2 up to the root.
    /// assert_eq!(tree.root().and_then(|root| tree.key(root)), Some(&2));
    /// ```
    pub fn insert(&mut self, key: K) -> NodeId {
        let Some(mut current) = self.root else {
            let index = self.nodes.insert(AvlNode::leaf(key, None));
            self.root = Some(index);
            return self.handle(index);
        };

        let go_left = loop {
            let node = &self.nodes[current];
            let go_left = key < node.key;
            let next = if go_left { node.left } else { node.right };
            match next {
                Some(child) => current = child,
                None => break go_left,
            }
        };

        let index = self.nodes.insert(AvlNode::leaf(key, Some(current)));
        if go_left {
            self.nodes[current].left = Some(index);
        } else {
            self.nodes[current].right = Some(index);
        }
        self.restructure(current);
        self.handle(index)
    }

    /// Looks up `key` and returns a handle to a node holding it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyStructure`] if the tree is empty. A key that is simply
    /// absent is reported as `Ok(None)`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::{AvlTree, Error};
    ///
    /// let mut tree = AvlTree::new();
    /// assert_eq!(tree.search(&1), Err(Error::EmptyStructure));
    ///
    /// tree.extend([1, 2, 3]);
    /// let node = tree.search(&2)?.expect("2 was inserted");
    /// assert_eq!(tree.key(node), Some(&2));
    /// assert_eq!(tree.search(&4)?, None);
    /// # Ok::<(), Error>(())
    /// ```
    pub fn search(&self, key: &K) -> Result<Option<NodeId>, Error> {
        if self.is_empty() {
            return Err(Error::EmptyStructure);
        }
        Ok(self.find(key).map(|index| self.handle(index)))
    }

    /// Returns `true` if the tree holds `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let mut tree = AvlTree::new();
    /// assert!(!tree.contains(&4));
    /// tree.insert(4);
    /// assert!(tree.contains(&4));
    /// ```
    #[inline]
    #[must_use]
    pub fn contains(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Removes one occurrence of `key`, returning `false` if it was absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use skiptree::AvlTree;
    ///
    /// let mut tree: AvlTree<_> = (0..10).collect();
    /// assert!(tree.remove(&4));
    /// assert!(!tree.remove(&4));
    /// assert_eq!(tree.len(), 9);
    /// ```
    pub fn remove(&mut self, key: &K) -> bool {
        match self.find(key) {
            Some(index) => {
                self.delete_at(index);
                true
            }
            None => false,
        }
    }

    /// Verifies the structural invariants of the tree: cached heights, AVL
    /// balance, a sorted in-order sequence, parent back-links and the element
    /// count.
    ///
    /// Equal keys may sit on either side of each other after rotations, so
    /// ordering is checked as `left <= node <= right` rather than strictly.
    ///
    /// This walks the entire tree and is meant for tests and debugging.
    ///
    /// # Errors
    ///
    /// The first [`InvariantViolation`] found.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        let Some(root) = self.root else {
            return match self.len() {
                0 => Ok(()),
                stored => Err(InvariantViolation::Length { stored, found: 0 }),
            };
        };
        if self.nodes[root].parent.is_some() {
            return Err(InvariantViolation::ParentLink { node: root });
        }
        let mut found = 0;
        self.check_subtree(root, &mut found)?;
        if found != self.len() {
            return Err(InvariantViolation::Length {
                stored: self.len(),
                found,
            });
        }
        Ok(())
    }

    /// Checks the subtree at `index`, returning its true height.
    fn check_subtree(&self, index: usize, found: &mut usize) -> Result<usize, InvariantViolation> {
        *found += 1;
        let node = &self.nodes[index];
        let mut heights = [0; 2];
        for (height, child) in iter::zip(&mut heights, [node.left, node.right]) {
            let Some(child) = child else { continue };
            if self.nodes[child].parent != Some(index) {
                return Err(InvariantViolation::ParentLink { node: child });
            }
            *height = self.check_subtree(child, found)?;
        }

        // Rotations may move equal keys to either side, so only the in-order
        // sequence is checked.
        if let Some(left) = node.left {
            if self.nodes[self.rightmost(left)].key > node.key {
                return Err(InvariantViolation::Order { node: index });
            }
        }
        if let Some(right) = node.right {
            if self.nodes[self.leftmost(right)].key < node.key {
                return Err(InvariantViolation::Order { node: index });
            }
        }

        let [left, right] = heights;
        let expected = 1 + left.max(right);
        if node.height != expected {
            return Err(InvariantViolation::Height {
                node: index,
                cached: node.height,
                expected,
            });
        }
        let balance = self.balance(index);
        if !(-1..=1).contains(&balance) {
            return Err(InvariantViolation::Balance {
                node: index,
                balance,
            });
        }
        Ok(expected)
    }

    fn find(&self, key: &K) -> Option<usize> {
        let mut current = self.root;
        while let Some(index) = current {
            let node = &self.nodes[index];
            current = match key.cmp(&node.key) {
                Ordering::Equal => return Some(index),
                Ordering::Less => node.left,
                Ordering::Greater => node.right,
            };
        }
        None
    }
}

// ///////////////////////////////////////////////
// Trait implementation
// ///////////////////////////////////////////////

impl<K> Default for AvlTree<K> {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

/// The clone gets freshly stamped nodes, so handles into the original are
/// stale in the clone.
impl<K> Clone for AvlTree<K>
where
    K: Clone,
{
    fn clone(&self) -> Self {
        let mut nodes = self.nodes.clone();
        for (_, node) in &mut nodes {
            node.stamp = next_stamp();
        }
        AvlTree {
            nodes,
            root: self.root,
        }
    }
}

impl<K> fmt::Debug for AvlTree<K>
where
    K: fmt::Debug,
{
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<K> Extend<K> for AvlTree<K>
where
    K: Ord,
{
    #[inline]
    fn extend<I: IntoIterator<Item = K>>(&mut self, iterable: I) {
        for key in iterable {
            self.insert(key);
        }
    }
}

impl<K> FromIterator<K> for AvlTree<K>
where
    K: Ord,
{
    #[inline]
    fn from_iter<I: IntoIterator<Item = K>>(iterable: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iterable);
        tree
    }
}

impl<'a, K> IntoIterator for &'a AvlTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    #[inline]
    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

// ///////////////////////////////////////////////
// Iterators
// ///////////////////////////////////////////////

/// In-order iterator over the node handles of an [`AvlTree`].
pub struct Nodes<'a, K> {
    tree: &'a AvlTree<K>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<K> Iterator for Nodes<'_, K> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(current);
        Some(self.tree.handle(current))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> DoubleEndedIterator for Nodes<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(current);
        Some(self.tree.handle(current))
    }
}

impl<K> ExactSizeIterator for Nodes<'_, K> {}

/// In-order iterator over the keys of an [`AvlTree`].
pub struct Iter<'a, K> {
    nodes: Nodes<'a, K>,
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let tree = self.nodes.tree;
        self.nodes.next().map(|node| &tree.nodes[node.index].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<K> DoubleEndedIterator for Iter<'_, K> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let tree = self.nodes.tree;
        self.nodes.next_back().map(|node| &tree.nodes[node.index].key)
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}

// ////////////////////////////////////////////////////////////////////////////
// Tests
// ////////////////////////////////////////////////////////////////////////////

#[cfg(test)]
mod tests {
    use anyhow::{Context, Result};
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use rstest::rstest;

    use super::AvlTree;
    use crate::error::Error;

    fn keys(tree: &AvlTree<i32>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    fn root_key(tree: &AvlTree<i32>) -> Option<i32> {
        tree.root().and_then(|root| tree.key(root)).copied()
    }

    fn render_edges(tree: &AvlTree<i32>) -> String {
        tree.edges()
            .into_iter()
            .map(|(parent, child)| format!("{parent} -> {child}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn empty() {
        let mut tree: AvlTree<i32> = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.height(), 0);
        assert_eq!(tree.root(), None);
        assert_eq!(tree.first(), None);
        assert_eq!(tree.search(&1), Err(Error::EmptyStructure));
        assert!(!tree.contains(&1));
        assert!(!tree.remove(&1));
        assert_eq!(tree.iter().next(), None);
        assert!(tree.edges().is_empty());
        assert_eq!(tree.check_invariants(), Ok(()));
    }

    #[test]
    fn scenario_inserts_then_delete_with_two_children() -> Result<()> {
        let mut tree = AvlTree::new();
        for key in [50, 30, 70, 20, 40, 60, 80, 10] {
            tree.insert(key);
            tree.check_invariants()?;
            let root = tree.root().context("tree has a root")?;
            let balance = tree.balance_factor(root).context("root is live")?;
            assert!((-1..=1).contains(&balance));
        }
        assert_eq!(keys(&tree), vec![10, 20, 30, 40, 50, 60, 70, 80]);
        insta::assert_snapshot!(render_edges(&tree), @r"
        50 -> 30
        30 -> 20
        20 -> 10
        30 -> 40
        50 -> 70
        70 -> 60
        70 -> 80
        ");

        // 30's predecessor is its own left child 20, which must keep 10.
        let thirty = tree.search(&30)?.context("30 is present")?;
        assert_eq!(tree.delete(thirty), Ok(30));
        tree.check_invariants()?;
        assert_eq!(keys(&tree), vec![10, 20, 40, 50, 60, 70, 80]);
        insta::assert_snapshot!(render_edges(&tree), @r"
        50 -> 20
        20 -> 10
        20 -> 40
        50 -> 70
        70 -> 60
        70 -> 80
        ");
        Ok(())
    }

    #[rstest]
    #[case::left(&[1, 2, 3])]
    #[case::right(&[3, 2, 1])]
    #[case::left_right(&[3, 1, 2])]
    #[case::right_left(&[1, 3, 2])]
    fn each_rotation_lifts_the_middle_key(#[case] input: &[i32]) -> Result<()> {
        let tree: AvlTree<_> = input.iter().copied().collect();
        tree.check_invariants()?;
        assert_eq!(root_key(&tree), Some(2));
        assert_eq!(tree.height(), 2);
        assert_eq!(render_edges(&tree), "2 -> 1\n2 -> 3");
        Ok(())
    }

    #[test]
    fn rotation_below_the_root_relinks_parent() -> Result<()> {
        // 4 becomes unbalanced (right-heavy) below root 2 after inserting 6.
        let tree: AvlTree<_> = [2, 1, 4, 5, 6].into_iter().collect();
        tree.check_invariants()?;
        assert_eq!(
            render_edges(&tree),
            "2 -> 1\n2 -> 5\n5 -> 4\n5 -> 6"
        );
        let five = tree.search(&5)?.context("5 is present")?;
        assert_eq!(tree.parent(five).and_then(|p| tree.key(p)), Some(&2));
        Ok(())
    }

    #[test]
    fn deletion_tie_uses_single_rotation() -> Result<()> {
        let mut tree: AvlTree<_> = [2, 1, 4, 3, 5].into_iter().collect();
        assert!(tree.remove(&1));
        tree.check_invariants()?;
        assert_eq!(root_key(&tree), Some(4));
        assert_eq!(render_edges(&tree), "4 -> 2\n2 -> 3\n4 -> 5");
        Ok(())
    }

    #[test]
    fn delete_leaf_and_single_child() -> Result<()> {
        let mut tree: AvlTree<_> = [20, 10, 30, 25].into_iter().collect();
        // 30 has only a left child.
        assert!(tree.remove(&30));
        tree.check_invariants()?;
        assert_eq!(render_edges(&tree), "20 -> 10\n20 -> 25");

        // 10 is a leaf.
        assert!(tree.remove(&10));
        tree.check_invariants()?;
        assert_eq!(render_edges(&tree), "20 -> 25");

        // The root has only a right child.
        assert!(tree.remove(&20));
        tree.check_invariants()?;
        assert_eq!(root_key(&tree), Some(25));
        assert_eq!(tree.parent(tree.root().context("root")?), None);

        assert!(tree.remove(&25));
        assert!(tree.is_empty());
        tree.check_invariants()?;
        Ok(())
    }

    #[test]
    fn delete_with_deep_predecessor() -> Result<()> {
        let mut tree: AvlTree<_> = [50, 30, 70, 20, 40, 60, 80, 35, 45].into_iter().collect();
        tree.check_invariants()?;
        // Predecessor of 50 is 45, the rightmost node of the left subtree.
        let root = tree.root().context("root")?;
        assert_eq!(tree.key(root), Some(&50));
        assert_eq!(tree.delete(root), Ok(50));
        tree.check_invariants()?;
        assert_eq!(root_key(&tree), Some(45));
        assert_eq!(keys(&tree), vec![20, 30, 35, 40, 45, 60, 70, 80]);
        Ok(())
    }

    #[test]
    fn stale_handles_are_rejected() {
        let mut tree = AvlTree::new();
        let one = tree.insert(1);
        let two = tree.insert(2);
        assert_eq!(tree.delete(one), Ok(1));
        assert_eq!(tree.key(one), None);
        assert_eq!(tree.left(one), None);
        assert_eq!(tree.balance_factor(one), None);
        assert_eq!(tree.delete(one), Err(Error::StaleNode));

        // The slot is reused, but the old handle stays stale.
        let three = tree.insert(3);
        assert_eq!(three.index, one.index);
        assert_eq!(tree.delete(one), Err(Error::StaleNode));
        assert_eq!(tree.key(three), Some(&3));

        assert_eq!(tree.delete(two), Ok(2));
        assert_eq!(tree.delete(three), Ok(3));
        assert_eq!(tree.delete(three), Err(Error::EmptyStructure));
    }

    #[test]
    fn handles_from_another_tree_are_rejected() -> Result<()> {
        let mut a = AvlTree::new();
        let from_a = a.insert(1);

        let mut b = AvlTree::new();
        b.insert(99);
        b.insert(100);
        assert_eq!(from_a.index, b.root().context("b has a root")?.index);

        assert_eq!(b.key(from_a), None);
        assert_eq!(b.parent(from_a), None);
        assert_eq!(b.delete(from_a), Err(Error::StaleNode));
        assert_eq!(keys(&b), vec![99, 100]);
        b.check_invariants()?;

        assert_eq!(a.delete(from_a), Ok(1));
        Ok(())
    }

    #[test]
    fn clones_do_not_share_handles() -> Result<()> {
        let mut tree = AvlTree::new();
        let one = tree.insert(1);
        tree.insert(2);

        let mut copy = tree.clone();
        assert_eq!(keys(&copy), vec![1, 2]);
        assert_eq!(copy.delete(one), Err(Error::StaleNode));
        let copied_one = copy.search(&1)?.context("1 is in the clone")?;
        assert_eq!(copy.delete(copied_one), Ok(1));
        copy.check_invariants()?;

        assert_eq!(tree.delete(one), Ok(1));
        assert_eq!(tree.delete(copied_one), Err(Error::StaleNode));
        Ok(())
    }

    #[test]
    fn duplicates_are_kept() -> Result<()> {
        let mut tree: AvlTree<_> = [5, 5, 3, 5, 7].into_iter().collect();
        tree.check_invariants()?;
        assert_eq!(keys(&tree), vec![3, 5, 5, 5, 7]);
        assert!(tree.remove(&5));
        assert!(tree.remove(&5));
        tree.check_invariants()?;
        assert_eq!(keys(&tree), vec![3, 5, 7]);
        Ok(())
    }

    #[rstest]
    fn sequential(#[values(1, 2, 10, 100, 1_000)] size: i32) -> Result<()> {
        let ascending: AvlTree<_> = (0..size).collect();
        let descending: AvlTree<_> = (0..size).rev().collect();
        for tree in [&ascending, &descending] {
            tree.check_invariants()?;
            assert_eq!(keys(tree), (0..size).collect::<Vec<_>>());
            // An AVL tree with n nodes is at most 1.44 log2(n + 2) high.
            let bound = 1.45 * f64::from(size + 2).log2();
            #[expect(clippy::cast_precision_loss, reason = "small heights")]
            let height = tree.height() as f64;
            assert!(height <= bound, "height {height} exceeds {bound}");
        }
        Ok(())
    }

    #[test]
    fn iterators() {
        let tree: AvlTree<_> = (0..100).rev().collect();
        assert_eq!(tree.iter().len(), 100);
        assert!(tree.iter().copied().eq(0..100));
        assert!(tree.iter().rev().copied().eq((0..100).rev()));

        let mut iter = tree.iter();
        for i in 0..50 {
            assert_eq!(iter.next(), Some(&i));
            assert_eq!(iter.next_back(), Some(&(99 - i)));
        }
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);

        let handles: Vec<_> = tree.nodes().collect();
        assert_eq!(handles.len(), 100);
        assert_eq!(tree.key(handles[42]), Some(&42));
        assert_eq!((&tree).into_iter().count(), 100);
    }

    #[test]
    fn node_accessors() -> Result<()> {
        let tree: AvlTree<_> = [2, 1, 3, 4].into_iter().collect();
        let root = tree.root().context("root")?;
        assert_eq!(tree.node_height(root), Some(3));
        assert_eq!(tree.balance_factor(root), Some(-1));
        let right = tree.right(root).context("right child")?;
        assert_eq!(tree.key(right), Some(&3));
        assert_eq!(tree.parent(right), Some(root));
        assert_eq!(tree.left(right), None);
        assert_eq!(tree.first(), Some(&1));
        assert_eq!(tree.last(), Some(&4));
        Ok(())
    }

    #[test]
    fn debug_and_clear() {
        let mut tree: AvlTree<_> = [3, 1, 2].into_iter().collect();
        assert_eq!(format!("{tree:?}"), "[1, 2, 3]");
        let handle = tree.root();
        tree.clear();
        assert!(tree.is_empty());
        assert_eq!(format!("{tree:?}"), "[]");
        assert!(handle.is_some_and(|h| tree.key(h).is_none()));
    }

    #[derive(Debug, Clone)]
    enum Op {
        Insert(i32),
        Remove(i32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => (0..64i32).prop_map(Op::Insert),
            2 => (0..64i32).prop_map(Op::Remove),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn matches_sorted_model(ops in prop::collection::vec(op(), 0..200)) {
            let mut tree = AvlTree::new();
            let mut model: Vec<i32> = Vec::new();
            for op in ops {
                match op {
                    Op::Insert(key) => {
                        tree.insert(key);
                        let at = model.partition_point(|k| *k < key);
                        model.insert(at, key);
                    }
                    Op::Remove(key) => {
                        let expected = model.iter().position(|k| *k == key);
                        prop_assert_eq!(tree.remove(&key), expected.is_some());
                        if let Some(at) = expected {
                            model.remove(at);
                        }
                    }
                }
                prop_assert_eq!(tree.check_invariants(), Ok(()));
            }
            prop_assert_eq!(keys(&tree), model.clone());
            prop_assert_eq!(tree.len(), model.len());
        }

        #[test]
        fn insert_then_delete_round_trips(
            initial in prop::collection::vec(0..1_000i32, 0..100),
            key in 0..1_000i32,
        ) {
            let mut tree: AvlTree<_> = initial.into_iter().collect();
            let before = keys(&tree);
            let node = tree.insert(key);
            prop_assert_eq!(tree.delete(node), Ok(key));
            prop_assert_eq!(tree.check_invariants(), Ok(()));
            prop_assert_eq!(keys(&tree), before);
        }
    }
}

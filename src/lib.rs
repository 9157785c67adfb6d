//! Two ordered collections which keep their elements sorted as they are
//! inserted and removed: a self-balancing [`AvlTree`] and a
//! [`RankedSkipList`] with order-statistic queries.
//!
//! The AVL tree keeps the heights of every node's two subtrees within one of
//! each other, restoring the property with rotations after each insertion and
//! deletion, so that lookups are `O(log(n))` in the worst case.
//!
//! ```text
//!         50                      50
//!        /  \                    /  \
//!      30    70    delete 30   20    70
//!     /  \   / \      =>      /  \   / \
//!   20   40 60  80          10   40 60  80
//!   /
//! 10
//! ```
//!
//! The skiplist stacks sparser and sparser linked lists on top of a sorted
//! base list. Each link records how many base-level positions it skips over,
//! which is what lets [`RankedSkipList::element_at`] find the `i`-th smallest
//! value in `O(log(n))` on average.
//!
//! ```text
//! -∞ ----------------------------> 8 ---> +∞
//! -∞ --------------> 4 ---> 5 ---> 8 ---> +∞
//! -∞ ---> 1 ---> 3 ---> 4 ---> 5 ---> 8 ---> +∞
//! ```
//!
//! Both structures accept duplicate elements and rely on `Ord` being a total
//! order: an ordering which is not consistent results in misplaced elements
//! (though never in undefined behaviour).
//!
//! # Examples
//!
//! ```
//! use skiptree::{AvlTree, RankedSkipList};
//!
//! let tree: AvlTree<_> = [5, 1, 4, 2, 3].into_iter().collect();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3, 4, 5]);
//! assert_eq!(tree.height(), 3);
//!
//! let list: RankedSkipList<_> = [5, 1, 4, 2, 3].into_iter().collect();
//! assert_eq!(list.get(2), Some(&3));
//! ```

pub mod avl_tree;
mod avlnode;
pub mod error;
pub mod level_generator;
pub mod ranked_skiplist;
mod skiplevel;

pub use avl_tree::AvlTree;
pub use avlnode::NodeId;
pub use error::{Error, InvariantViolation};
pub use level_generator::{Geometric, GeometricError, LevelGenerator};
pub use ranked_skiplist::{Entry, Key, LevelEntry, Predecessor, RankedSkipList};

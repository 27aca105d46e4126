use super::{TransposeTree, NIL};
use crate::traits::NodeLocator;
use std::cmp::Ordering;

/// Resumable in-order traversal over node ordinals.
///
/// The walker keeps a stack of pending right-subtree anchors, O(log n)
/// entries for a balanced tree. It holds no borrow of the tree; each
/// [`next_index`](Walker::next_index) call is handed the tree again, so a
/// caller can interleave other reads. The population is snapshotted at
/// construction, and a walker whose tree has grown since fails fast
/// rather than yield from a shape it no longer understands.
pub struct Walker {
    stack: Vec<usize>,
    expected: usize,
}

impl Walker {
    pub(crate) fn new(tree: &TransposeTree) -> Self {
        let mut walker = Walker {
            stack: Vec::new(),
            expected: tree.len(),
        };
        walker.dive(tree, tree.root_link());
        walker
    }

    /// Push `from` and everything down its left spine.
    fn dive(&mut self, tree: &TransposeTree, mut cur: i64) {
        while cur != NIL {
            self.stack.push(cur as usize);
            cur = tree.left_link(cur as usize);
        }
    }

    /// The next ordinal in key order, or `None` when exhausted.
    ///
    /// # Panics
    /// If the tree's population has changed since this walker was
    /// created.
    pub fn next_index(&mut self, tree: &TransposeTree) -> Option<usize> {
        if tree.len() != self.expected {
            panic!(
                "tree population changed during iteration ({} -> {})",
                self.expected,
                tree.len()
            );
        }
        let node = self.stack.pop()?;
        self.dive(tree, tree.right_link(node));
        Some(node)
    }
}

/// Like [`Walker`], but biased by a [`NodeLocator`]: the dive skips
/// subtrees the locator places outside its `Equal` interval, descending
/// left on a match to reach the smallest matching key first. Only
/// matching nodes are ever stacked, so the walk yields exactly the
/// matching range in ascending order.
pub struct MatchingWalker<L> {
    stack: Vec<usize>,
    expected: usize,
    locator: L,
}

impl<L: NodeLocator> MatchingWalker<L> {
    pub(crate) fn new(tree: &TransposeTree, locator: L) -> Self {
        let mut walker = MatchingWalker {
            stack: Vec::new(),
            expected: tree.len(),
            locator,
        };
        walker.dive(tree, tree.root_link());
        walker
    }

    fn dive(&mut self, tree: &TransposeTree, mut cur: i64) {
        while cur != NIL {
            let node = cur as usize;
            cur = match self.locator.compare_with(node) {
                Ordering::Less => tree.left_link(node),
                Ordering::Greater => tree.right_link(node),
                Ordering::Equal => {
                    self.stack.push(node);
                    tree.left_link(node)
                }
            };
        }
    }

    /// The next matching ordinal in key order, or `None`.
    ///
    /// # Panics
    /// If the tree's population has changed since this walker was
    /// created.
    pub fn next_index(&mut self, tree: &TransposeTree) -> Option<usize> {
        if tree.len() != self.expected {
            panic!(
                "tree population changed during iteration ({} -> {})",
                self.expected,
                tree.len()
            );
        }
        let node = self.stack.pop()?;
        self.dive(tree, tree.right_link(node));
        Some(node)
    }
}

/// Borrowing iterator adapter over [`Walker`].
pub struct Indexes<'a> {
    tree: &'a TransposeTree,
    walker: Walker,
}

impl<'a> Indexes<'a> {
    pub(crate) fn new(tree: &'a TransposeTree) -> Self {
        Indexes {
            walker: Walker::new(tree),
            tree,
        }
    }
}

impl Iterator for Indexes<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.walker.next_index(self.tree)
    }
}

/// Borrowing iterator adapter over [`MatchingWalker`].
pub struct MatchingIndexes<'a, L> {
    tree: &'a TransposeTree,
    walker: MatchingWalker<L>,
}

impl<'a, L: NodeLocator> MatchingIndexes<'a, L> {
    pub(crate) fn new(tree: &'a TransposeTree, locator: L) -> Self {
        MatchingIndexes {
            walker: MatchingWalker::new(tree, locator),
            tree,
        }
    }
}

impl<L: NodeLocator> Iterator for MatchingIndexes<'_, L> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        self.walker.next_index(self.tree)
    }
}

use crate::bitset::BitSet;
use crate::error::{Error, Result};
use crate::inflatable::{bitwise_growth, InflatableBlock};
use crate::traits::{Block, NodeComparator, NodeLocator};
use either::Either;
use std::cmp::Ordering;
use std::fmt;

mod walker;

pub use walker::{Indexes, MatchingIndexes, MatchingWalker, Walker};

/// Absence of a child, encoded as -1 at the block interface. The
/// `UnsignedOrNull` bit variant packs it as the all-ones pattern, so NIL
/// costs no extra width in the child columns.
pub const NIL: i64 = -1;

/// Storage strategy for the per-node child-index columns.
pub type ColumnFactory = fn(capacity: usize) -> InflatableBlock;

fn bitwise_columns(capacity: usize) -> InflatableBlock {
    InflatableBlock::with_factory(capacity, bitwise_growth)
}

/// Left-leaning 2-3 red-black tree stored column-wise: instead of one
/// struct per node there are three parallel per-node sequences (left
/// child, right child, colour), indexed by node ordinal. The child
/// columns are [`InflatableBlock`]s, so index width grows with the
/// population; the colour column is one packed bit per node (set =
/// black).
///
/// The tree is externally keyed. Callers keep keys and values in their
/// own parallel arrays: before each insert they write the key at
/// [`insertion_point`](TransposeTree::insertion_point), then splice that
/// slot in with [`insert`](TransposeTree::insert), passing a
/// [`NodeComparator`] over slot ordinals. Searches go through
/// [`NodeLocator`] callbacks the same way. The tree itself never reads a
/// key.
///
/// There is no deletion; ordinals are stable for the life of the tree.
#[derive(Clone)]
pub struct TransposeTree {
    /// Number of live node slots.
    population: usize,
    /// Ordinal of the root, or [`NIL`].
    root: i64,
    left: InflatableBlock,
    right: InflatableBlock,
    /// Bit set means black; nodes start red.
    black: BitSet,
}

impl TransposeTree {
    // CONSTRUCTORS

    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_column_factory(capacity, bitwise_columns)
    }

    pub fn with_column_factory(capacity: usize, factory: ColumnFactory) -> Self {
        TransposeTree {
            population: 0,
            root: NIL,
            left: factory(capacity),
            right: factory(capacity),
            black: BitSet::with_capacity(capacity),
        }
    }

    // POPULATION

    #[inline]
    pub fn len(&self) -> usize {
        self.population
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.population == 0
    }

    /// The ordinal the next inserted node will occupy. Callers write
    /// their key (and value) at this slot before calling
    /// [`insert`](TransposeTree::insert).
    #[inline]
    pub fn insertion_point(&self) -> usize {
        self.population
    }

    pub fn root(&self) -> Option<usize> {
        if self.root == NIL {
            None
        } else {
            Some(self.root as usize)
        }
    }

    // LINKS

    pub(crate) fn root_link(&self) -> i64 {
        self.root
    }

    #[inline]
    pub(crate) fn left_link(&self, node: usize) -> i64 {
        self.left.get(node)
    }

    #[inline]
    pub(crate) fn right_link(&self, node: usize) -> i64 {
        self.right.get(node)
    }

    fn set_left(&mut self, node: usize, child: i64) {
        self.left
            .set(node, child)
            .expect("child column write cannot fail after inflation");
    }

    fn set_right(&mut self, node: usize, child: i64) {
        self.right
            .set(node, child)
            .expect("child column write cannot fail after inflation");
    }

    // COLOURS

    #[inline]
    fn is_red(&self, link: i64) -> bool {
        // NIL counts as black.
        link != NIL && !self.black.contains(link as usize)
    }

    fn copy_colour(&mut self, from: usize, to: usize) {
        if self.black.contains(from) {
            self.black.set(to);
        } else {
            self.black.clear(to);
        }
    }

    fn toggle_colour(&mut self, node: usize) {
        if self.black.contains(node) {
            self.black.clear(node);
        } else {
            self.black.set(node);
        }
    }

    // INSERT

    /// Splice the slot at [`insertion_point`](TransposeTree::insertion_point)
    /// into the ordered structure and increment the population.
    ///
    /// The caller must already have written the slot's key into its own
    /// key array; `cmp` must order that slot consistently against every
    /// live node.
    ///
    /// # Errors
    /// [`DuplicateKey`](Error::DuplicateKey) with the existing node's
    /// ordinal when `cmp` reports equality. The population and the tree
    /// shape are unchanged, so the caller's slot is not committed and
    /// will be reused by the next insert; callers typically treat this
    /// as an update cue.
    ///
    /// # Panics
    /// Once the ordinal space is exhausted (`i32::MAX` nodes).
    pub fn insert(&mut self, cmp: &impl NodeComparator) -> Result<()> {
        let node = self.population;
        if node >= i32::MAX as usize {
            panic!("ordinal space exhausted: cannot splice node {node}");
        }
        // The new slot starts as a red leaf.
        self.set_left(node, NIL);
        self.set_right(node, NIL);
        self.black.clear(node);
        if node == 0 {
            self.root = 0;
        } else {
            let root = self.splice(self.root as usize, node, cmp)?;
            self.root = root as i64;
        }
        self.black.set(self.root as usize);
        self.population += 1;
        Ok(())
    }

    /// Recursive descent below `cur`; returns the subroot to write back
    /// into the parent, which rebalancing may have changed.
    fn splice(&mut self, cur: usize, node: usize, cmp: &impl NodeComparator) -> Result<usize> {
        match cmp.compare(node, cur) {
            Ordering::Less => {
                let link = self.left_link(cur);
                if link == NIL {
                    self.set_left(cur, node as i64);
                } else {
                    let sub = self.splice(link as usize, node, cmp)?;
                    self.set_left(cur, sub as i64);
                }
            }
            Ordering::Greater => {
                let link = self.right_link(cur);
                if link == NIL {
                    self.set_right(cur, node as i64);
                } else {
                    let sub = self.splice(link as usize, node, cmp)?;
                    self.set_right(cur, sub as i64);
                }
            }
            Ordering::Equal => return Err(Error::DuplicateKey(cur)),
        }
        Ok(self.rebalance(cur))
    }

    fn rebalance(&mut self, mut node: usize) -> usize {
        if self.is_red(self.right_link(node)) && !self.is_red(self.left_link(node)) {
            node = self.rotate_left(node);
        }
        let left = self.left_link(node);
        if self.is_red(left) && self.is_red(self.left_link(left as usize)) {
            node = self.rotate_right(node);
        }
        if self.is_red(self.left_link(node)) && self.is_red(self.right_link(node)) {
            self.flip_colours(node);
        }
        node
    }

    /// The right child takes `node`'s place and colour; `node` goes red
    /// under it.
    fn rotate_left(&mut self, node: usize) -> usize {
        let pivot = self.right_link(node) as usize;
        self.set_right(node, self.left_link(pivot));
        self.set_left(pivot, node as i64);
        self.copy_colour(node, pivot);
        self.black.clear(node);
        pivot
    }

    fn rotate_right(&mut self, node: usize) -> usize {
        let pivot = self.left_link(node) as usize;
        self.set_left(node, self.right_link(pivot));
        self.set_right(pivot, node as i64);
        self.copy_colour(node, pivot);
        self.black.clear(node);
        pivot
    }

    fn flip_colours(&mut self, node: usize) {
        let left = self.left_link(node) as usize;
        let right = self.right_link(node) as usize;
        self.toggle_colour(node);
        self.toggle_colour(left);
        self.toggle_colour(right);
    }

    // SEARCH

    /// One descent from the root: `Left(node)` on a locator match,
    /// `Right(parent)` when the descent ran off the tree at `parent`.
    fn descend(&self, locator: &impl NodeLocator) -> Option<Either<usize, usize>> {
        let mut cur = self.root;
        if cur == NIL {
            return None;
        }
        loop {
            let node = cur as usize;
            cur = match locator.compare_with(node) {
                Ordering::Equal => return Some(Either::Left(node)),
                Ordering::Less => self.left_link(node),
                Ordering::Greater => self.right_link(node),
            };
            if cur == NIL {
                return Some(Either::Right(node));
            }
        }
    }

    /// Ordinal of the node the locator reports as a match, if any.
    pub fn lookup(&self, locator: &impl NodeLocator) -> Option<usize> {
        self.descend(locator).and_then(Either::left)
    }

    /// Like [`lookup`](TransposeTree::lookup), but on a miss returns the
    /// last visited node (the would-be parent). `None` only for an empty
    /// tree.
    pub fn locate(&self, locator: &impl NodeLocator) -> Option<usize> {
        self.descend(locator).map(Either::into_inner)
    }

    // ITERATION

    /// Detached in-order walker. Prefer
    /// [`all_indexes`](TransposeTree::all_indexes) unless iteration has
    /// to be interleaved with other calls.
    pub fn walker(&self) -> Walker {
        Walker::new(self)
    }

    /// Lazy in-order sequence of all node ordinals.
    pub fn all_indexes(&self) -> Indexes<'_> {
        Indexes::new(self)
    }

    /// Lazy ascending sequence of the ordinals on which `locator`
    /// returns `Equal`. The locator may select a contiguous key range;
    /// exactly the nodes in that range are visited.
    pub fn all_indexes_matching<L: NodeLocator>(&self, locator: L) -> MatchingIndexes<'_, L> {
        MatchingIndexes::new(self, locator)
    }

    // MAINTENANCE

    /// Compact both child columns and the colour column.
    pub fn shrinkwrap(&mut self, room_pct: u32) {
        self.left.shrinkwrap(room_pct);
        self.right.shrinkwrap(room_pct);
        self.black.shrinkwrap(self.population);
    }

    // SELF-CHECK

    /// Assert every structural invariant: root is black, no red node has
    /// a red left child, no red edge leans right, every root-to-NIL path
    /// crosses the same number of black nodes, and the in-order walk is
    /// strictly ascending under `cmp` with exactly `len` nodes.
    ///
    /// # Panics
    /// If any invariant is broken.
    pub fn check_invariants(&self, cmp: &impl NodeComparator) {
        if self.root == NIL {
            assert_eq!(self.population, 0, "population without a root");
            return;
        }
        assert!(!self.is_red(self.root), "root must be black");
        self.check_subtree(self.root as usize);
        let mut count = 0;
        let mut prev: Option<usize> = None;
        for node in self.all_indexes() {
            if let Some(prev) = prev {
                assert_eq!(
                    cmp.compare(prev, node),
                    Ordering::Less,
                    "in-order walk not ascending at node {node}"
                );
            }
            prev = Some(node);
            count += 1;
        }
        assert_eq!(count, self.population, "in-order walk misses nodes");
    }

    /// Returns the black height of the subtree at `node`.
    fn check_subtree(&self, node: usize) -> usize {
        let left = self.left_link(node);
        let right = self.right_link(node);
        assert!(
            !self.is_red(right),
            "red edge leans right below node {node}"
        );
        if self.is_red(node as i64) {
            assert!(
                !self.is_red(left),
                "red node {node} has a red left child"
            );
        }
        let left_height = if left == NIL {
            0
        } else {
            self.check_subtree(left as usize)
        };
        let right_height = if right == NIL {
            0
        } else {
            self.check_subtree(right as usize)
        };
        assert_eq!(
            left_height, right_height,
            "black-height mismatch below node {node}"
        );
        left_height + self.black.contains(node) as usize
    }
}

impl Default for TransposeTree {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TransposeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TransposeTree[population {}, root {}, left {:?}, right {:?}]",
            self.population, self.root, self.left, self.right
        )
    }
}

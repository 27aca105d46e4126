//! Memory-compact ordered maps for workloads with very many small
//! entries, where per-node allocations and object headers would dwarf the
//! payload. Two layers: growable integer blocks that adaptively pick the
//! narrowest bit width for the values seen so far, and a left-leaning
//! red-black tree whose per-node fields live in parallel columns of those
//! blocks, addressed by node ordinal instead of by pointer.

/// Packed sequences of entries of arbitrary width 1..=32 bits: `BitBlock`
/// and its interpretation `Variant`s
pub mod bit_block;

/// Growable packed bit set, used for node colours
pub mod bitset;

/// Recoverable error kinds crossing the public boundary
pub mod error;

/// Byte-aligned growable integer sequences: `FixedBlock<W>`
pub mod fixed_block;

/// Width-promoting adapter over the block family: `InflatableBlock`
pub mod inflatable;

/// Contains the `Block` contract and the `NodeComparator`/`NodeLocator`
/// callback seams
pub mod traits;

/// The column-stored left-leaning red-black tree and its walkers
pub mod transpose_tree;

/// Primitive storage words for `FixedBlock`
pub mod word;

pub use crate::bit_block::{smart_entry_size, BitBlock, Variant};
pub use crate::bitset::BitSet;
pub use crate::error::{Error, Result};
pub use crate::fixed_block::FixedBlock;
pub use crate::inflatable::{
    bitwise_growth, byte_aligned, InflatableBlock, Storage, StorageFactory,
};
pub use crate::traits::{Block, Entries, NodeComparator, NodeLocator};
pub use crate::transpose_tree::{
    ColumnFactory, Indexes, MatchingIndexes, MatchingWalker, TransposeTree, Walker, NIL,
};
pub use crate::word::Word;

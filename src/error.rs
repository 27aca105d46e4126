use std::error;
use std::fmt;

/// Recoverable failure conditions of the block and tree layers.
///
/// Programmer errors (indexing past the population, exhausting the ordinal
/// space, mutating a tree while a walker is live, or an inflation factory
/// producing a block that is still too narrow) are not represented here;
/// they panic with a descriptive message instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The value does not fit the block's current representation. Blocks
    /// signal this without mutating any state.
    ValueBeyondLimit(i64),
    /// Insertion found a node comparing equal to the new slot; carries the
    /// ordinal of the existing node so callers can turn the insert into an
    /// update.
    DuplicateKey(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ValueBeyondLimit(v) => {
                write!(f, "value {v} is beyond the limit of this block")
            }
            Error::DuplicateKey(i) => {
                write!(f, "key compares equal to existing node {i}")
            }
        }
    }
}

impl error::Error for Error {}

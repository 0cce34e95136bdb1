use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an indexed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DbId(u32);

impl DbId {
    /// Wrap a raw identifier.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw identifier.
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for DbId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u32> for DbId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// Hands out fresh, strictly increasing identifiers.
///
/// There is no process-wide allocator: whoever creates a relation owns the
/// allocator and passes it explicitly to everything that needs new ids.
///
/// # Examples
///
/// ```
/// use proxima_types::id::{DbId, IdAllocator};
///
/// let mut ids = IdAllocator::starting_at(10);
/// assert_eq!(ids.allocate(), DbId::new(10));
/// assert_eq!(ids.allocate(), DbId::new(11));
/// assert_eq!(ids.allocated(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    first: u32,
    next: u32,
}

impl IdAllocator {
    /// Allocator starting at id 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose first id is `first`.
    pub fn starting_at(first: u32) -> Self {
        Self { first, next: first }
    }

    /// Allocate the next identifier.
    ///
    /// # Panics
    ///
    /// Panics when the 32-bit id space is exhausted.
    pub fn allocate(&mut self) -> DbId {
        assert!(self.next < u32::MAX, "DbId space exhausted");
        let id = DbId(self.next);
        self.next += 1;
        id
    }

    /// Number of identifiers handed out so far.
    pub fn allocated(&self) -> usize {
        (self.next - self.first) as usize
    }
}

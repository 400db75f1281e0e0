//! Memoized Attributes
//!
//! A [`Memo`] is a field that computes its value on first access and keeps
//! it for the lifetime of its owner. Views use one `Memo` per derived
//! collection instead of a shared name-keyed cache.

use std::fmt;

use once_cell::unsync::OnceCell;

/// Compute-once, cache-forever cell scoped to its owning instance.
///
/// Not thread-safe; views are built and read during single-threaded
/// workflow evaluation.
///
/// # Example
///
/// ```
/// use rattle::memo::Memo;
///
/// let memo: Memo<Vec<u32>> = Memo::new();
/// assert!(!memo.is_computed());
///
/// let first = memo.get_or_compute(|| vec![1, 2, 3]);
/// assert_eq!(first, &vec![1, 2, 3]);
///
/// // Later computations are ignored.
/// let second = memo.get_or_compute(|| vec![9]);
/// assert_eq!(second, &vec![1, 2, 3]);
/// ```
pub struct Memo<T> {
    cell: OnceCell<T>,
}

impl<T> Memo<T> {
    /// Creates an empty cell.
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached value, running `compute` only if nothing is stored yet.
    pub fn get_or_compute<F>(&self, compute: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.cell.get_or_init(compute)
    }

    /// Returns the cached value without computing it.
    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    /// Returns true once the value has been computed.
    pub fn is_computed(&self) -> bool {
        self.cell.get().is_some()
    }
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> Clone for Memo<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Memo<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(value) => f.debug_tuple("Memo").field(value).finish(),
            None => f.write_str("Memo(<pending>)"),
        }
    }
}

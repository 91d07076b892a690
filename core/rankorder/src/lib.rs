//! An ordered map built as a left-leaning red-black tree whose nodes live in a growable arena and
//! link to each other by `u32` slot index instead of by pointer. Every node also carries the size of
//! the subtree rooted at it, which keeps [len](Tree::len) O(1) and makes rank queries
//! ([nth](Tree::nth), [rank](Tree::rank)) O(log n).
//!
//! Removed slots are threaded onto a free list and reused by later insertions; the arena never
//! returns memory to the allocator, so a tree that has reached its working size performs no further
//! allocation.
//!
//! Ordering is supplied through the [Comparator] trait. [Natural] orders any `Ord` key, any
//! `Fn(&K, &K) -> Ordering` closure is a comparator, and [LessThan] adapts a less-than predicate.
//!
//! ## Examples
//!
//! ```rust
//! use rankorder::{SeekMode, Tree};
//!
//! let mut tree: Tree<u32, &str> = Tree::new();
//! for (k, v) in [(5, "five"), (3, "three"), (8, "eight"), (1, "one")] {
//!     assert!(tree.replace_or_insert(k, v).is_none());
//! }
//!
//! assert_eq!(tree.len(), 4);
//! assert_eq!(tree.get(&3), Some(&"three"));
//! assert_eq!(tree.nth(2), Some((&5, &"five")));
//! assert_eq!(tree.seek(&4, SeekMode::GreaterOrEqual).key(), Some(&5));
//!
//! let mut keys = Vec::new();
//! tree.ascend_range(&2, &8, |k, _| {
//!     keys.push(*k);
//!     true
//! });
//! assert_eq!(keys, [3, 5]);
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
#![no_std]
extern crate alloc;

mod balance;
mod cursor;
mod node;
mod seek;
mod tree;
mod validate;

pub use cursor::Cursor;
pub use node::INITIAL_CAPACITY;
pub use seek::SeekMode;
pub use tree::{Iter, Tree};

use alloc::string::String;
use core::{cmp::Ordering, fmt};

/// Public result type for the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Invariant violations reported by [Tree::validate].
///
/// Every variant names the arena slot where the violation was found and, where the slot is live, a
/// `Debug` rendering of its key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A key is not strictly between the bounds set by its ancestors.
    OutOfOrder { slot: u32, key: String },
    /// The stored subtree count does not equal `left + right + 1`.
    CountMismatch { slot: u32, key: String, stored: u32, expected: u32 },
    /// A red link leans right.
    RightLeaningRed { slot: u32, key: String },
    /// A red node has a red left child.
    ConsecutiveRed { slot: u32, key: String },
    /// The left and right subtrees have different black heights.
    BlackHeightMismatch { slot: u32, key: String, left: u32, right: u32 },
    /// The root is colored red.
    RedRoot { slot: u32 },
    /// A child does not point back at its parent.
    BrokenParentLink { slot: u32, key: String },
    /// A live slot has no payload.
    MissingEntry { slot: u32 },
    /// A slot is on the free list and also reachable from the root, is on the free list twice, or is
    /// on neither.
    FreeListCorrupt { slot: u32 },
    /// The number of live slots in the arena disagrees with the root count.
    LengthMismatch { live: usize, counted: usize },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::OutOfOrder { slot, key } => write!(f, "key {} at slot {} is out of order", key, slot),
            Error::CountMismatch { slot, key, stored, expected } => {
                write!(f, "count of key {} at slot {} is {}, expected {}", key, slot, stored, expected)
            }
            Error::RightLeaningRed { slot, key } => {
                write!(f, "key {} at slot {} has a red right child", key, slot)
            }
            Error::ConsecutiveRed { slot, key } => {
                write!(f, "red key {} at slot {} has a red left child", key, slot)
            }
            Error::BlackHeightMismatch { slot, key, left, right } => write!(
                f,
                "key {} at slot {} has black height {} on the left and {} on the right",
                key, slot, left, right
            ),
            Error::RedRoot { slot } => write!(f, "root slot {} is red", slot),
            Error::BrokenParentLink { slot, key } => {
                write!(f, "key {} at slot {} does not link back to its parent", key, slot)
            }
            Error::MissingEntry { slot } => write!(f, "live slot {} has no entry", slot),
            Error::FreeListCorrupt { slot } => write!(f, "free list is corrupt at slot {}", slot),
            Error::LengthMismatch { live, counted } => {
                write!(f, "arena holds {} live slots but the root counts {}", live, counted)
            }
        }
    }
}

/// A strict total order over `K`.
///
/// The tree trusts the comparator completely. If it is not a strict total order, or its answers
/// change between calls, lookups and range scans return unspecified results (the tree stays memory
/// safe but may no longer find entries it holds).
pub trait Comparator<K: ?Sized> {
    /// Compares `a` against `b`.
    fn compare(&self, a: &K, b: &K) -> Ordering;
}

/// Orders keys by their `Ord` implementation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Natural;

impl<K> Comparator<K> for Natural
where
    K: Ord + ?Sized,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        a.cmp(b)
    }
}

impl<K, F> Comparator<K> for F
where
    K: ?Sized,
    F: Fn(&K, &K) -> Ordering,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        self(a, b)
    }
}

/// Builds a three-way comparator out of a less-than predicate.
///
/// Two keys for which neither is less than the other are treated as equal.
#[derive(Debug, Default, Clone, Copy)]
pub struct LessThan<F>(pub F);

impl<K, F> Comparator<K> for LessThan<F>
where
    K: ?Sized,
    F: Fn(&K, &K) -> bool,
{
    fn compare(&self, a: &K, b: &K) -> Ordering {
        if (self.0)(a, b) {
            Ordering::Less
        } else if (self.0)(b, a) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

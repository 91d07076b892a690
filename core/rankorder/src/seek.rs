//! Arena Tree - Seek and range scans
//!
//! Every range operation is a [seek](Tree::seek) to find where to start, a second seek to find where
//! to stop (exclusive), and a cursor walk between the two. The visitor returns `false` to stop early.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::cmp::Ordering;

use crate::{node::NULL, Comparator, Cursor, Tree};

/// Where [Tree::seek] lands relative to the pivot key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeekMode {
    /// The smallest key `>=` the pivot.
    GreaterOrEqual,
    /// The smallest key `>` the pivot.
    GreaterThan,
    /// The largest key `<` the pivot.
    LessThan,
    /// The largest key `<=` the pivot.
    LessOrEqual,
    /// Exactly the pivot.
    Equal,
}

impl<K, V, C> Tree<K, V, C>
where
    C: Comparator<K>,
{
    /// Returns a cursor at the entry selected by `mode` relative to `pivot`, or an absent cursor when
    /// no entry qualifies.
    ///
    /// The pivot does not have to be present in the tree.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn seek(&self, pivot: &K, mode: SeekMode) -> Cursor<'_, K, V> {
        let mut current = self.root();
        if current.is_absent() {
            return current;
        }

        loop {
            let Some(key) = current.key() else {
                return current;
            };
            match self.cmp.compare(pivot, key) {
                Ordering::Less => {
                    let left = current.left();
                    if !left.is_absent() {
                        current = left;
                        continue;
                    }
                    return match mode {
                        SeekMode::GreaterOrEqual | SeekMode::GreaterThan => current,
                        SeekMode::LessThan | SeekMode::LessOrEqual => current.predecessor(),
                        SeekMode::Equal => self.cursor(NULL),
                    };
                }
                Ordering::Greater => {
                    let right = current.right();
                    if !right.is_absent() {
                        current = right;
                        continue;
                    }
                    return match mode {
                        SeekMode::GreaterOrEqual | SeekMode::GreaterThan => current.successor(),
                        SeekMode::LessThan | SeekMode::LessOrEqual => current,
                        SeekMode::Equal => self.cursor(NULL),
                    };
                }
                Ordering::Equal => {
                    return match mode {
                        SeekMode::GreaterOrEqual | SeekMode::LessOrEqual | SeekMode::Equal => current,
                        SeekMode::GreaterThan => current.successor(),
                        SeekMode::LessThan => current.predecessor(),
                    };
                }
            }
        }
    }

    /// Visits every entry in ascending order.
    pub fn ascend<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        walk_forward(self.root().subtree_min(), NULL, visit);
    }

    /// Visits every entry with a key `>= pivot` in ascending order.
    pub fn ascend_greater_or_equal<F>(&self, pivot: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        walk_forward(self.seek(pivot, SeekMode::GreaterOrEqual), NULL, visit);
    }

    /// Visits every entry with a key `< pivot` in ascending order.
    pub fn ascend_less_than<F>(&self, pivot: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let end = self.seek(pivot, SeekMode::GreaterOrEqual);
        walk_forward(self.root().subtree_min(), end.link(), visit);
    }

    /// Visits every entry with a key in `[greater_or_equal, less_than)` in ascending order.
    ///
    /// Nothing is visited unless `greater_or_equal < less_than`.
    pub fn ascend_range<F>(&self, greater_or_equal: &K, less_than: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        if self.cmp.compare(greater_or_equal, less_than) != Ordering::Less {
            return;
        }
        let start = self.seek(greater_or_equal, SeekMode::GreaterOrEqual);
        let end = self.seek(less_than, SeekMode::GreaterOrEqual);
        walk_forward(start, end.link(), visit);
    }

    /// Visits every entry in descending order.
    pub fn descend<F>(&self, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        walk_backward(self.root().subtree_max(), NULL, visit);
    }

    /// Visits every entry with a key `> pivot` in descending order.
    pub fn descend_greater_than<F>(&self, pivot: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        let end = self.seek(pivot, SeekMode::LessOrEqual);
        walk_backward(self.root().subtree_max(), end.link(), visit);
    }

    /// Visits every entry with a key `<= pivot` in descending order.
    pub fn descend_less_or_equal<F>(&self, pivot: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        walk_backward(self.seek(pivot, SeekMode::LessOrEqual), NULL, visit);
    }

    /// Visits every entry with a key in `(greater_than, less_or_equal]` in descending order.
    ///
    /// Nothing is visited unless `less_or_equal > greater_than`.
    pub fn descend_range<F>(&self, less_or_equal: &K, greater_than: &K, visit: F)
    where
        F: FnMut(&K, &V) -> bool,
    {
        if self.cmp.compare(less_or_equal, greater_than) != Ordering::Greater {
            return;
        }
        let start = self.seek(less_or_equal, SeekMode::LessOrEqual);
        let end = self.seek(greater_than, SeekMode::LessOrEqual);
        walk_backward(start, end.link(), visit);
    }
}

/// Walks successors from `current` until the slot `end` (exclusive) or the last entry.
fn walk_forward<K, V, F>(mut current: Cursor<'_, K, V>, end: u32, mut visit: F)
where
    F: FnMut(&K, &V) -> bool,
{
    while current.link() != end {
        let Some((key, value)) = current.entry() else {
            return;
        };
        if !visit(key, value) {
            return;
        }
        current = current.successor();
    }
}

/// Walks predecessors from `current` until the slot `end` (exclusive) or the first entry.
fn walk_backward<K, V, F>(mut current: Cursor<'_, K, V>, end: u32, mut visit: F)
where
    F: FnMut(&K, &V) -> bool,
{
    while current.link() != end {
        let Some((key, value)) = current.entry() else {
            return;
        };
        if !visit(key, value) {
            return;
        }
        current = current.predecessor();
    }
}

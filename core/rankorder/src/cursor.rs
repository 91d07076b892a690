//! Arena Tree - Cursor
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt;

use crate::node::{Node, Storage, NULL};

/// A read-only handle to one slot of a [Tree](crate::Tree).
///
/// A cursor is a slot index plus a shared borrow of the arena. It is `Copy`, and every navigation
/// method returns a new cursor instead of moving this one. A cursor that points at no slot is
/// *absent*: it is what navigation returns when it walks off the tree, and every accessor on it
/// returns `None`.
///
/// Because a cursor borrows the tree, it cannot be held across a mutation.
pub struct Cursor<'a, K, V> {
    storage: &'a Storage<K, V>,
    link: u32,
}

impl<K, V> Clone for Cursor<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for Cursor<'_, K, V> {}

impl<K, V> PartialEq for Cursor<'_, K, V> {
    /// Two cursors are equal when they point at the same slot of the same arena.
    fn eq(&self, other: &Self) -> bool {
        core::ptr::eq(self.storage, other.storage) && self.link == other.link
    }
}

impl<K, V> Eq for Cursor<'_, K, V> {}

impl<'a, K, V> Cursor<'a, K, V> {
    pub(crate) fn new(storage: &'a Storage<K, V>, link: u32) -> Self {
        Cursor { storage, link }
    }

    pub(crate) fn link(&self) -> u32 {
        self.link
    }

    fn node(&self) -> Option<&'a Node<K, V>> {
        self.storage.get(self.link)
    }

    fn at(&self, link: u32) -> Self {
        Cursor { storage: self.storage, link }
    }

    /// Returns `true` when the cursor points at no slot.
    pub fn is_absent(&self) -> bool {
        self.link == NULL
    }

    /// The key at the cursor.
    pub fn key(&self) -> Option<&'a K> {
        self.entry().map(|(k, _)| k)
    }

    /// The value at the cursor.
    pub fn value(&self) -> Option<&'a V> {
        self.entry().map(|(_, v)| v)
    }

    /// The key and value at the cursor.
    pub fn entry(&self) -> Option<(&'a K, &'a V)> {
        self.node().and_then(|n| n.entry.as_ref()).map(|(k, v)| (k, v))
    }

    /// The color of the link into this slot. Absent slots are black.
    pub fn is_red(&self) -> bool {
        self.storage.is_red(self.link)
    }

    /// Number of entries in the subtree rooted at the cursor, itself included. Absent slots count 0.
    pub fn subtree_count(&self) -> usize {
        self.storage.count(self.link) as usize
    }

    pub fn parent(&self) -> Self {
        self.at(self.storage.parent(self.link))
    }

    pub fn left(&self) -> Self {
        self.at(self.storage.left(self.link))
    }

    pub fn right(&self) -> Self {
        self.at(self.storage.right(self.link))
    }

    /// The smallest entry in the subtree rooted at the cursor.
    pub fn subtree_min(&self) -> Self {
        let mut current = *self;
        while !current.left().is_absent() {
            current = current.left();
        }
        current
    }

    /// The largest entry in the subtree rooted at the cursor.
    pub fn subtree_max(&self) -> Self {
        let mut current = *self;
        while !current.right().is_absent() {
            current = current.right();
        }
        current
    }

    /// The next entry in key order, or an absent cursor past the last entry.
    ///
    /// # Time Complexity
    ///
    /// O(1) amortized, O(log n) worst case.
    ///
    pub fn successor(&self) -> Self {
        if self.is_absent() {
            return *self;
        }
        let right = self.right();
        if !right.is_absent() {
            return right.subtree_min();
        }
        let mut current = *self;
        let mut parent = current.parent();
        while !parent.is_absent() && parent.storage.right(parent.link) == current.link {
            current = parent;
            parent = parent.parent();
        }
        parent
    }

    /// The previous entry in key order, or an absent cursor before the first entry.
    ///
    /// # Time Complexity
    ///
    /// O(1) amortized, O(log n) worst case.
    ///
    pub fn predecessor(&self) -> Self {
        if self.is_absent() {
            return *self;
        }
        let left = self.left();
        if !left.is_absent() {
            return left.subtree_max();
        }
        let mut current = *self;
        let mut parent = current.parent();
        while !parent.is_absent() && parent.storage.left(parent.link) == current.link {
            current = parent;
            parent = parent.parent();
        }
        parent
    }
}

impl<K, V> fmt::Debug for Cursor<'_, K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.entry() {
            Some((k, v)) => {
                f.debug_struct("Cursor").field("slot", &self.link).field("key", k).field("value", v).finish()
            }
            None => f.write_str("Cursor(absent)"),
        }
    }
}

//! Arena Tree - Public tree surface
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::{cmp::Ordering, fmt, iter::FusedIterator};

use crate::{
    node::{Storage, NULL},
    Comparator, Cursor, Natural, SeekMode,
};

/// An ordered map from `K` to `V`, kept as a left-leaning red-black tree in an index-linked arena.
///
/// `V` defaults to `()` for set-like use, and `C` defaults to [Natural] ordering. Any
/// [Comparator] can be supplied through [with_comparator](Self::with_comparator).
///
/// Inserting a key that is already present replaces the stored key and value. Every lookup, insert
/// and delete is O(log n); [len](Self::len) is O(1).
#[derive(Clone)]
pub struct Tree<K, V = (), C = Natural> {
    pub(crate) storage: Storage<K, V>,
    pub(crate) root: u32,
    pub(crate) cmp: C,
}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Creates an empty tree ordered by `K`'s `Ord` implementation. Nothing is allocated until the
    /// first insertion.
    pub const fn new() -> Self {
        Tree { storage: Storage::new(), root: NULL, cmp: Natural }
    }

    /// Creates an empty tree with room for `capacity` entries before the arena has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_and_comparator(capacity, Natural)
    }
}

impl<K, V, C> Tree<K, V, C>
where
    C: Comparator<K>,
{
    /// Creates an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Tree { storage: Storage::new(), root: NULL, cmp }
    }

    /// Creates an empty tree ordered by `cmp` with room for `capacity` entries.
    pub fn with_capacity_and_comparator(capacity: usize, cmp: C) -> Self {
        Tree { storage: Storage::with_capacity(capacity), root: NULL, cmp }
    }

    /// Inserts `value` under `key`.
    ///
    /// If an equal key is already present, its entry is replaced and the old key and value are
    /// returned. No arena slot is consumed in that case.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn replace_or_insert(&mut self, key: K, value: V) -> Option<(K, V)> {
        let (root, replaced) = self.storage.insert(self.root, key, value, &self.cmp);
        self.root = self.storage.settle_root(root);
        replaced
    }

    /// Removes the entry for `key` and returns it. An absent key leaves the tree untouched.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn delete(&mut self, key: &K) -> Option<(K, V)> {
        if !self.has(key) {
            return None;
        }
        self.storage.prepare_delete(self.root);
        let (root, removed) = self.storage.delete(self.root, key, &self.cmp);
        self.root = self.storage.settle_root(root);
        removed
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.seek(key, SeekMode::Equal).value()
    }

    /// Returns the stored key and value equal to `key`.
    ///
    /// The stored key may differ from `key` when the comparator treats distinct keys as equal.
    pub fn get_key_value(&self, key: &K) -> Option<(&K, &V)> {
        self.seek(key, SeekMode::Equal).entry()
    }

    /// Returns a mutable reference to the value stored under `key`.
    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        let link = self.seek(key, SeekMode::Equal).link();
        self.storage.get_mut(link).and_then(|node| node.entry.as_mut()).map(|(_, value)| value)
    }

    /// Returns `true` if an entry equal to `key` is present.
    pub fn has(&self, key: &K) -> bool {
        !self.seek(key, SeekMode::Equal).is_absent()
    }

    /// Number of stored keys strictly less than `key`. `key` does not have to be present.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn rank(&self, key: &K) -> usize {
        let mut rank = 0;
        let mut current = self.root;
        while current != NULL {
            let left = self.storage.left(current);
            match self.cmp.compare(key, self.storage.key(current)) {
                Ordering::Less => current = left,
                Ordering::Equal => return rank + self.storage.count(left) as usize,
                Ordering::Greater => {
                    rank += self.storage.count(left) as usize + 1;
                    current = self.storage.right(current);
                }
            }
        }
        rank
    }
}

impl<K, V, C> Tree<K, V, C> {
    pub(crate) fn cursor(&self, link: u32) -> Cursor<'_, K, V> {
        Cursor::new(&self.storage, link)
    }

    /// A cursor at the root, absent when the tree is empty.
    pub fn root(&self) -> Cursor<'_, K, V> {
        self.cursor(self.root)
    }

    /// Number of entries, read from the root's subtree count.
    pub fn len(&self) -> usize {
        self.storage.count(self.root) as usize
    }

    pub fn is_empty(&self) -> bool {
        self.root == NULL
    }

    /// Number of slots in the arena, live or free.
    pub fn capacity(&self) -> usize {
        self.storage.capacity()
    }

    /// Number of nodes on the longest path from the root to a leaf.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    fn height_of(&self, link: u32) -> usize {
        if link == NULL {
            return 0;
        }
        1 + self.height_of(self.storage.left(link)).max(self.height_of(self.storage.right(link)))
    }

    /// The entry with the smallest key.
    pub fn min(&self) -> Option<(&K, &V)> {
        self.root().subtree_min().entry()
    }

    /// The entry with the largest key.
    pub fn max(&self) -> Option<(&K, &V)> {
        self.root().subtree_max().entry()
    }

    /// The entry at position `index` in key order, starting from 0.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub fn nth(&self, index: usize) -> Option<(&K, &V)> {
        let mut index = index;
        let mut current = self.root;
        while current != NULL {
            let left = self.storage.left(current);
            let left_count = self.storage.count(left) as usize;
            match index.cmp(&left_count) {
                Ordering::Less => current = left,
                Ordering::Equal => return self.cursor(current).entry(),
                Ordering::Greater => {
                    index -= left_count + 1;
                    current = self.storage.right(current);
                }
            }
        }
        None
    }

    /// Removes the entry with the smallest key.
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        if self.root == NULL {
            return None;
        }
        self.storage.prepare_delete(self.root);
        let (root, removed) = self.storage.delete_min(self.root);
        self.root = self.storage.settle_root(root);
        removed
    }

    /// Removes the entry with the largest key.
    pub fn delete_max(&mut self) -> Option<(K, V)> {
        if self.root == NULL {
            return None;
        }
        self.storage.prepare_delete(self.root);
        let (root, removed) = self.storage.delete_max(self.root);
        self.root = self.storage.settle_root(root);
        removed
    }

    /// Removes every entry and releases the arena.
    pub fn clear(&mut self) {
        self.storage.clear();
        self.root = NULL;
    }

    /// An iterator over the entries in key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        let root = self.root();
        Iter { front: root.subtree_min(), back: root.subtree_max(), remaining: self.len() }
    }
}

impl<K, V> Default for Tree<K, V>
where
    K: Ord,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V, C> fmt::Debug for Tree<K, V, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("capacity", &self.capacity())
            .field("len", &self.len())
            .field("height", &self.height())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Tree::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V, C> Extend<(K, V)> for Tree<K, V, C>
where
    C: Comparator<K>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.replace_or_insert(key, value);
        }
    }
}

impl<'a, K, V, C> IntoIterator for &'a Tree<K, V, C> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An iterator over the entries of a [Tree] in key order, created by [Tree::iter].
pub struct Iter<'a, K, V> {
    front: Cursor<'a, K, V>,
    back: Cursor<'a, K, V>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Iter { front: self.front, back: self.back, remaining: self.remaining }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.front.entry()?;
        self.front = self.front.successor();
        self.remaining -= 1;
        Some(entry)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> DoubleEndedIterator for Iter<'_, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let entry = self.back.entry()?;
        self.back = self.back.predecessor();
        self.remaining -= 1;
        Some(entry)
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}

//! Arena Tree - Node and slot storage
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::vec::Vec;

/// Link value meaning "no slot".
pub(crate) const NULL: u32 = u32::MAX;

/// Bit 31 of the packed word: set when the node is red.
pub(crate) const RED_MASK: u32 = 1 << 31;
/// Bits 0..=30 of the packed word: number of live entries in the subtree.
pub(crate) const COUNT_MASK: u32 = !RED_MASK;

/// Number of slots created by the first growth of an empty arena.
pub const INITIAL_CAPACITY: usize = 16;

/// Largest number of slots the arena will hold. Bounded by the width of the count field, which also
/// keeps every valid index below [NULL].
pub(crate) const MAX_SLOTS: usize = COUNT_MASK as usize;

/// A single arena slot.
///
/// A live slot holds an entry and three links into the arena. A free slot holds no entry and uses
/// `right` as the next pointer of the free list.
#[derive(Clone)]
pub(crate) struct Node<K, V> {
    pub entry: Option<(K, V)>,
    pub left: u32,
    pub right: u32,
    pub parent: u32,
    /// Color in bit 31, subtree count in bits 0..=30.
    packed: u32,
}

impl<K, V> Node<K, V> {
    /// A red leaf holding `entry`.
    pub fn new(key: K, value: V) -> Self {
        Node { entry: Some((key, value)), left: NULL, right: NULL, parent: NULL, packed: RED_MASK | 1 }
    }

    /// An empty slot whose free-list successor is `next`.
    fn vacant(next: u32) -> Self {
        Node { entry: None, left: NULL, right: next, parent: NULL, packed: 0 }
    }

    pub fn is_red(&self) -> bool {
        self.packed & RED_MASK != 0
    }

    pub fn set_red(&mut self, red: bool) {
        if red {
            self.packed |= RED_MASK;
        } else {
            self.packed &= COUNT_MASK;
        }
    }

    pub fn flip_color(&mut self) {
        self.packed ^= RED_MASK;
    }

    pub fn count(&self) -> u32 {
        self.packed & COUNT_MASK
    }

    pub fn set_count(&mut self, count: u32) {
        debug_assert!(count <= COUNT_MASK);
        self.packed = (self.packed & RED_MASK) | (count & COUNT_MASK);
    }

    /// The key of a live slot.
    ///
    /// Panics if the slot is free; the engine only asks for keys of slots reachable from the root.
    pub fn key(&self) -> &K {
        match &self.entry {
            Some((key, _)) => key,
            None => panic!("Live node has no entry, the arena is corrupt."),
        }
    }
}

/// A growable arena of [Node]s with a free list threaded through the `right` links of unused slots.
///
/// Slots never move once created, so an index handed out by [alloc](Self::alloc) stays valid until it
/// is passed to [release](Self::release).
#[derive(Clone)]
pub(crate) struct Storage<K, V> {
    /// Every slot ever created, live or free.
    data: Vec<Node<K, V>>,
    /// Head of the free list.
    available: u32,
    /// Number of live slots.
    length: usize,
}

impl<K, V> Storage<K, V> {
    /// Creates an arena with no slots; the first allocation grows it.
    pub const fn new() -> Self {
        Storage { data: Vec::new(), available: NULL, length: 0 }
    }

    /// Creates an arena with room for `capacity` entries before the next growth.
    pub fn with_capacity(capacity: usize) -> Self {
        let mut storage = Self::new();
        if capacity > 0 {
            storage.grow_to(capacity.min(MAX_SLOTS));
        }
        storage
    }

    /// Number of live slots.
    pub fn len(&self) -> usize {
        self.length
    }

    /// Number of slots, live or free.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Head of the free list.
    pub fn available(&self) -> u32 {
        self.available
    }

    /// Drops every entry and every slot.
    pub fn clear(&mut self) {
        self.data.clear();
        self.available = NULL;
        self.length = 0;
    }

    /// Takes a slot off the free list and writes a red, childless `key`/`value` leaf into it.
    ///
    /// # Time Complexity
    ///
    /// O(1) amortized. Growth copies the existing slots once.
    ///
    pub fn alloc(&mut self, key: K, value: V) -> u32 {
        if self.available == NULL {
            self.grow();
        }
        let idx = self.available;
        let node = &mut self.data[idx as usize];
        self.available = node.right;
        *node = Node::new(key, value);
        self.length += 1;
        idx
    }

    /// Returns a slot to the free list, handing back the entry it held.
    ///
    /// # Time Complexity
    ///
    /// O(1)
    ///
    pub fn release(&mut self, idx: u32) -> Option<(K, V)> {
        let next = self.available;
        let node = self.data.get_mut(idx as usize)?;
        let entry = node.entry.take();
        node.left = NULL;
        node.parent = NULL;
        node.right = next;
        node.packed = 0;
        self.available = idx;
        self.length -= 1;
        log::trace!("released slot {}", idx);
        entry
    }

    /// Doubles the arena (or creates the first [INITIAL_CAPACITY] slots).
    fn grow(&mut self) {
        let target = match self.data.len() {
            0 => INITIAL_CAPACITY,
            len => len.saturating_mul(2).min(MAX_SLOTS),
        };
        if target <= self.data.len() {
            panic!("Arena is full, cannot hold more than {} slots.", MAX_SLOTS);
        }
        self.grow_to(target);
    }

    /// Appends fresh slots up to `target` and links them into one free list in index order. Only
    /// called when the free list is empty.
    fn grow_to(&mut self, target: usize) {
        debug_assert_eq!(self.available, NULL);
        let start = self.data.len();
        log::debug!("growing tree arena from {} to {} slots", start, target);
        self.data.reserve_exact(target - start);
        for i in start..target {
            let next = if i + 1 < target { (i + 1) as u32 } else { NULL };
            self.data.push(Node::vacant(next));
        }
        self.available = start as u32;
    }

    /// Gets a slot by index. `NULL` and out of range indices yield `None`.
    pub fn get(&self, idx: u32) -> Option<&Node<K, V>> {
        self.data.get(idx as usize)
    }

    /// Gets a slot mutably by index. `NULL` and out of range indices yield `None`.
    pub fn get_mut(&mut self, idx: u32) -> Option<&mut Node<K, V>> {
        self.data.get_mut(idx as usize)
    }

    pub fn key(&self, idx: u32) -> &K {
        self.data[idx as usize].key()
    }

    /// Swaps the entry held by a live slot, returning the previous one.
    pub fn replace_entry(&mut self, idx: u32, entry: Option<(K, V)>) -> Option<(K, V)> {
        core::mem::replace(&mut self.data[idx as usize].entry, entry)
    }

    pub fn left(&self, idx: u32) -> u32 {
        self.get(idx).map_or(NULL, |n| n.left)
    }

    pub fn right(&self, idx: u32) -> u32 {
        self.get(idx).map_or(NULL, |n| n.right)
    }

    pub fn parent(&self, idx: u32) -> u32 {
        self.get(idx).map_or(NULL, |n| n.parent)
    }

    /// Absent nodes are black.
    pub fn is_red(&self, idx: u32) -> bool {
        self.get(idx).is_some_and(|n| n.is_red())
    }

    pub fn set_red(&mut self, idx: u32, red: bool) {
        if let Some(node) = self.get_mut(idx) {
            node.set_red(red);
        }
    }

    pub fn flip_color(&mut self, idx: u32) {
        if let Some(node) = self.get_mut(idx) {
            node.flip_color();
        }
    }

    /// Absent nodes count 0.
    pub fn count(&self, idx: u32) -> u32 {
        self.get(idx).map_or(0, |n| n.count())
    }

    /// Recomputes the subtree count of `idx` from its children.
    pub fn update_count(&mut self, idx: u32) {
        let count = self.count(self.left(idx)) + self.count(self.right(idx)) + 1;
        if let Some(node) = self.get_mut(idx) {
            node.set_count(count);
        }
    }

    pub fn set_parent(&mut self, idx: u32, parent: u32) {
        if let Some(node) = self.get_mut(idx) {
            node.parent = parent;
        }
    }

    /// Makes `child` the left child of `idx`, updating the child's parent link.
    pub fn set_left(&mut self, idx: u32, child: u32) {
        if let Some(node) = self.get_mut(idx) {
            node.left = child;
            self.set_parent(child, idx);
        }
    }

    /// Makes `child` the right child of `idx`, updating the child's parent link.
    pub fn set_right(&mut self, idx: u32, child: u32) {
        if let Some(node) = self.get_mut(idx) {
            node.right = child;
            self.set_parent(child, idx);
        }
    }
}

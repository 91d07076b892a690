//! Arena Tree - Left-leaning red-black balancing
//!
//! The insertion and deletion engines work on raw slot links rather than cursors, since they mutate
//! the arena as they go. Each routine takes the link of a subtree root and returns the link of the
//! (possibly different) root of the rebalanced subtree; the caller reattaches it.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::cmp::Ordering;

use crate::{
    node::{Storage, NULL},
    Comparator,
};

impl<K, V> Storage<K, V> {
    /// Rotate the subtree to the left and return the new root.
    ///
    /// The right child takes the place and color of `node`, and `node` becomes its red left child.
    fn rotate_left(&mut self, node: u32) -> u32 {
        let right_child = self.right(node);
        let parent = self.parent(node);

        self.set_right(node, self.left(right_child));
        self.set_left(right_child, node);
        self.set_parent(right_child, parent);

        self.set_red(right_child, self.is_red(node));
        self.set_red(node, true);

        // node is now below right_child, so its count has to be fixed first.
        self.update_count(node);
        self.update_count(right_child);
        right_child
    }

    /// Rotate the subtree to the right and return the new root.
    ///
    /// The left child takes the place and color of `node`, and `node` becomes its red right child.
    fn rotate_right(&mut self, node: u32) -> u32 {
        let left_child = self.left(node);
        let parent = self.parent(node);

        self.set_left(node, self.right(left_child));
        self.set_right(left_child, node);
        self.set_parent(left_child, parent);

        self.set_red(left_child, self.is_red(node));
        self.set_red(node, true);

        self.update_count(node);
        self.update_count(left_child);
        left_child
    }

    /// Complements the color of `node` and both of its children.
    fn flip_colors(&mut self, node: u32) {
        self.flip_color(node);
        self.flip_color(self.left(node));
        self.flip_color(self.right(node));
    }

    /// Pushes a red link into the left subtree of `node`, so that the left child or one of its
    /// children is red before deletion descends into it.
    fn move_red_left(&mut self, mut node: u32) -> u32 {
        self.flip_colors(node);
        if self.is_red(self.left(self.right(node))) {
            let right = self.rotate_right(self.right(node));
            self.set_right(node, right);
            node = self.rotate_left(node);
            self.flip_colors(node);
        }
        node
    }

    /// Pushes a red link into the right subtree of `node`.
    fn move_red_right(&mut self, mut node: u32) -> u32 {
        self.flip_colors(node);
        if self.is_red(self.left(self.left(node))) {
            node = self.rotate_right(node);
            self.flip_colors(node);
        }
        node
    }

    /// Restores the left-leaning invariants at `node` on the way back up from a mutation and
    /// recomputes its count.
    fn fix_up(&mut self, mut node: u32) -> u32 {
        if self.is_red(self.right(node)) {
            node = self.rotate_left(node);
        }
        if self.is_red(self.left(node)) && self.is_red(self.left(self.left(node))) {
            node = self.rotate_right(node);
        }
        if self.is_red(self.left(node)) && self.is_red(self.right(node)) {
            self.flip_colors(node);
        }
        self.update_count(node);
        node
    }

    /// Colors `root` red when both its children are black, so deletion always has a red link to
    /// push down.
    pub(crate) fn prepare_delete(&mut self, root: u32) {
        if !self.is_red(self.left(root)) && !self.is_red(self.right(root)) {
            self.set_red(root, true);
        }
    }

    /// Finishes a top-level mutation: the root is black and has no parent.
    pub(crate) fn settle_root(&mut self, root: u32) -> u32 {
        self.set_red(root, false);
        self.set_parent(root, NULL);
        root
    }

    /// Inserts `key`/`value` into the subtree at `node`, replacing the entry with an equal key.
    ///
    /// Returns the new subtree root and the replaced entry, if any.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub(crate) fn insert<C>(&mut self, node: u32, key: K, value: V, cmp: &C) -> (u32, Option<(K, V)>)
    where
        C: Comparator<K>,
    {
        if node == NULL {
            return (self.alloc(key, value), None);
        }

        let replaced = match cmp.compare(&key, self.key(node)) {
            Ordering::Less => {
                let (left, replaced) = self.insert(self.left(node), key, value, cmp);
                self.set_left(node, left);
                replaced
            }
            Ordering::Greater => {
                let (right, replaced) = self.insert(self.right(node), key, value, cmp);
                self.set_right(node, right);
                replaced
            }
            Ordering::Equal => return (node, self.replace_entry(node, Some((key, value)))),
        };

        (self.fix_up(node), replaced)
    }

    /// Removes the smallest entry of the subtree at `node`.
    ///
    /// Returns the new subtree root and the removed entry.
    pub(crate) fn delete_min(&mut self, mut node: u32) -> (u32, Option<(K, V)>) {
        if node == NULL {
            return (NULL, None);
        }
        if self.left(node) == NULL {
            return (NULL, self.release(node));
        }

        let left = self.left(node);
        if !self.is_red(left) && !self.is_red(self.left(left)) {
            node = self.move_red_left(node);
        }

        let (left, removed) = self.delete_min(self.left(node));
        self.set_left(node, left);
        (self.fix_up(node), removed)
    }

    /// Removes the largest entry of the subtree at `node`.
    ///
    /// Returns the new subtree root and the removed entry.
    pub(crate) fn delete_max(&mut self, mut node: u32) -> (u32, Option<(K, V)>) {
        if node == NULL {
            return (NULL, None);
        }
        if self.is_red(self.left(node)) {
            node = self.rotate_right(node);
        }
        if self.right(node) == NULL {
            return (NULL, self.release(node));
        }

        let right = self.right(node);
        if !self.is_red(right) && !self.is_red(self.left(right)) {
            node = self.move_red_right(node);
        }

        let (right, removed) = self.delete_max(self.right(node));
        self.set_right(node, right);
        (self.fix_up(node), removed)
    }

    /// Removes the entry matching `key` from the subtree at `node`.
    ///
    /// The key must be present in the subtree; the descent restructures the tree on the assumption
    /// that it will find it.
    ///
    /// Returns the new subtree root and the removed entry.
    ///
    /// # Time Complexity
    ///
    /// O(log n)
    ///
    pub(crate) fn delete<C>(&mut self, mut node: u32, key: &K, cmp: &C) -> (u32, Option<(K, V)>)
    where
        C: Comparator<K>,
    {
        if node == NULL {
            return (NULL, None);
        }

        if cmp.compare(key, self.key(node)) == Ordering::Less {
            let left = self.left(node);
            if !self.is_red(left) && !self.is_red(self.left(left)) {
                node = self.move_red_left(node);
            }
            let (left, removed) = self.delete(self.left(node), key, cmp);
            self.set_left(node, left);
            return (self.fix_up(node), removed);
        }

        if self.is_red(self.left(node)) {
            node = self.rotate_right(node);
        }
        if cmp.compare(key, self.key(node)) == Ordering::Equal && self.right(node) == NULL {
            return (NULL, self.release(node));
        }

        let right = self.right(node);
        if !self.is_red(right) && !self.is_red(self.left(right)) {
            node = self.move_red_right(node);
        }

        let removed = if cmp.compare(key, self.key(node)) == Ordering::Equal {
            // Take over the successor's entry, then drop the successor's slot.
            let (right, successor) = self.delete_min(self.right(node));
            self.set_right(node, right);
            self.replace_entry(node, successor)
        } else {
            let (right, removed) = self.delete(self.right(node), key, cmp);
            self.set_right(node, right);
            removed
        };

        (self.fix_up(node), removed)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::Natural;

    /// Links `left` and `right` under `node`, colors it, and fixes its count.
    fn link(storage: &mut Storage<i32, ()>, node: u32, left: u32, right: u32, red: bool) {
        storage.set_left(node, left);
        storage.set_right(node, right);
        storage.set_red(node, red);
        storage.update_count(node);
    }

    #[test]
    fn test_rotate_left() {
        /* A red right link at 50 is turned into a red left link at 75.
             [50B]              [75B]
             /  \               /  \
           [10][75R]    -->  [50R][85]
               /  \          /  \
             [70][85]      [10][70]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(50, ());
        let left = storage.alloc(10, ());
        let right = storage.alloc(75, ());
        let right_l = storage.alloc(70, ());
        let right_r = storage.alloc(85, ());
        for leaf in [left, right_l, right_r] {
            storage.set_red(leaf, false);
        }
        link(&mut storage, right, right_l, right_r, true);
        link(&mut storage, node, left, right, false);

        let root = storage.rotate_left(node);
        assert_eq!(root, right);
        assert!(storage.parent(right) == NULL);
        assert!(!storage.is_red(right));
        assert!(storage.is_red(node));

        // Check right[75] <-left-> node[50] connection
        assert_eq!(storage.left(right), node);
        assert_eq!(storage.parent(node), right);

        // Check right[75] <-right-> right_r[85] connection
        assert_eq!(storage.right(right), right_r);
        assert_eq!(storage.parent(right_r), right);

        // Check node[50] <-left-> left[10] and node[50] <-right-> right_l[70]
        assert_eq!(storage.left(node), left);
        assert_eq!(storage.right(node), right_l);
        assert_eq!(storage.parent(right_l), node);

        assert_eq!(storage.count(node), 3);
        assert_eq!(storage.count(right), 5);
    }

    #[test]
    fn test_rotate_right() {
        /* A red left link at 75 is turned into a red right link at 50.
                [75B]             [50B]
                /  \              /  \
             [50R][85]   -->   [10][75R]
             /  \                  /  \
           [10][70]              [70][85]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(75, ());
        let left = storage.alloc(50, ());
        let right = storage.alloc(85, ());
        let left_l = storage.alloc(10, ());
        let left_r = storage.alloc(70, ());
        for leaf in [right, left_l, left_r] {
            storage.set_red(leaf, false);
        }
        link(&mut storage, left, left_l, left_r, true);
        link(&mut storage, node, left, right, false);

        let root = storage.rotate_right(node);
        assert_eq!(root, left);
        assert!(!storage.is_red(left));
        assert!(storage.is_red(node));

        assert_eq!(storage.left(left), left_l);
        assert_eq!(storage.right(left), node);
        assert_eq!(storage.parent(node), left);
        assert_eq!(storage.left(node), left_r);
        assert_eq!(storage.parent(left_r), node);
        assert_eq!(storage.right(node), right);

        assert_eq!(storage.count(node), 3);
        assert_eq!(storage.count(left), 5);
    }

    #[test]
    fn test_rotate_keeps_parent_link() {
        let mut storage = Storage::<i32, ()>::new();
        let top = storage.alloc(100, ());
        let node = storage.alloc(50, ());
        let right = storage.alloc(75, ());
        link(&mut storage, node, NULL, right, false);
        link(&mut storage, top, node, NULL, false);

        let root = storage.rotate_left(node);
        assert_eq!(storage.parent(root), top);
    }

    #[test]
    fn test_flip_colors() {
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(2, ());
        let left = storage.alloc(1, ());
        let right = storage.alloc(3, ());
        link(&mut storage, node, left, right, false);

        storage.flip_colors(node);
        assert!(storage.is_red(node));
        assert!(!storage.is_red(left));
        assert!(!storage.is_red(right));
        assert_eq!(storage.count(node), 3);
    }

    #[test]
    fn test_fix_up_right_leaning() {
        /* A red right link is rotated to lean left.
             [10B]            [20B]
                \     -->     /
               [20R]        [10R]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(10, ());
        let right = storage.alloc(20, ());
        link(&mut storage, node, NULL, right, false);

        let root = storage.fix_up(node);
        assert_eq!(root, right);
        assert!(!storage.is_red(right));
        assert_eq!(storage.left(right), node);
        assert!(storage.is_red(node));
        assert_eq!(storage.count(right), 2);
    }

    #[test]
    fn test_fix_up_two_reds_on_the_left() {
        /* Two consecutive red left links are split into a color flipped 4-node.
                 [30B]
                 /              [20R]
              [20R]     -->     /   \
              /              [10B] [30B]
           [10R]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(30, ());
        let left = storage.alloc(20, ());
        let left_l = storage.alloc(10, ());
        link(&mut storage, left, left_l, NULL, true);
        link(&mut storage, node, left, NULL, false);

        let root = storage.fix_up(node);
        assert_eq!(root, left);
        assert!(storage.is_red(left));
        assert_eq!(storage.left(left), left_l);
        assert_eq!(storage.right(left), node);
        assert!(!storage.is_red(left_l));
        assert!(!storage.is_red(node));
        assert_eq!(storage.count(left), 3);
    }

    #[test]
    fn test_move_red_left() {
        /* The right sibling lends its red left child.
                [20R]                      [25R]
               /     \                    /     \
            [10B]    [30B]      -->    [20B]    [30B]
                     /                 /
                  [25R]             [10R]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(20, ());
        let left = storage.alloc(10, ());
        let right = storage.alloc(30, ());
        let right_l = storage.alloc(25, ());
        storage.set_red(left, false);
        link(&mut storage, right, right_l, NULL, false);
        link(&mut storage, node, left, right, true);

        let root = storage.move_red_left(node);
        assert_eq!(root, right_l);
        assert!(storage.is_red(right_l));
        assert_eq!(storage.left(right_l), node);
        assert_eq!(storage.right(right_l), right);
        assert!(!storage.is_red(node));
        assert!(!storage.is_red(right));
        assert_eq!(storage.left(node), left);
        assert!(storage.is_red(left));
        assert_eq!(storage.count(right_l), 4);
    }

    #[test]
    fn test_move_red_right() {
        /* The left sibling lends its red left child.
                   [20R]                  [10R]
                  /     \                /     \
               [10B]    [30B]   -->   [05B]    [20B]
               /                                  \
            [05R]                                [30R]
        */
        let mut storage = Storage::<i32, ()>::new();
        let node = storage.alloc(20, ());
        let left = storage.alloc(10, ());
        let right = storage.alloc(30, ());
        let left_l = storage.alloc(5, ());
        storage.set_red(right, false);
        link(&mut storage, left, left_l, NULL, false);
        link(&mut storage, node, left, right, true);

        let root = storage.move_red_right(node);
        assert_eq!(root, left);
        assert!(storage.is_red(left));
        assert_eq!(storage.left(left), left_l);
        assert_eq!(storage.right(left), node);
        assert!(!storage.is_red(left_l));
        assert!(!storage.is_red(node));
        assert!(storage.is_red(right));
        assert_eq!(storage.count(left), 4);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut storage = Storage::<i32, &str>::new();
        let (root, replaced) = storage.insert(NULL, 1, "a", &Natural);
        assert!(replaced.is_none());
        let root = storage.settle_root(root);

        let (same, replaced) = storage.insert(root, 1, "b", &Natural);
        assert_eq!(same, root);
        assert_eq!(replaced, Some((1, "a")));
        assert_eq!(storage.len(), 1);
        assert_eq!(storage.get(root).unwrap().entry, Some((1, "b")));
    }

    #[test]
    fn test_delete_min_and_max() {
        let mut storage = Storage::<i32, ()>::new();
        let mut root = NULL;
        for k in [4, 2, 6, 1, 3, 5, 7] {
            let (r, _) = storage.insert(root, k, (), &Natural);
            root = storage.settle_root(r);
        }
        assert_eq!(storage.count(root), 7);

        storage.prepare_delete(root);
        let (r, removed) = storage.delete_min(root);
        root = storage.settle_root(r);
        assert_eq!(removed, Some((1, ())));

        storage.prepare_delete(root);
        let (r, removed) = storage.delete_max(root);
        root = storage.settle_root(r);
        assert_eq!(removed, Some((7, ())));

        assert_eq!(storage.count(root), 5);
        assert_eq!(storage.len(), 5);
    }
}

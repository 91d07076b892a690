//! Arena Tree - Invariant checking
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation. All rights reserved.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use alloc::{format, string::String, vec};
use core::{cmp::Ordering, fmt::Debug};

use crate::{node::NULL, Comparator, Error, Result, Tree};

impl<K, V, C> Tree<K, V, C>
where
    K: Debug,
    C: Comparator<K>,
{
    /// Walks the whole tree and the free list and reports the first broken invariant.
    ///
    /// Checked, for every live slot: key order against every ancestor, the parent link, no red right
    /// child, no red node with a red left child, equal black height on both sides, and
    /// `count == left + right + 1`. The root must be black. Every arena slot must be either reachable
    /// from the root with an entry or on the free list without one, and the number of live slots
    /// must match the root count.
    ///
    /// # Time Complexity
    ///
    /// O(n) in the capacity of the arena.
    ///
    pub fn validate(&self) -> Result<()> {
        let result = self.check();
        if let Err(err) = &result {
            log::error!("tree validation failed: {}", err);
        }
        result
    }

    fn check(&self) -> Result<()> {
        let mut seen = vec![false; self.storage.capacity()];

        if self.root != NULL {
            if self.storage.is_red(self.root) {
                return Err(Error::RedRoot { slot: self.root });
            }
            self.check_subtree(self.root, NULL, None, None, &mut seen)?;
        }

        // The subtree walk has verified every count, so the root count is the number of reachable
        // slots. Only the arena's own live counter can still disagree.
        let counted = self.len();
        let live = self.storage.len();
        if live != counted {
            return Err(Error::LengthMismatch { live, counted });
        }

        self.check_free_list(&mut seen)?;

        match seen.iter().position(|s| !*s) {
            Some(slot) => Err(Error::FreeListCorrupt { slot: slot as u32 }),
            None => Ok(()),
        }
    }

    /// Checks the subtree at `link` and returns its black height.
    fn check_subtree(
        &self,
        link: u32,
        parent: u32,
        lower: Option<&K>,
        upper: Option<&K>,
        seen: &mut [bool],
    ) -> Result<u32> {
        if link == NULL {
            return Ok(0);
        }

        let key = match self.storage.get(link).and_then(|n| n.entry.as_ref()) {
            Some((key, _)) => key,
            None => return Err(Error::MissingEntry { slot: link }),
        };
        let describe = || -> String { format!("{:?}", key) };

        if seen[link as usize] || self.storage.parent(link) != parent {
            return Err(Error::BrokenParentLink { slot: link, key: describe() });
        }
        seen[link as usize] = true;

        let above_lower = lower.map_or(true, |lower| self.cmp.compare(lower, key) == Ordering::Less);
        let below_upper = upper.map_or(true, |upper| self.cmp.compare(key, upper) == Ordering::Less);
        if !above_lower || !below_upper {
            return Err(Error::OutOfOrder { slot: link, key: describe() });
        }

        let left = self.storage.left(link);
        let right = self.storage.right(link);
        let red = self.storage.is_red(link);

        if self.storage.is_red(right) {
            return Err(Error::RightLeaningRed { slot: link, key: describe() });
        }
        if red && self.storage.is_red(left) {
            return Err(Error::ConsecutiveRed { slot: link, key: describe() });
        }

        let left_height = self.check_subtree(left, link, lower, Some(key), seen)?;
        let right_height = self.check_subtree(right, link, Some(key), upper, seen)?;
        if left_height != right_height {
            return Err(Error::BlackHeightMismatch {
                slot: link,
                key: describe(),
                left: left_height,
                right: right_height,
            });
        }

        let stored = self.storage.count(link);
        let expected = self.storage.count(left) + self.storage.count(right) + 1;
        if stored != expected {
            return Err(Error::CountMismatch { slot: link, key: describe(), stored, expected });
        }

        Ok(left_height + u32::from(!red))
    }

    /// Marks every slot on the free list, failing on a slot that is live, holds an entry, or repeats.
    fn check_free_list(&self, seen: &mut [bool]) -> Result<()> {
        let mut current = self.storage.available();
        while current != NULL {
            let slot = current as usize;
            let vacant = self.storage.get(current).is_some_and(|n| n.entry.is_none());
            if slot >= seen.len() || seen[slot] || !vacant {
                return Err(Error::FreeListCorrupt { slot: current });
            }
            seen[slot] = true;
            current = self.storage.right(current);
        }
        Ok(())
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Damage region lists.
//!
//! A [`RegionList`] collects rectangles that need to be redrawn or flushed.
//! Insertion is cheap and merges opportunistically via [`IntRect::merge`];
//! [`reduce`](RegionList::reduce) later produces a covering set in which no
//! two rectangles overlap, so that no pixel is drawn or flushed twice.

use alloc::vec::Vec;

use crate::geometry::IntRect;

/// An unordered list of damaged rectangles.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegionList {
    rects: Vec<IntRect>,
}

impl RegionList {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { rects: Vec::new() }
    }

    /// Returns the current rectangles.
    #[must_use]
    pub fn rects(&self) -> &[IntRect] {
        &self.rects
    }

    /// Returns `true` if the list holds no rectangles.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rects.is_empty()
    }

    /// Number of rectangles in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rects.len()
    }

    /// Adds `rect`, replacing the first entry it merges with exactly.
    ///
    /// Empty rectangles are ignored.
    pub fn add_rect(&mut self, rect: IntRect) {
        if rect.is_empty() {
            return;
        }
        for existing in &mut self.rects {
            let merged = rect.merge(existing);
            if !merged.is_empty() {
                *existing = merged;
                return;
            }
        }
        self.rects.push(rect);
    }

    /// Removes all rectangles.
    pub fn clear(&mut self) {
        self.rects.clear();
    }

    /// Coalesces overlapping rectangles in place and returns the new count.
    ///
    /// Rectangles are sorted by their top edge and swept once; each entry
    /// that overlaps its predecessor absorbs it (as a bounding union).
    /// Absorbed entries are dropped. The result is ordered by top edge and
    /// pairwise non-overlapping. Calling `reduce` again is a no-op.
    pub fn reduce(&mut self) -> usize {
        loop {
            self.sweep();
            if !self.absorb_overlapping_pair() {
                break;
            }
        }
        self.rects.len()
    }

    /// Reduces the list and hands the rectangles to the caller, leaving the
    /// list empty.
    pub fn dequeue(&mut self) -> Vec<IntRect> {
        self.reduce();
        core::mem::take(&mut self.rects)
    }

    /// One sorted sweep merging each rectangle into its overlapping
    /// successor.
    fn sweep(&mut self) {
        let rects = &mut self.rects;
        if rects.len() < 2 {
            return;
        }
        rects.sort_by_key(|r| r.y0);
        for idx in 1..rects.len() {
            if rects[idx].overlaps(&rects[idx - 1]) {
                rects[idx] = rects[idx].union(&rects[idx - 1]);
                rects[idx - 1] = IntRect::ZERO;
            }
        }
        rects.retain(|r| !r.is_empty());
    }

    /// The sweep only compares neighbours, so a union that grows sideways can
    /// still overlap an earlier survivor. Folds the first such pair.
    fn absorb_overlapping_pair(&mut self) -> bool {
        let rects = &mut self.rects;
        for i in 0..rects.len() {
            for j in (i + 1)..rects.len() {
                if rects[i].overlaps(&rects[j]) {
                    rects[i] = rects[i].union(&rects[j]);
                    rects.swap_remove(j);
                    return true;
                }
            }
        }
        false
    }
}

impl Extend<IntRect> for RegionList {
    fn extend<T: IntoIterator<Item = IntRect>>(&mut self, iter: T) {
        for rect in iter {
            self.add_rect(rect);
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    const fn r(x0: i32, y0: i32, x1: i32, y1: i32) -> IntRect {
        IntRect::new(x0, y0, x1, y1)
    }

    fn assert_disjoint(rects: &[IntRect]) {
        for (i, a) in rects.iter().enumerate() {
            for b in &rects[i + 1..] {
                assert!(!a.overlaps(b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn add_rect_merges_first_candidate() {
        let mut list = RegionList::new();
        list.add_rect(r(0, 0, 10, 10));
        list.add_rect(r(10, 0, 20, 10));
        assert_eq!(list.rects(), &[r(0, 0, 20, 10)], "adjacent columns merged");

        list.add_rect(r(50, 50, 60, 60));
        assert_eq!(list.len(), 2, "disjoint rect appended");

        list.add_rect(r(2, 2, 4, 4));
        assert_eq!(list.len(), 2, "contained rect absorbed");
    }

    #[test]
    fn add_rect_ignores_empty() {
        let mut list = RegionList::new();
        list.add_rect(IntRect::ZERO);
        list.add_rect(r(5, 5, 5, 10));
        assert!(list.is_empty(), "empty rects are not recorded");
    }

    #[test]
    fn reduce_unions_overlaps() {
        let mut list = RegionList::new();
        list.add_rect(r(0, 0, 10, 10));
        list.add_rect(r(5, 5, 15, 15));
        list.add_rect(r(100, 0, 110, 5));
        assert_eq!(list.reduce(), 2, "two groups remain");
        assert_disjoint(list.rects());
        assert!(list.rects().contains(&r(0, 0, 15, 15)), "overlap unioned");
    }

    #[test]
    fn reduce_catches_non_adjacent_overlap() {
        let mut list = RegionList::new();
        list.add_rect(r(0, 0, 10, 10));
        list.add_rect(r(20, 0, 30, 10));
        list.add_rect(r(0, 5, 10, 15));
        list.add_rect(r(8, 12, 25, 20));
        list.reduce();
        assert_disjoint(list.rects());
    }

    #[test]
    fn reduce_is_idempotent() {
        let mut list = RegionList::new();
        list.extend(vec![
            r(0, 0, 10, 10),
            r(5, 5, 15, 15),
            r(30, 2, 40, 8),
            r(12, 30, 20, 40),
            r(14, 35, 50, 45),
        ]);
        list.reduce();
        let once = list.clone();
        list.reduce();
        assert_eq!(list, once, "second reduce changes nothing");
    }

    #[test]
    fn dequeue_clears() {
        let mut list = RegionList::new();
        list.add_rect(r(0, 0, 4, 4));
        list.add_rect(r(2, 2, 6, 6));
        let rects = list.dequeue();
        assert_eq!(rects, vec![r(0, 0, 6, 6)], "single covering rect");
        assert!(list.is_empty(), "list is cleared");
        assert!(list.dequeue().is_empty(), "empty list dequeues nothing");
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invalidation propagation.
//!
//! Invalidating a rectangle walks from the layer up to its root. At each step
//! the rectangle is clipped to the current layer's bounds and, if the layer
//! is buffered, recorded in its invalid list; then it is translated into the
//! parent's coordinates.
//!
//! A non-root layer whose background is opaque ends the walk early: the
//! rectangle is parked in that layer's deferred list and the layer is marked
//! on the [`DEFERRED`](crate::dirty::DEFERRED) channel. Repeated small
//! invalidations inside an opaque panel therefore coalesce there, and
//! [`evaluate`](super::LayerTree::evaluate) forwards the merged result to the
//! ancestors once per update.

use super::id::{INVALID, LayerId};
use super::store::LayerTree;
use crate::dirty;
use crate::geometry::IntRect;

impl LayerTree {
    /// Invalidates the whole layer.
    pub fn invalidate(&mut self, id: LayerId) {
        self.validate(id);
        let bounds = self.local_bounds(id.idx);
        self.invalidate_rect(id, bounds);
    }

    /// Invalidates `rect`, given in the layer's own coordinates.
    pub fn invalidate_rect(&mut self, id: LayerId, rect: IntRect) {
        self.validate(id);
        self.dirty.mark(id.idx, dirty::CONTENT);
        self.propagate(id.idx, rect, false);
    }

    /// Returns `true` if any invalidation is parked at an opaque layer.
    #[must_use]
    pub fn has_deferred(&self) -> bool {
        self.deferred.iter().any(|list| !list.is_empty())
    }

    /// Walks `rect` (in `idx`'s coordinates) up to the root.
    ///
    /// With `force`, opaque layers do not stop the walk.
    pub(crate) fn propagate(&mut self, mut idx: u32, rect: IntRect, force: bool) {
        let mut rect = rect;
        loop {
            rect = rect.intersect(&self.local_bounds(idx));
            if rect.is_empty() {
                return;
            }
            if let Some(backing) = &mut self.backing[idx as usize] {
                backing.invalid.add_rect(rect);
            }
            let parent = self.parent[idx as usize];
            if parent == INVALID {
                return;
            }
            if !force && self.is_opaque_at(idx) {
                self.deferred[idx as usize].add_rect(rect);
                self.dirty.mark(idx, dirty::DEFERRED);
                return;
            }
            let frame = self.frame[idx as usize];
            rect = rect.offset(frame.x0, frame.y0);
            idx = parent;
        }
    }

    /// Forwards the deferred invalidations of `idx` past it to its
    /// ancestors. Returns `true` if anything was forwarded.
    pub(crate) fn forward_deferred(&mut self, idx: u32) -> bool {
        let rects = self.deferred[idx as usize].dequeue();
        let parent = self.parent[idx as usize];
        if rects.is_empty() || parent == INVALID {
            return false;
        }
        let frame = self.frame[idx as usize];
        for rect in rects {
            self.propagate(parent, rect.offset(frame.x0, frame.y0), true);
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba8;

    fn clear_invalid(tree: &mut LayerTree, id: LayerId) {
        if let Some(backing) = &mut tree.backing[id.idx as usize] {
            backing.invalid.clear();
        }
    }

    fn tree_with_root(size: i32) -> (LayerTree, LayerId) {
        let mut tree = LayerTree::new();
        let root = tree.create_buffered_layer();
        tree.set_frame(root, IntRect::new(0, 0, size, size));
        let _ = tree.evaluate();
        clear_invalid(&mut tree, root);
        (tree, root)
    }

    #[test]
    fn invalidation_reaches_root_in_root_coordinates() {
        let (mut tree, root) = tree_with_root(100);
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(10, 20, 40, 50));
        tree.add_child(root, child);
        clear_invalid(&mut tree, root);

        tree.invalidate_rect(child, IntRect::new(5, 5, 10, 10));
        assert_eq!(
            tree.invalid_rects(root),
            &[IntRect::new(15, 25, 20, 30)],
            "translated by the child's origin"
        );
    }

    #[test]
    fn invalidation_is_clipped_to_each_layer() {
        let (mut tree, root) = tree_with_root(50);
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(40, 40, 80, 80));
        tree.add_child(root, child);
        clear_invalid(&mut tree, root);

        tree.invalidate_rect(child, IntRect::new(-100, -100, 1000, 1000));
        assert_eq!(tree.invalid_rects(root), &[IntRect::new(40, 40, 50, 50)], "clipped");

        clear_invalid(&mut tree, root);
        tree.invalidate_rect(child, IntRect::new(100, 100, 120, 120));
        assert!(tree.invalid_rects(root).is_empty(), "outside the child");
    }

    #[test]
    fn opaque_layer_defers_until_evaluate() {
        let (mut tree, root) = tree_with_root(100);
        let panel = tree.create_layer();
        tree.set_frame(panel, IntRect::new(10, 10, 90, 90));
        tree.set_background(panel, Some(Rgba8::BLACK));
        let dot = tree.create_layer();
        tree.set_frame(dot, IntRect::new(0, 0, 4, 4));
        tree.add_child(root, panel);
        tree.add_child(panel, dot);
        let _ = tree.evaluate();
        clear_invalid(&mut tree, root);

        tree.invalidate(dot);
        tree.invalidate_rect(dot, IntRect::new(0, 0, 2, 2));
        assert!(tree.invalid_rects(root).is_empty(), "held at the opaque panel");
        assert!(tree.has_deferred(), "parked");

        let changes = tree.evaluate();
        assert_eq!(changes.deferred, &[panel.idx], "panel forwarded");
        assert_eq!(
            tree.invalid_rects(root),
            &[IntRect::new(10, 10, 14, 14)],
            "merged rect arrives once"
        );
        assert!(!tree.has_deferred(), "drained");
    }

    #[test]
    fn translucent_layer_does_not_defer() {
        let (mut tree, root) = tree_with_root(100);
        let panel = tree.create_layer();
        tree.set_frame(panel, IntRect::new(10, 10, 90, 90));
        tree.set_background(panel, Some(Rgba8::new(0, 0, 0, 0x80)));
        tree.add_child(root, panel);
        clear_invalid(&mut tree, root);

        tree.invalidate_rect(panel, IntRect::new(0, 0, 5, 5));
        assert_eq!(tree.invalid_rects(root), &[IntRect::new(10, 10, 15, 15)], "direct");
    }

    #[test]
    fn frame_change_invalidates_old_and_new() {
        let (mut tree, root) = tree_with_root(100);
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(0, 0, 10, 10));
        tree.add_child(root, child);
        clear_invalid(&mut tree, root);

        tree.set_frame(child, IntRect::new(0, 0, 10, 10));
        assert!(tree.invalid_rects(root).is_empty(), "unchanged frame is a no-op");

        tree.set_frame(child, IntRect::new(50, 50, 60, 60));
        let rects = tree.invalid_rects(root);
        assert!(rects.contains(&IntRect::new(0, 0, 10, 10)), "old frame");
        assert!(rects.contains(&IntRect::new(50, 50, 60, 60)), "new frame");
    }

    #[test]
    fn insert_invalidates_overlapping_siblings_above() {
        let (mut tree, root) = tree_with_root(100);
        let low = tree.create_layer();
        let high = tree.create_layer();
        let far = tree.create_layer();
        tree.set_frame(low, IntRect::new(0, 0, 20, 20));
        tree.set_frame(high, IntRect::new(10, 10, 40, 40));
        tree.set_frame(far, IntRect::new(80, 80, 90, 90));
        tree.add_child(root, high);
        tree.add_child(root, far);
        clear_invalid(&mut tree, root);

        tree.insert_child(root, low, 0);
        let rects = tree.backing[root.idx as usize]
            .as_mut()
            .map(|b| b.invalid.dequeue())
            .unwrap_or_default();
        assert!(
            rects.iter().any(|r| r.contains_rect(&IntRect::new(10, 10, 40, 40))),
            "overlapping sibling above is repainted"
        );
        assert!(
            !rects.iter().any(|r| r.overlaps(&IntRect::new(80, 80, 90, 90))),
            "disjoint sibling untouched"
        );
    }

    #[test]
    fn removal_invalidates_vacated_area() {
        let (mut tree, root) = tree_with_root(100);
        let child = tree.create_layer();
        tree.set_frame(child, IntRect::new(30, 30, 40, 40));
        tree.add_child(root, child);
        clear_invalid(&mut tree, root);

        tree.remove_from_parent(child);
        assert_eq!(tree.invalid_rects(root), &[IntRect::new(30, 30, 40, 40)], "vacated");
    }
}

// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hit-testing.

use super::id::{INVALID, LayerId};
use super::store::LayerTree;
use crate::color::Rgba8;
use crate::geometry::IntPoint;

/// The result of a successful hit test.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitTarget {
    /// An interactive layer that should receive the touch.
    Layer(LayerId),
    /// A non-interactive layer with an opaque background covers the point;
    /// the touch is swallowed.
    Blocker,
}

impl LayerTree {
    /// Finds the topmost layer under `point` in the subtree rooted at `id`.
    ///
    /// `point` is in the coordinate space of `id`'s parent (screen space for
    /// a window root). Children are visited top to bottom, and a layer's
    /// children are only considered when the point lies inside the layer.
    #[must_use]
    pub fn hit_test(&self, id: LayerId, point: IntPoint) -> Option<HitTarget> {
        self.validate(id);
        self.hit_at(id.idx, point)
    }

    fn hit_at(&self, idx: u32, point: IntPoint) -> Option<HitTarget> {
        let frame = self.frame[idx as usize];
        if !frame.contains(point) {
            return None;
        }
        let local = point.offset(-frame.x0, -frame.y0);
        let mut child = self.last_child(idx);
        while child != INVALID {
            if let Some(hit) = self.hit_at(child, local) {
                return Some(hit);
            }
            child = self.prev_sibling[child as usize];
        }
        if self.is_interactive_at(idx) {
            Some(HitTarget::Layer(self.id_at(idx)))
        } else if self.background[idx as usize].is_some_and(Rgba8::is_opaque) {
            Some(HitTarget::Blocker)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;

    use super::*;
    use crate::geometry::IntRect;
    use crate::layer::LayerDelegate;

    struct Tappable;

    impl LayerDelegate for Tappable {
        fn is_interactive(&self) -> bool {
            true
        }
    }

    fn setup() -> (LayerTree, LayerId, LayerId, LayerId) {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        tree.set_frame(root, IntRect::new(0, 0, 100, 100));
        let low = tree.create_layer();
        tree.set_frame(low, IntRect::new(10, 10, 60, 60));
        tree.set_delegate(low, Box::new(Tappable));
        let high = tree.create_layer();
        tree.set_frame(high, IntRect::new(40, 40, 90, 90));
        tree.set_delegate(high, Box::new(Tappable));
        tree.add_child(root, low);
        tree.add_child(root, high);
        (tree, root, low, high)
    }

    #[test]
    fn topmost_child_wins() {
        let (tree, root, low, high) = setup();
        assert_eq!(
            tree.hit_test(root, IntPoint::new(50, 50)),
            Some(HitTarget::Layer(high)),
            "overlap goes to the later child"
        );
        assert_eq!(
            tree.hit_test(root, IntPoint::new(15, 15)),
            Some(HitTarget::Layer(low)),
            "only the lower child"
        );
        assert_eq!(tree.hit_test(root, IntPoint::new(95, 5)), None, "empty root area");
    }

    #[test]
    fn opaque_background_blocks() {
        let (mut tree, root, low, _) = setup();
        let shield = tree.create_layer();
        tree.set_frame(shield, IntRect::new(0, 0, 30, 30));
        tree.set_background(shield, Some(Rgba8::BLACK));
        tree.add_child(root, shield);
        assert_eq!(
            tree.hit_test(root, IntPoint::new(15, 15)),
            Some(HitTarget::Blocker),
            "shield swallows the touch"
        );

        tree.set_background(shield, Some(Rgba8::new(0, 0, 0, 0x40)));
        assert_eq!(
            tree.hit_test(root, IntPoint::new(15, 15)),
            Some(HitTarget::Layer(low)),
            "translucent layers let touches through"
        );
    }

    #[test]
    fn nested_points_are_translated() {
        let (mut tree, _, low, _) = setup();
        let button = tree.create_layer();
        tree.set_frame(button, IntRect::new(5, 5, 10, 10));
        tree.set_delegate(button, Box::new(Tappable));
        tree.add_child(low, button);
        assert_eq!(
            tree.hit_test(low, IntPoint::new(16, 16)),
            Some(HitTarget::Layer(button)),
            "(16,16) in root space is (1,1) inside the button"
        );
    }

    #[test]
    fn children_outside_parent_are_unreachable() {
        let (mut tree, root, low, _) = setup();
        let stray = tree.create_layer();
        tree.set_frame(stray, IntRect::new(100, 100, 120, 120));
        tree.set_delegate(stray, Box::new(Tappable));
        tree.add_child(low, stray);
        assert_eq!(tree.hit_test(root, IntPoint::new(115, 115)), None, "clipped away");
    }
}

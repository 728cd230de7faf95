// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-update evaluation and change tracking.
//!
//! Evaluation drains each dirty channel once per window update:
//!
//! 1. **DEFERRED**: forward invalidations parked at opaque layers to their
//!    ancestors, so that the following render pass sees them.
//! 2. **FRAME**: collect layers whose frame changed, plus (through
//!    dependency edges) all of their descendants, whose screen position moved
//!    with them.
//! 3. **CONTENT** / **TOPOLOGY**: collect; nothing to recompute.
//!
//! [`FrameChanges`] uses raw slot indices (`u32`) rather than [`LayerId`]
//! handles, matching the indices carried by trace events.
//!
//! [`LayerId`]: super::LayerId

use alloc::vec::Vec;

use super::store::LayerTree;
use crate::dirty;

/// The set of changes produced by a single [`LayerTree::evaluate`] call.
#[derive(Clone, Debug, Default)]
pub struct FrameChanges {
    /// Layers that moved or resized, directly or through an ancestor.
    pub frames: Vec<u32>,
    /// Layers that were explicitly invalidated or restyled.
    pub content: Vec<u32>,
    /// Opaque layers whose parked invalidations were forwarded.
    pub deferred: Vec<u32>,
    /// Layers created since the last evaluate.
    pub added: Vec<u32>,
    /// Layers destroyed since the last evaluate.
    pub removed: Vec<u32>,
    /// Whether any layer was created, destroyed, attached, or detached.
    pub topology_changed: bool,
}

impl FrameChanges {
    /// Clears all change lists.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.content.clear();
        self.deferred.clear();
        self.added.clear();
        self.removed.clear();
        self.topology_changed = false;
    }

    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
            && self.content.is_empty()
            && self.deferred.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && !self.topology_changed
    }
}

impl LayerTree {
    /// Forwards deferred invalidations and returns the set of changes since
    /// the previous call.
    pub fn evaluate(&mut self) -> FrameChanges {
        let mut changes = FrameChanges::default();
        self.evaluate_into(&mut changes);
        changes
    }

    /// Like [`evaluate`](Self::evaluate), but reuses a caller-provided buffer
    /// to avoid allocation.
    pub fn evaluate_into(&mut self, changes: &mut FrameChanges) {
        changes.clear();

        let deferred: Vec<u32> = self
            .dirty
            .drain(dirty::DEFERRED)
            .deterministic()
            .run()
            .collect();
        for idx in deferred {
            if self.forward_deferred(idx) {
                changes.deferred.push(idx);
            }
        }

        changes.frames = self
            .dirty
            .drain(dirty::FRAME)
            .affected()
            .deterministic()
            .run()
            .collect();

        changes.content = self
            .dirty
            .drain(dirty::CONTENT)
            .deterministic()
            .run()
            .collect();

        let topology: Vec<u32> = self
            .dirty
            .drain(dirty::TOPOLOGY)
            .deterministic()
            .run()
            .collect();
        changes.topology_changed = !topology.is_empty();

        core::mem::swap(&mut self.pending_added, &mut changes.added);
        core::mem::swap(&mut self.pending_removed, &mut changes.removed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::IntRect;

    #[test]
    fn no_change_evaluate_returns_empty() {
        let mut tree = LayerTree::new();
        let _root = tree.create_layer();
        let first = tree.evaluate();
        assert!(first.topology_changed, "creation is a topology change");
        assert_eq!(first.added.len(), 1, "one layer added");

        let second = tree.evaluate();
        assert!(second.is_empty(), "nothing changed: {second:?}");
    }

    #[test]
    fn frame_changes_reach_descendants() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let panel = tree.create_layer();
        let leaf = tree.create_layer();
        let other = tree.create_layer();
        tree.add_child(root, panel);
        tree.add_child(panel, leaf);
        tree.add_child(root, other);
        let _ = tree.evaluate();

        tree.set_frame(panel, IntRect::new(5, 5, 20, 20));
        let changes = tree.evaluate();
        assert!(changes.frames.contains(&panel.index()), "moved layer");
        assert!(changes.frames.contains(&leaf.index()), "descendant moved too");
        assert!(!changes.frames.contains(&other.index()), "sibling unaffected");
    }

    #[test]
    fn detached_child_stops_following_parent() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let child = tree.create_layer();
        tree.add_child(root, child);
        tree.remove_from_parent(child);
        let _ = tree.evaluate();

        tree.set_frame(root, IntRect::new(0, 0, 10, 10));
        let changes = tree.evaluate();
        assert!(!changes.frames.contains(&child.index()), "edge removed");
    }

    #[test]
    fn content_and_lifecycle_are_reported() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let doomed = tree.create_layer();
        let _ = tree.evaluate();

        tree.invalidate(root);
        tree.destroy_layer(doomed);
        let changes = tree.evaluate();
        assert_eq!(changes.content, &[root.index()], "invalidated");
        assert_eq!(changes.removed, &[doomed.index()], "destroyed");
        assert!(changes.topology_changed, "destroy is structural");
    }

    #[test]
    fn evaluate_into_reuses_buffer() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let mut changes = FrameChanges::default();
        tree.evaluate_into(&mut changes);
        assert!(!changes.added.is_empty(), "creation reported");

        tree.invalidate(root);
        tree.evaluate_into(&mut changes);
        assert!(changes.added.is_empty(), "cleared between calls");
        assert_eq!(changes.content, &[root.index()], "fresh content");
    }
}

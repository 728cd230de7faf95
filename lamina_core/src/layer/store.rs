// Copyright 2026 the Lamina Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Struct-of-arrays layer storage with allocation, topology, and property management.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::any::Any;
use core::fmt;

use understory_dirty::{CycleHandling, DirtyTracker, EagerPolicy};

use super::delegate::LayerDelegate;
use super::id::{INVALID, LayerId};
use super::traverse::Children;
use crate::buffer::PixelBuffer;
use crate::color::Rgba8;
use crate::dirty;
use crate::geometry::{IntPoint, IntRect, IntSize};
use crate::region::RegionList;

/// Off-screen pixels owned by a buffered layer.
#[derive(Debug)]
pub(crate) struct Backing {
    pub(crate) buffer: PixelBuffer,
    /// Buffer-local rectangles that must be re-rendered before compositing.
    pub(crate) invalid: RegionList,
}

impl Backing {
    fn new() -> Self {
        Self {
            buffer: PixelBuffer::new(IntSize::ZERO),
            invalid: RegionList::new(),
        }
    }
}

/// Struct-of-arrays storage for a tree of rectangular layers.
///
/// Layers are addressed by [`LayerId`] handles. Internally, each layer occupies
/// a slot in parallel arrays. Destroyed layers are recycled via a free list,
/// and generation counters prevent stale handle access.
///
/// A layer's frame is expressed in its parent's coordinate space; everything
/// else about the layer (drawing, hit-testing, invalidation rectangles) uses
/// its own coordinate space, whose origin is the frame's top-left corner.
pub struct LayerTree {
    // -- Topology --
    pub(crate) parent: Vec<u32>,
    pub(crate) first_child: Vec<u32>,
    pub(crate) next_sibling: Vec<u32>,
    pub(crate) prev_sibling: Vec<u32>,

    // -- Properties (set by callers) --
    pub(crate) frame: Vec<IntRect>,
    pub(crate) corner_radius: Vec<u32>,
    pub(crate) background: Vec<Option<Rgba8>>,
    pub(crate) delegate: Vec<Option<Box<dyn LayerDelegate>>>,

    // -- Rendering state --
    pub(crate) backing: Vec<Option<Backing>>,
    pub(crate) deferred: Vec<RegionList>,

    // -- Allocation --
    pub(crate) generation: Vec<u32>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) len: u32,

    // -- Dirty tracking --
    pub(crate) dirty: DirtyTracker<u32>,

    // -- Lifecycle tracking --
    pub(crate) pending_added: Vec<u32>,
    pub(crate) pending_removed: Vec<u32>,
}

impl fmt::Debug for LayerTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayerTree")
            .field("len", &self.len)
            .field("free", &self.free_list.len())
            .finish_non_exhaustive()
    }
}

impl Default for LayerTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            parent: Vec::new(),
            first_child: Vec::new(),
            next_sibling: Vec::new(),
            prev_sibling: Vec::new(),
            frame: Vec::new(),
            corner_radius: Vec::new(),
            background: Vec::new(),
            delegate: Vec::new(),
            backing: Vec::new(),
            deferred: Vec::new(),
            generation: Vec::new(),
            free_list: Vec::new(),
            len: 0,
            dirty: DirtyTracker::with_cycle_handling(CycleHandling::Error),
            pending_added: Vec::new(),
            pending_removed: Vec::new(),
        }
    }

    // -- Allocation API --

    /// Creates a new layer and returns its handle.
    ///
    /// The layer starts with an empty frame, no background, no corner radius,
    /// no delegate, and no parent.
    pub fn create_layer(&mut self) -> LayerId {
        let idx = if let Some(idx) = self.free_list.pop() {
            let i = idx as usize;
            self.generation[i] += 1;
            self.parent[i] = INVALID;
            self.first_child[i] = INVALID;
            self.next_sibling[i] = INVALID;
            self.prev_sibling[i] = INVALID;
            self.frame[i] = IntRect::ZERO;
            self.corner_radius[i] = 0;
            self.background[i] = None;
            self.delegate[i] = None;
            self.backing[i] = None;
            self.deferred[i].clear();
            idx
        } else {
            let idx = self.len;
            self.len += 1;
            self.parent.push(INVALID);
            self.first_child.push(INVALID);
            self.next_sibling.push(INVALID);
            self.prev_sibling.push(INVALID);
            self.frame.push(IntRect::ZERO);
            self.corner_radius.push(0);
            self.background.push(None);
            self.delegate.push(None);
            self.backing.push(None);
            self.deferred.push(RegionList::new());
            self.generation.push(0);
            idx
        };

        self.pending_added.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);

        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    /// Creates a layer that renders its subtree into an off-screen buffer.
    ///
    /// The buffer is sized by [`set_frame`](Self::set_frame). Only the
    /// invalid parts of the buffer are re-rendered; the rest is composited
    /// from the previous contents.
    pub fn create_buffered_layer(&mut self) -> LayerId {
        let id = self.create_layer();
        self.backing[id.idx as usize] = Some(Backing::new());
        id
    }

    /// Destroys a layer, freeing its slot for reuse.
    ///
    /// An attached layer is detached first, invalidating the area it covered.
    ///
    /// # Panics
    ///
    /// Panics if the layer has children (remove them first) or if the handle
    /// is stale.
    pub fn destroy_layer(&mut self, id: LayerId) {
        self.validate(id);
        let idx = id.idx;
        assert!(
            self.first_child[idx as usize] == INVALID,
            "cannot destroy layer with children"
        );

        if self.parent[idx as usize] != INVALID {
            self.detach(idx);
        }

        self.dirty.remove_key(idx);
        self.delegate[idx as usize] = None;
        self.backing[idx as usize] = None;
        self.deferred[idx as usize].clear();

        // Bump generation so old handles immediately fail validation.
        self.generation[idx as usize] += 1;

        self.free_list.push(idx);
        self.pending_removed.push(idx);
        self.dirty.mark(idx, dirty::TOPOLOGY);
    }

    /// Destroys a layer and all of its descendants.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn destroy_subtree(&mut self, id: LayerId) {
        self.validate(id);
        let mut stack = alloc::vec![id];
        let mut order = Vec::new();
        while let Some(next) = stack.pop() {
            order.push(next);
            stack.extend(self.children(next));
        }
        // Children before parents, so every destroy sees a leaf.
        for layer in order.into_iter().rev() {
            self.destroy_layer(layer);
        }
    }

    /// Returns whether the given handle refers to a live layer.
    #[must_use]
    pub fn is_alive(&self, id: LayerId) -> bool {
        (id.idx < self.len)
            && self.generation[id.idx as usize] == id.generation
            && !self.free_list.contains(&id.idx)
    }

    // -- Topology API --

    /// Adds `child` as the topmost child of `parent`.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, or if `child` already has a parent.
    pub fn add_child(&mut self, parent: LayerId, child: LayerId) {
        let count = self.children(parent).count();
        self.insert_child(parent, child, count);
    }

    /// Inserts `child` at `index` in `parent`'s child list (0 is the bottom
    /// of the z-order). Indices past the end append.
    ///
    /// Invalidates the child's frame and the frames of siblings above it
    /// that overlap it.
    ///
    /// # Panics
    ///
    /// Panics if either handle is stale, if `child` already has a parent, or
    /// if `child` is an ancestor of `parent`.
    pub fn insert_child(&mut self, parent: LayerId, child: LayerId, index: usize) {
        self.validate(parent);
        self.validate(child);
        let p = parent.idx;
        let c = child.idx;
        assert!(p != c, "a layer cannot be its own child");
        assert!(
            self.parent[c as usize] == INVALID,
            "child already has a parent"
        );
        let mut up = self.parent[p as usize];
        while up != INVALID {
            assert!(up != c, "child is an ancestor of parent");
            up = self.parent[up as usize];
        }

        let before = self.children(parent).nth(index).map(|l| l.idx);
        self.parent[c as usize] = p;
        match before {
            Some(s) => {
                let prev = self.prev_sibling[s as usize];
                self.next_sibling[c as usize] = s;
                self.prev_sibling[c as usize] = prev;
                if prev == INVALID {
                    self.first_child[p as usize] = c;
                } else {
                    self.next_sibling[prev as usize] = c;
                }
                self.prev_sibling[s as usize] = c;
            }
            None => {
                self.next_sibling[c as usize] = INVALID;
                let last = self.last_child(p);
                self.prev_sibling[c as usize] = last;
                if last == INVALID {
                    self.first_child[p as usize] = c;
                } else {
                    self.next_sibling[last as usize] = c;
                }
            }
        }

        // Frame changes of the parent move the child on screen.
        let _ = self.dirty.add_dependency(c, p, dirty::FRAME);
        self.dirty.mark_with(c, dirty::FRAME, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);

        let frame = self.frame[c as usize];
        self.propagate(p, frame, false);
        let mut above = self.next_sibling[c as usize];
        while above != INVALID {
            let sibling = self.frame[above as usize];
            if sibling.overlaps(&frame) {
                self.propagate(p, sibling, false);
            }
            above = self.next_sibling[above as usize];
        }
    }

    /// Detaches `child` from `parent`.
    ///
    /// # Panics
    ///
    /// Panics if a handle is stale or `child` is not a child of `parent`.
    pub fn remove_child(&mut self, parent: LayerId, child: LayerId) {
        self.validate(parent);
        self.validate(child);
        assert!(
            self.parent[child.idx as usize] == parent.idx,
            "layer is not a child of the given parent"
        );
        self.detach(child.idx);
    }

    /// Detaches a layer from its parent, invalidating the area it covered.
    ///
    /// Does nothing if the layer has no parent.
    ///
    /// # Panics
    ///
    /// Panics if the handle is stale.
    pub fn remove_from_parent(&mut self, child: LayerId) {
        self.validate(child);
        if self.parent[child.idx as usize] != INVALID {
            self.detach(child.idx);
        }
    }

    /// Returns the parent of a layer, if any.
    #[must_use]
    pub fn parent(&self, id: LayerId) -> Option<LayerId> {
        self.validate(id);
        let p = self.parent[id.idx as usize];
        (p != INVALID).then(|| self.id_at(p))
    }

    /// Returns an iterator over the direct children of a layer, bottom to top.
    #[must_use]
    pub fn children(&self, id: LayerId) -> Children<'_> {
        self.validate(id);
        Children::new(
            self,
            self.first_child[id.idx as usize],
            self.last_child(id.idx),
        )
    }

    /// Returns the live layers that have no parent.
    #[must_use]
    pub fn roots(&self) -> Vec<LayerId> {
        (0..self.len)
            .filter(|&idx| self.parent[idx as usize] == INVALID && !self.free_list.contains(&idx))
            .map(|idx| self.id_at(idx))
            .collect()
    }

    /// Returns the position of the layer's top-left corner in the
    /// coordinate space of its root's parent (screen space, for a tree
    /// attached to a window).
    #[must_use]
    pub fn screen_origin(&self, id: LayerId) -> IntPoint {
        self.validate(id);
        let mut origin = IntPoint::ZERO;
        let mut idx = id.idx;
        while idx != INVALID {
            let frame = self.frame[idx as usize];
            origin = origin.offset(frame.x0, frame.y0);
            idx = self.parent[idx as usize];
        }
        origin
    }

    // -- Property getters --

    /// Returns the frame of a layer, in its parent's coordinates.
    #[must_use]
    pub fn frame(&self, id: LayerId) -> IntRect {
        self.validate(id);
        self.frame[id.idx as usize]
    }

    /// Returns the layer's own bounds: its frame moved to the origin.
    #[must_use]
    pub fn bounds(&self, id: LayerId) -> IntRect {
        self.validate(id);
        self.local_bounds(id.idx)
    }

    /// Returns the background color of a layer.
    #[must_use]
    pub fn background(&self, id: LayerId) -> Option<Rgba8> {
        self.validate(id);
        self.background[id.idx as usize]
    }

    /// Returns the corner radius used for the background and buffer mask.
    #[must_use]
    pub fn corner_radius(&self, id: LayerId) -> u32 {
        self.validate(id);
        self.corner_radius[id.idx as usize]
    }

    /// Returns `true` if the layer's background fully covers its frame.
    ///
    /// Rounded layers are never opaque, since their corners show what is
    /// beneath.
    #[must_use]
    pub fn is_opaque(&self, id: LayerId) -> bool {
        self.validate(id);
        self.is_opaque_at(id.idx)
    }

    /// Returns `true` if the layer renders through an off-screen buffer.
    #[must_use]
    pub fn is_buffered(&self, id: LayerId) -> bool {
        self.validate(id);
        self.backing[id.idx as usize].is_some()
    }

    /// Returns the buffer of a buffered layer.
    #[must_use]
    pub fn buffer(&self, id: LayerId) -> Option<&PixelBuffer> {
        self.validate(id);
        self.backing[id.idx as usize].as_ref().map(|b| &b.buffer)
    }

    pub(crate) fn buffer_mut(&mut self, id: LayerId) -> Option<&mut PixelBuffer> {
        self.validate(id);
        self.backing[id.idx as usize].as_mut().map(|b| &mut b.buffer)
    }

    /// Returns the buffer-local rectangles awaiting re-render.
    #[must_use]
    pub fn invalid_rects(&self, id: LayerId) -> &[IntRect] {
        self.validate(id);
        self.backing[id.idx as usize]
            .as_ref()
            .map_or(&[], |b| b.invalid.rects())
    }

    // -- Mutation API --

    /// Moves or resizes a layer.
    ///
    /// Does nothing if the frame is unchanged. Otherwise the old and new
    /// frames are invalidated in the parent (a root invalidates itself). A
    /// buffered layer whose size changes gets a fresh, fully invalid buffer;
    /// a pure move keeps its pixels.
    pub fn set_frame(&mut self, id: LayerId, frame: IntRect) {
        self.validate(id);
        let idx = id.idx as usize;
        let old = self.frame[idx];
        if old == frame {
            return;
        }
        self.frame[idx] = frame;

        if let Some(backing) = &mut self.backing[idx]
            && old.size() != frame.size()
        {
            backing.buffer = PixelBuffer::new(frame.size());
            backing.invalid.clear();
            backing.invalid.add_rect(IntRect::from_size(frame.size()));
        }

        let p = self.parent[idx];
        if p == INVALID {
            self.propagate(id.idx, self.local_bounds(id.idx), false);
        } else {
            self.propagate(p, old, false);
            self.propagate(p, frame, false);
        }
        self.dirty.mark_with(id.idx, dirty::FRAME, &EagerPolicy);
    }

    /// Sets the background color (`None` for none) and invalidates the layer.
    pub fn set_background(&mut self, id: LayerId, background: Option<Rgba8>) {
        self.validate(id);
        if self.background[id.idx as usize] != background {
            self.background[id.idx as usize] = background;
            self.invalidate(id);
        }
    }

    /// Sets the corner radius and invalidates the layer.
    pub fn set_corner_radius(&mut self, id: LayerId, radius: u32) {
        self.validate(id);
        if self.corner_radius[id.idx as usize] != radius {
            self.corner_radius[id.idx as usize] = radius;
            self.invalidate(id);
        }
    }

    // -- Delegates --

    /// Installs the behaviour that draws the layer and handles its touches,
    /// replacing any previous delegate, and invalidates the layer.
    pub fn set_delegate(&mut self, id: LayerId, delegate: Box<dyn LayerDelegate>) {
        self.validate(id);
        self.delegate[id.idx as usize] = Some(delegate);
        self.invalidate(id);
    }

    /// Removes and returns the layer's delegate.
    pub fn take_delegate(&mut self, id: LayerId) -> Option<Box<dyn LayerDelegate>> {
        self.validate(id);
        let delegate = self.delegate[id.idx as usize].take();
        if delegate.is_some() {
            self.invalidate(id);
        }
        delegate
    }

    /// Returns the delegate if it is a `T`.
    #[must_use]
    pub fn delegate<T: LayerDelegate>(&self, id: LayerId) -> Option<&T> {
        self.validate(id);
        let delegate: &dyn Any = self.delegate[id.idx as usize].as_deref()?;
        delegate.downcast_ref::<T>()
    }

    /// Runs `f` on the delegate if it is a `T`, then invalidates the layer.
    ///
    /// Returns `None` (and invalidates nothing) if the layer has no delegate
    /// of that type.
    pub fn update_delegate<T: LayerDelegate, R>(
        &mut self,
        id: LayerId,
        f: impl FnOnce(&mut T) -> R,
    ) -> Option<R> {
        self.validate(id);
        let delegate: &mut dyn Any = self.delegate[id.idx as usize].as_deref_mut()?;
        let result = f(delegate.downcast_mut::<T>()?);
        self.invalidate(id);
        Some(result)
    }

    // -- Internal helpers --

    /// Panics if the handle is stale.
    pub(crate) fn validate(&self, id: LayerId) {
        assert!(
            id.idx < self.len && self.generation[id.idx as usize] == id.generation,
            "stale LayerId: {id:?} (current gen: {})",
            if id.idx < self.len {
                self.generation[id.idx as usize]
            } else {
                u32::MAX
            }
        );
    }

    pub(crate) fn id_at(&self, idx: u32) -> LayerId {
        LayerId {
            idx,
            generation: self.generation[idx as usize],
        }
    }

    pub(crate) fn local_bounds(&self, idx: u32) -> IntRect {
        IntRect::from_size(self.frame[idx as usize].size())
    }

    pub(crate) fn is_opaque_at(&self, idx: u32) -> bool {
        self.corner_radius[idx as usize] == 0
            && self.background[idx as usize].is_some_and(Rgba8::is_opaque)
    }

    pub(crate) fn last_child(&self, idx: u32) -> u32 {
        let mut last = self.first_child[idx as usize];
        if last == INVALID {
            return INVALID;
        }
        while self.next_sibling[last as usize] != INVALID {
            last = self.next_sibling[last as usize];
        }
        last
    }

    /// Unlinks an attached layer and invalidates the area it vacated.
    fn detach(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        self.unlink_from_parent(idx);
        self.dirty.remove_dependency(idx, p, dirty::FRAME);
        self.dirty.mark_with(idx, dirty::FRAME, &EagerPolicy);
        self.dirty.mark(p, dirty::TOPOLOGY);
        let vacated = self.frame[idx as usize];
        self.propagate(p, vacated, false);
    }

    /// Removes `idx` from its parent's child list without touching dirty state.
    fn unlink_from_parent(&mut self, idx: u32) {
        let p = self.parent[idx as usize];
        let prev = self.prev_sibling[idx as usize];
        let next = self.next_sibling[idx as usize];

        if prev != INVALID {
            self.next_sibling[prev as usize] = next;
        } else {
            self.first_child[p as usize] = next;
        }

        if next != INVALID {
            self.prev_sibling[next as usize] = prev;
        }

        self.parent[idx as usize] = INVALID;
        self.prev_sibling[idx as usize] = INVALID;
        self.next_sibling[idx as usize] = INVALID;
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    #[test]
    fn create_and_destroy() {
        let mut tree = LayerTree::new();
        let id = tree.create_layer();
        assert!(tree.is_alive(id), "fresh layer is alive");
        tree.destroy_layer(id);
        assert!(!tree.is_alive(id), "destroyed layer is dead");
    }

    #[test]
    fn generation_prevents_stale_access() {
        let mut tree = LayerTree::new();
        let id1 = tree.create_layer();
        tree.destroy_layer(id1);
        let id2 = tree.create_layer();
        assert!(!tree.is_alive(id1), "old handle is stale");
        assert!(tree.is_alive(id2), "new handle is live");
        assert_eq!(id1.idx, id2.idx, "slot reused");
        assert_ne!(id1.generation, id2.generation, "generation bumped");
    }

    #[test]
    fn reused_slot_starts_clean() {
        let mut tree = LayerTree::new();
        let id = tree.create_buffered_layer();
        tree.set_frame(id, IntRect::new(1, 2, 3, 4));
        tree.set_background(id, Some(Rgba8::WHITE));
        tree.destroy_layer(id);

        let id = tree.create_layer();
        assert_eq!(tree.frame(id), IntRect::ZERO, "frame reset");
        assert_eq!(tree.background(id), None, "background reset");
        assert!(!tree.is_buffered(id), "backing dropped");
    }

    #[test]
    fn insert_orders_children() {
        let mut tree = LayerTree::new();
        let parent = tree.create_layer();
        let a = tree.create_layer();
        let b = tree.create_layer();
        let c = tree.create_layer();
        let d = tree.create_layer();

        tree.add_child(parent, a);
        tree.add_child(parent, c);
        tree.insert_child(parent, b, 1);
        tree.insert_child(parent, d, 99);

        let kids: Vec<_> = tree.children(parent).collect();
        assert_eq!(kids, vec![a, b, c, d], "bottom to top");
        let rev: Vec<_> = tree.children(parent).rev().collect();
        assert_eq!(rev, vec![d, c, b, a], "top to bottom");

        let e = tree.create_layer();
        tree.insert_child(parent, e, 0);
        assert_eq!(tree.children(parent).next(), Some(e), "new first child");
    }

    #[test]
    fn children_iterates_from_both_ends() {
        let mut tree = LayerTree::new();
        let parent = tree.create_layer();
        let kids: Vec<_> = (0..3).map(|_| tree.create_layer()).collect();
        for &kid in &kids {
            tree.add_child(parent, kid);
        }
        let mut iter = tree.children(parent);
        assert_eq!(iter.next(), Some(kids[0]), "front");
        assert_eq!(iter.next_back(), Some(kids[2]), "back");
        assert_eq!(iter.next(), Some(kids[1]), "middle");
        assert_eq!(iter.next_back(), None, "exhausted");
    }

    #[test]
    fn remove_from_parent_works() {
        let mut tree = LayerTree::new();
        let parent = tree.create_layer();
        let child = tree.create_layer();

        tree.add_child(parent, child);
        assert_eq!(tree.parent(child), Some(parent), "attached");

        tree.remove_from_parent(child);
        assert_eq!(tree.parent(child), None, "detached");
        assert!(tree.children(parent).next().is_none(), "no children left");

        tree.remove_from_parent(child);
    }

    #[test]
    fn roots_returns_parentless_layers() {
        let mut tree = LayerTree::new();
        let a = tree.create_layer();
        let b = tree.create_layer();
        let c = tree.create_layer();
        tree.add_child(a, c);

        let roots = tree.roots();
        assert!(roots.contains(&a) && roots.contains(&b), "roots listed");
        assert!(!roots.contains(&c), "child excluded");
    }

    #[test]
    fn screen_origin_accumulates_frames() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let mid = tree.create_layer();
        let leaf = tree.create_layer();
        tree.set_frame(root, IntRect::new(0, 0, 100, 100));
        tree.set_frame(mid, IntRect::new(10, 20, 60, 60));
        tree.set_frame(leaf, IntRect::new(5, 5, 15, 15));
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);
        assert_eq!(tree.screen_origin(leaf), IntPoint::new(15, 25), "sum of origins");
        assert_eq!(tree.bounds(leaf), IntRect::new(0, 0, 10, 10), "local bounds");
    }

    #[test]
    fn destroy_subtree_frees_descendants() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let mid = tree.create_layer();
        let leaf = tree.create_layer();
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);
        tree.destroy_subtree(mid);
        assert!(!tree.is_alive(mid) && !tree.is_alive(leaf), "subtree gone");
        assert!(tree.children(root).next().is_none(), "detached from root");
    }

    #[test]
    fn opacity_requires_square_opaque_background() {
        let mut tree = LayerTree::new();
        let id = tree.create_layer();
        assert!(!tree.is_opaque(id), "no background");
        tree.set_background(id, Some(Rgba8::new(0, 0, 0, 0x80)));
        assert!(!tree.is_opaque(id), "translucent");
        tree.set_background(id, Some(Rgba8::BLACK));
        assert!(tree.is_opaque(id), "opaque");
        tree.set_corner_radius(id, 4);
        assert!(!tree.is_opaque(id), "rounded corners show through");
    }

    #[test]
    fn buffered_resize_reallocates() {
        let mut tree = LayerTree::new();
        let id = tree.create_buffered_layer();
        tree.set_frame(id, IntRect::new(0, 0, 8, 4));
        assert_eq!(
            tree.buffer(id).map(PixelBuffer::size),
            Some(IntSize::new(8, 4)),
            "sized to frame"
        );
        assert_eq!(tree.invalid_rects(id), &[IntRect::new(0, 0, 8, 4)], "fully invalid");
    }

    #[test]
    #[should_panic(expected = "cannot destroy layer with children")]
    fn destroy_with_children_panics() {
        let mut tree = LayerTree::new();
        let parent = tree.create_layer();
        let child = tree.create_layer();
        tree.add_child(parent, child);
        tree.destroy_layer(parent);
    }

    #[test]
    #[should_panic(expected = "child already has a parent")]
    fn double_attach_panics() {
        let mut tree = LayerTree::new();
        let a = tree.create_layer();
        let b = tree.create_layer();
        let child = tree.create_layer();
        tree.add_child(a, child);
        tree.add_child(b, child);
    }

    #[test]
    #[should_panic(expected = "child is an ancestor of parent")]
    fn attaching_an_ancestor_panics() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let mid = tree.create_layer();
        let leaf = tree.create_layer();
        tree.add_child(root, mid);
        tree.add_child(mid, leaf);
        tree.add_child(leaf, root);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_frame() {
        let mut tree = LayerTree::new();
        let id = tree.create_layer();
        tree.destroy_layer(id);
        let _ = tree.frame(id);
    }

    #[test]
    #[should_panic(expected = "stale LayerId")]
    fn destroyed_handle_panics_on_add_child() {
        let mut tree = LayerTree::new();
        let root = tree.create_layer();
        let id = tree.create_layer();
        tree.destroy_layer(id);
        tree.add_child(root, id);
    }

    #[test]
    #[should_panic(expected = "not a child of the given parent")]
    fn remove_child_checks_parent() {
        let mut tree = LayerTree::new();
        let a = tree.create_layer();
        let b = tree.create_layer();
        let child = tree.create_layer();
        tree.add_child(a, child);
        tree.remove_child(b, child);
    }
}
